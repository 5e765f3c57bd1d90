use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid config: {0}")]
    Config(String),

    #[error("No username configured (set `username` in the config file or RPS_USERNAME)")]
    MissingUsername,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Not connected to server")]
    NotConnected,
}
