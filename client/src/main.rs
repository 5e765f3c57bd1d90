pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod round;
pub mod router;
pub mod state;
pub mod timer;
pub mod transport;
pub mod ui;
pub mod websocket;

#[cfg(test)]
mod testing;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use colored::*;
use rpsroom_common::ServerMessage;
use rustyline::DefaultEditor;
use tokio::sync::mpsc;
use tracing::{info, warn};

use commands::Command;
use config::Config;
use router::EventRouter;
use state::Session;
use timer::TokioScheduler;
use ui::{InputPoll, TerminalUi, UiNotifier};
use websocket::WebSocketClient;

type Router = EventRouter<Arc<WebSocketClient>, TerminalUi, TokioScheduler>;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.json".to_string());

    if let Err(e) = start_app(&config_path).await {
        eprintln!("{}", format!("Error: {e}").red());
        std::process::exit(1);
    }
}

async fn start_app(config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load_from(config_path)?;
    logging::init(&config.log_path)?;

    if config.username.is_none() {
        config.username = Some(prompt_username()?);
        config.save_to(config_path)?;
    }
    let username = config.username()?.to_string();
    let ws_url = config.websocket_url()?;

    println!("{}", format!("Connecting to {ws_url} as {username}...").cyan());
    let ws_client = Arc::new(WebSocketClient::connect(&ws_url).await?);
    info!(%username, ai_opponent = config.ai_opponent, "session started");

    let (scheduler, reset_rx) = TokioScheduler::new();
    let mut session = Session::new(username, config.ai_opponent);
    let ui = TerminalUi::new();
    let interrupt_rx = watch_interrupts(ui.modal_flag());
    let mut router = EventRouter::new(
        ws_client.clone(),
        ui,
        scheduler,
        config.result_delay(),
    );

    router.ui().render();
    router.start();

    let result = run_session(&mut router, &mut session, &ws_client, reset_rx, interrupt_rx).await;
    ws_client.close().await;
    result
}

fn prompt_username() -> Result<String, Box<dyn std::error::Error>> {
    let mut rl = DefaultEditor::new()?;

    loop {
        let line = rl.readline("Username: ")?;
        let name = line.trim();
        if !name.is_empty() {
            return Ok(name.to_string());
        }
        println!("{}", "Username cannot be empty.".red());
    }
}

/// Single Ctrl-C listener for the session. Interrupts are forwarded to the
/// host loop, except while a prompt parks it: then the process ends directly.
fn watch_interrupts(modal: Arc<AtomicBool>) -> mpsc::UnboundedReceiver<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if modal.load(Ordering::SeqCst) {
                println!();
                warn!("interrupted at a prompt, exiting immediately");
                std::process::exit(130);
            }
            if tx.send(()).is_err() {
                break;
            }
        }
    });
    rx
}

/// Drives the router until the room closes or the user exits
async fn run_session(
    router: &mut Router,
    session: &mut Session,
    ws_client: &WebSocketClient,
    mut reset_rx: mpsc::UnboundedReceiver<u64>,
    mut interrupt_rx: mpsc::UnboundedReceiver<()>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        tokio::select! {
            // Poll for incoming WebSocket messages and typed commands
            _ = tokio::time::sleep(POLL_INTERVAL) => {
                for msg in ws_client.get_messages().await {
                    let room_closed = matches!(msg, ServerMessage::RoomClosed { .. });
                    router.handle(session, msg);

                    if room_closed {
                        router.ui_mut().wait_for_enter("Press Enter to exit...");
                        return Ok(());
                    }
                }

                if !ws_client.is_connected().await {
                    return Err("Connection to server lost".into());
                }

                loop {
                    match router.ui_mut().poll_line() {
                        InputPoll::Line(line) => {
                            if !handle_line(router, session, &line) {
                                return Ok(());
                            }
                        }
                        InputPoll::Empty => break,
                        InputPoll::Closed => {
                            info!("stdin closed, releasing seat");
                            router.on_unload(session);
                            return Ok(());
                        }
                    }
                }
            }

            Some(ticket) = reset_rx.recv() => {
                router.on_reset_due(session, ticket);
            }

            Some(()) = interrupt_rx.recv() => {
                if confirm_exit(router, session) {
                    return Ok(());
                }
            }
        }
    }
}

/// Returns false when the user chose to exit
fn handle_line(router: &mut Router, session: &mut Session, line: &str) -> bool {
    if line.trim().is_empty() {
        return true;
    }

    match Command::parse(line) {
        Some(Command::Choose(choice)) => {
            router.submit_choice(session, choice);
        }
        Some(Command::Leave) => {
            router.request_leave(session);
        }
        Some(Command::Quit) => return !confirm_exit(router, session),
        None => router
            .ui_mut()
            .print_hint("Unknown command. Try rock, paper, scissors, leave or quit."),
    }
    true
}

/// Exit path shared by `quit` and Ctrl-C
fn confirm_exit(router: &mut Router, session: &mut Session) -> bool {
    if let Some(warning) = router.before_unload(session) {
        if !router.ui_mut().confirm(warning) {
            return false;
        }
    }

    router.on_unload(session);
    true
}
