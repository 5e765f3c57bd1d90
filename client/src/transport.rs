use rpsroom_common::ClientMessage;
use std::sync::Arc;

use crate::error::ClientError;

/// Outbound half of the server channel.
///
/// The inbound half is the [`ServerMessage`](rpsroom_common::ServerMessage)
/// stream the host feeds into the router, one handler per event variant.
pub trait Transport {
    fn send(&self, message: ClientMessage) -> Result<(), ClientError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, message: ClientMessage) -> Result<(), ClientError> {
        (**self).send(message)
    }
}
