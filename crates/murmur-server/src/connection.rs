//! The duplex channel the core talks to.
//!
//! Everything above this trait is transport-agnostic: the WebSocket adapter
//! lives in [`crate::transport`] and tests use an in-memory connection.

use async_trait::async_trait;
use murmur_common::ConnectionError;

/// One live client connection.
///
/// Implementations allow at most one `receive` and one `send` in flight at
/// a time; concurrent callers queue up behind each other. A `send` may run
/// concurrently with a `receive`.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Write one text frame.
    async fn send(&self, text: &str) -> Result<(), ConnectionError>;

    /// Wait for the next text frame from the client.
    ///
    /// Returns [`ConnectionError::Closed`] once the client has gone away.
    async fn receive(&self) -> Result<String, ConnectionError>;

    /// Close the connection. Errors are ignored; the peer may already be gone.
    async fn close(&self);
}
