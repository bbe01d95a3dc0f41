//! murmur: a password-gated WebSocket chat relay.
//!
//! Clients connect, answer a password prompt, pick a temporary name and
//! from then on every line they send is relayed to every other connected
//! client as `"<name>: <line>"`. Joins and departures are announced with
//! the current list of connected users.
//!
//! The [`registry::Registry`] is the single source of truth for who is
//! connected; the [`broadcast::Broadcaster`] fans messages out from
//! registry snapshots without ever holding the registry lock across a write.

pub mod broadcast;
pub mod connection;
pub mod handshake;
pub mod palette;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use broadcast::{Broadcaster, DeliveryReport};
pub use connection::Connection;
pub use handshake::{Handshake, HandshakeError, HandshakeState, Rejection};
pub use registry::{Recipient, Registry};
pub use server::{handle_connection, serve, ServerState};
pub use session::Session;
