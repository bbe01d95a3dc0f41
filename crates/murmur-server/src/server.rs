//! Accept loop and per-connection driver.

use std::net::SocketAddr;
use std::sync::Arc;

use murmur_config::ServerConfig;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::broadcast::Broadcaster;
use crate::connection::Connection;
use crate::handshake::{Handshake, HandshakeError};
use crate::registry::Registry;
use crate::session::Session;
use crate::transport;

/// Everything a connection task needs. Cheap to clone.
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<ServerConfig>,
    pub broadcaster: Arc<Broadcaster>,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        let registry = Arc::new(Registry::new(config.presentation.decorate_names));
        let broadcaster = Arc::new(Broadcaster::from_config(registry, &config.broadcast));
        Self {
            config: Arc::new(config),
            broadcaster,
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        self.broadcaster.registry()
    }
}

/// Accept connections forever, one task per client.
pub async fn serve(listener: TcpListener, state: ServerState) {
    state.broadcaster.start();

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = state.clone();
                tokio::spawn(async move {
                    match transport::upgrade(stream, &state.config.listen.path).await {
                        Ok(ws) => handle_connection(Arc::new(ws), addr, state).await,
                        Err(e) => {
                            warn!(peer = %addr, error = %e, "WS handshake failed");
                        }
                    }
                });
            }
            Err(e) => {
                warn!(error = %e, "TCP accept error");
            }
        }
    }
}

/// Run the login handshake on `connection` and, if it succeeds, the chat
/// session until the client leaves.
pub async fn handle_connection(
    connection: Arc<dyn Connection>,
    peer: SocketAddr,
    state: ServerState,
) {
    let handshake = Handshake::new(&state.config.auth.password);
    let name = match handshake.negotiate(connection.as_ref()).await {
        Ok(name) => name,
        Err(HandshakeError::Rejected(reason)) => {
            info!(peer = %peer, reason = %reason, "handshake rejected");
            connection.close().await;
            return;
        }
        Err(HandshakeError::Connection(e)) => {
            debug!(peer = %peer, error = %e, "connection lost during handshake");
            connection.close().await;
            return;
        }
    };

    let session = Session::admit(name, connection, Arc::clone(&state.broadcaster)).await;
    debug!(peer = %peer, conn = %session.id(), "session started");
    session.run().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockConnection;
    use murmur_config::FanOutMode;

    fn state() -> ServerState {
        let mut config = ServerConfig::default();
        config.auth.password = "hunter2".into();
        config.broadcast.mode = FanOutMode::Direct;
        ServerState::new(config)
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    #[tokio::test]
    async fn wrong_password_never_reaches_registry() {
        let state = state();
        let conn = MockConnection::scripted(&["wrong"]);
        handle_connection(conn.clone(), peer(), state.clone()).await;

        assert!(state.registry().is_empty());
        assert!(conn.is_closed());
        assert_eq!(conn.sent(), ["Enter the password: "]);
    }

    #[tokio::test]
    async fn full_session_leaves_registry_empty() {
        let state = state();
        let conn = MockConnection::scripted(&["hunter2", "alice", "hello"]);
        handle_connection(conn.clone(), peer(), state.clone()).await;

        assert!(state.registry().is_empty());
        assert!(conn.is_closed());
        assert_eq!(
            conn.sent(),
            [
                "Enter the password: ",
                "Enter a temporary username: ",
                "Connected Users: alice",
            ]
        );
    }

    #[tokio::test]
    async fn other_clients_see_join_chat_and_leave() {
        let state = state();
        let (watcher, watcher_tx) = MockConnection::new();
        let watcher_task = {
            let state = state.clone();
            let watcher = watcher.clone();
            tokio::spawn(async move {
                handle_connection(watcher, peer(), state).await;
            })
        };

        // Login for the watcher, driven through its inbound channel.
        watcher_tx.send("hunter2".into()).unwrap();
        watcher_tx.send("watcher".into()).unwrap();
        while state.registry().is_empty() {
            tokio::task::yield_now().await;
        }

        let conn = MockConnection::scripted(&["hunter2", "alice", "hello"]);
        handle_connection(conn, peer(), state.clone()).await;

        let seen = watcher.sent();
        assert!(seen.contains(&"alice has joined. Connected Users: watcher, alice".to_string()));
        assert!(seen.contains(&"alice: hello".to_string()));
        assert_eq!(seen.last().unwrap(), "Connected Users: watcher");

        watcher_task.abort();
    }

    #[test]
    fn state_respects_decoration_flag() {
        let mut config = ServerConfig::default();
        config.presentation.decorate_names = true;
        let state = ServerState::new(config);
        assert!(state.registry().decorates());
    }
}
