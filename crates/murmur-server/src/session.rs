//! Post-handshake lifetime of one client.
//!
//! [`Session::admit`] registers the client and announces it; [`Session::run`]
//! relays its lines until the connection fails, then evicts it and tells
//! everyone left who is still here.

use std::sync::Arc;

use murmur_common::{ConnectionError, ConnectionId, DisplayName, Message};
use tracing::{debug, info, warn};

use crate::broadcast::Broadcaster;
use crate::connection::Connection;
use crate::protocol::ServerText;
use crate::registry::Registry;

/// Evicts its connection from the registry exactly once: either through
/// [`EvictionGuard::release`] or, if the session task is cancelled or
/// panics first, on drop.
struct EvictionGuard {
    id: ConnectionId,
    registry: Arc<Registry>,
    armed: bool,
}

impl EvictionGuard {
    fn release(mut self) -> Option<DisplayName> {
        self.armed = false;
        self.registry.evict(self.id)
    }
}

impl Drop for EvictionGuard {
    fn drop(&mut self) {
        if self.armed {
            warn!(conn = %self.id, "session ended without teardown, evicting");
            self.registry.evict(self.id);
        }
    }
}

pub struct Session {
    id: ConnectionId,
    name: DisplayName,
    connection: Arc<dyn Connection>,
    broadcaster: Arc<Broadcaster>,
    guard: EvictionGuard,
}

impl Session {
    /// Register `connection` under `name` and announce the arrival to every
    /// other client. The joiner itself is not sent the announcement; it gets
    /// the presence list privately when [`Session::run`] starts.
    pub async fn admit(
        name: DisplayName,
        connection: Arc<dyn Connection>,
        broadcaster: Arc<Broadcaster>,
    ) -> Self {
        let registry = Arc::clone(broadcaster.registry());
        let id = registry.issue_id();
        let name = registry.admit(id, name, Arc::clone(&connection));
        let guard = EvictionGuard {
            id,
            registry: Arc::clone(&registry),
            armed: true,
        };

        let users = registry.presence_list();
        info!(conn = %id, name = %name, online = registry.len(), "client joined");

        let shown = name.render(registry.decorates());
        let joined = ServerText::Joined {
            name: &shown,
            users: &users,
        };
        broadcaster
            .broadcast(Message::announcement(joined.to_string()), Some(id))
            .await;

        Self {
            id,
            name,
            connection,
            broadcaster,
            guard,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Relay until the connection fails, then tear down. Only ever returns
    /// after the client is gone; the error says why.
    pub async fn run(self) -> ConnectionError {
        let reason = self.relay().await;
        self.teardown(&reason).await;
        reason
    }

    async fn relay(&self) -> ConnectionError {
        let registry = self.broadcaster.registry();
        let users = registry.presence_list();
        if let Err(e) = self
            .connection
            .send(&ServerText::ConnectedUsers { users: &users }.to_string())
            .await
        {
            return e;
        }

        let shown = self.name.render(registry.decorates());
        loop {
            let text = match self.connection.receive().await {
                Ok(text) => text,
                Err(e) => return e,
            };
            debug!(conn = %self.id, bytes = text.len(), "received message");

            let line = ServerText::Chat {
                name: &shown,
                text: &text,
            };
            self.broadcaster
                .broadcast(Message::from_client(self.id, line.to_string()), Some(self.id))
                .await;
        }
    }

    async fn teardown(self, reason: &ConnectionError) {
        let Self {
            id,
            name,
            connection,
            broadcaster,
            guard,
        } = self;

        guard.release();
        let registry = broadcaster.registry();
        info!(
            conn = %id,
            name = %name,
            reason = %reason,
            online = registry.len(),
            "client disconnected"
        );

        let users = registry.presence_list();
        broadcaster
            .broadcast(
                Message::announcement(ServerText::ConnectedUsers { users: &users }.to_string()),
                None,
            )
            .await;
        connection.close().await;
    }
}
