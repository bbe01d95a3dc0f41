//! In-memory connections for unit tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use murmur_common::ConnectionError;
use tokio::sync::{mpsc, Mutex};

use crate::connection::Connection;

/// Records every frame written to it and replays frames pushed through its
/// inbound sender. `receive` reports `Closed` once the sender is dropped
/// and the queue is drained.
pub(crate) struct MockConnection {
    inbound: Mutex<mpsc::UnboundedReceiver<String>>,
    sent: std::sync::Mutex<Vec<String>>,
    broken: AtomicBool,
    closed: AtomicBool,
}

impl MockConnection {
    pub(crate) fn new() -> (Arc<Self>, mpsc::UnboundedSender<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = Arc::new(Self {
            inbound: Mutex::new(rx),
            sent: std::sync::Mutex::new(Vec::new()),
            broken: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        });
        (conn, tx)
    }

    /// A client that sends `lines` and then disconnects.
    pub(crate) fn scripted(lines: &[&str]) -> Arc<Self> {
        let (conn, tx) = Self::new();
        for line in lines {
            tx.send((*line).to_owned()).unwrap();
        }
        conn
    }

    pub(crate) fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    /// Make every later `send` fail as if the socket were gone.
    pub(crate) fn break_writes(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn send(&self, text: &str) -> Result<(), ConnectionError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(ConnectionError::Transport("broken pipe".into()));
        }
        self.sent.lock().unwrap().push(text.to_owned());
        Ok(())
    }

    async fn receive(&self) -> Result<String, ConnectionError> {
        self.inbound
            .lock()
            .await
            .recv()
            .await
            .ok_or(ConnectionError::Closed)
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// A peer whose writes never complete.
pub(crate) struct StalledConnection;

#[async_trait]
impl Connection for StalledConnection {
    async fn send(&self, _text: &str) -> Result<(), ConnectionError> {
        std::future::pending().await
    }

    async fn receive(&self) -> Result<String, ConnectionError> {
        std::future::pending().await
    }

    async fn close(&self) {}
}
