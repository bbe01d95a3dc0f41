//! Fan-out of messages to everyone in the registry.
//!
//! Two disciplines, chosen by config:
//!
//! - **direct**: the caller copies the recipient list out of the registry
//!   and writes to every recipient before returning.
//! - **queued**: the caller pushes onto a bounded queue and returns; a
//!   single worker task drains it in FIFO order. A full queue makes the
//!   caller wait (backpressure), nothing is dropped.
//!
//! Either way a sender's messages reach each recipient in the order they
//! were broadcast. A failed write is logged and skipped: the recipient's
//! own session notices the broken socket on its next read and evicts
//! itself, so fan-out never mutates the registry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures_util::future::join_all;
use murmur_common::{ConnectionError, ConnectionId, Message};
use murmur_config::{BroadcastConfig, FanOutMode};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::connection::Connection;
use crate::registry::{Recipient, Registry};

/// Outcome of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failed: usize,
}

enum Job {
    Deliver {
        message: Message,
        exclude: Option<ConnectionId>,
    },
    Flush(oneshot::Sender<()>),
}

struct Queue {
    tx: mpsc::Sender<Job>,
    // Taken by the worker on first start.
    rx: Mutex<Option<mpsc::Receiver<Job>>>,
    started: AtomicBool,
}

pub struct Broadcaster {
    registry: Arc<Registry>,
    send_timeout: Option<Duration>,
    queue: Option<Queue>,
}

impl Broadcaster {
    pub fn direct(registry: Arc<Registry>, send_timeout: Option<Duration>) -> Self {
        Self {
            registry,
            send_timeout,
            queue: None,
        }
    }

    pub fn queued(
        registry: Arc<Registry>,
        capacity: usize,
        send_timeout: Option<Duration>,
    ) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        Self {
            registry,
            send_timeout,
            queue: Some(Queue {
                tx,
                rx: Mutex::new(Some(rx)),
                started: AtomicBool::new(false),
            }),
        }
    }

    pub fn from_config(registry: Arc<Registry>, config: &BroadcastConfig) -> Self {
        match config.mode {
            FanOutMode::Direct => Self::direct(registry, config.send_timeout()),
            FanOutMode::Queued => {
                Self::queued(registry, config.queue_capacity, config.send_timeout())
            }
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn mode(&self) -> FanOutMode {
        if self.queue.is_some() {
            FanOutMode::Queued
        } else {
            FanOutMode::Direct
        }
    }

    /// Spawn the queue worker. Only the first call on a queued broadcaster
    /// does anything and returns `true`; direct broadcasters have no worker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> bool {
        let Some(queue) = &self.queue else {
            return false;
        };
        if queue
            .started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        let rx = queue
            .rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(rx) = rx else {
            return false;
        };

        tokio::spawn(run_worker(rx, Arc::clone(&self.registry), self.send_timeout));
        info!("broadcast worker started");
        true
    }

    /// Send `message` to every admitted connection except `exclude`.
    ///
    /// Never fails: per-recipient errors are logged inside the fan-out.
    pub async fn broadcast(&self, message: Message, exclude: Option<ConnectionId>) {
        match &self.queue {
            None => {
                let recipients = self.registry.recipients(exclude);
                let report = deliver(&recipients, &message, self.send_timeout).await;
                debug!(?exclude, ?report, "direct broadcast");
            }
            Some(queue) => {
                self.start();
                if queue
                    .tx
                    .send(Job::Deliver { message, exclude })
                    .await
                    .is_err()
                {
                    warn!("broadcast worker is gone, dropping message");
                }
            }
        }
    }

    /// Wait until everything queued before this call has been delivered.
    /// Returns immediately in direct mode.
    pub async fn flush(&self) {
        let Some(queue) = &self.queue else {
            return;
        };
        self.start();
        let (done_tx, done_rx) = oneshot::channel();
        if queue.tx.send(Job::Flush(done_tx)).await.is_ok() {
            let _ = done_rx.await;
        }
    }
}

async fn run_worker(
    mut rx: mpsc::Receiver<Job>,
    registry: Arc<Registry>,
    send_timeout: Option<Duration>,
) {
    while let Some(job) = rx.recv().await {
        match job {
            Job::Deliver { message, exclude } => {
                let recipients = registry.recipients(exclude);
                let report = deliver(&recipients, &message, send_timeout).await;
                debug!(?exclude, ?report, "queued broadcast");
            }
            Job::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("broadcast worker stopped");
}

/// Write `message` to every recipient concurrently and wait for all of
/// them. One recipient failing or stalling past `send_timeout` does not
/// affect the others.
pub async fn deliver(
    recipients: &[Recipient],
    message: &Message,
    send_timeout: Option<Duration>,
) -> DeliveryReport {
    let sends = recipients.iter().map(|recipient| async move {
        let result =
            send_bounded(recipient.connection.as_ref(), message.payload(), send_timeout).await;
        if let Err(e) = &result {
            warn!(conn = %recipient.id, error = %e, "broadcast delivery failed");
        }
        result.is_ok()
    });

    let outcomes = join_all(sends).await;
    let delivered = outcomes.iter().filter(|ok| **ok).count();
    DeliveryReport {
        delivered,
        failed: outcomes.len() - delivered,
    }
}

async fn send_bounded(
    connection: &dyn Connection,
    text: &str,
    limit: Option<Duration>,
) -> Result<(), ConnectionError> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, connection.send(text))
            .await
            .unwrap_or_else(|_| Err(ConnectionError::Timeout(limit.as_millis() as u64))),
        None => connection.send(text).await,
    }
}
