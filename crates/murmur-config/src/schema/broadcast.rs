use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How a broadcast reaches its recipients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanOutMode {
    /// The calling task writes to every recipient before returning.
    Direct,
    /// Requests go through a bounded queue drained by one worker task.
    Queued,
}

/// Broadcast engine tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    pub mode: FanOutMode,
    /// Bound of the queued-mode request queue. Producers wait when full.
    pub queue_capacity: usize,
    /// Per-recipient write timeout in milliseconds. 0 disables it.
    pub send_timeout_ms: u64,
}

impl BroadcastConfig {
    pub fn send_timeout(&self) -> Option<Duration> {
        (self.send_timeout_ms > 0).then(|| Duration::from_millis(self.send_timeout_ms))
    }
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            mode: FanOutMode::Queued,
            queue_capacity: 256,
            send_timeout_ms: 5000,
        }
    }
}
