//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod auth;
mod broadcast;
mod listen;
mod presentation;

pub use auth::*;
pub use broadcast::*;
pub use listen::*;
pub use presentation::*;

use serde::{Deserialize, Serialize};

/// Root configuration for the murmur server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: ListenConfig,
    pub auth: AuthConfig,
    pub broadcast: BroadcastConfig,
    pub presentation: PresentationConfig,
}
