use serde::{Deserialize, Serialize};

/// Cosmetic options for how names appear on clients.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Tint each display name with an ANSI color from the palette.
    pub decorate_names: bool,
}
