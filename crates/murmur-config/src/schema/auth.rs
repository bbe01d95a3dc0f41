use serde::{Deserialize, Serialize};

/// Shared-secret authentication.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Password every client must present before choosing a name.
    pub password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password: "password".into(),
        }
    }
}

// Keep the secret out of debug logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("password", &"<redacted>")
            .finish()
    }
}
