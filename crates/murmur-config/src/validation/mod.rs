//! Full configuration validation.
//!
//! Each section has its own check; this orchestrator runs them all and
//! collects errors into a single `ConfigError`.

mod helpers;


use crate::schema::ServerConfig;
use murmur_common::ConfigError;

use helpers::{validate_range, validate_range_u64};

/// Largest accepted broadcast queue.
pub const MAX_QUEUE_CAPACITY: usize = 65_536;

/// Largest accepted per-recipient write timeout.
pub const MAX_SEND_TIMEOUT_MS: u64 = 600_000;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ServerConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_listen(&mut errors, config);
    validate_auth(&mut errors, config);
    validate_broadcast(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_listen(errors: &mut Vec<String>, config: &ServerConfig) {
    if config.listen.host.trim().is_empty() {
        errors.push("listen.host must not be empty".into());
    }
    if !config.listen.path.starts_with('/') {
        errors.push(format!(
            "listen.path = {:?} must start with '/'",
            config.listen.path
        ));
    }
}

fn validate_auth(errors: &mut Vec<String>, config: &ServerConfig) {
    // Clients' answers are trimmed, so a padded secret could never match.
    let password = &config.auth.password;
    if password.trim().is_empty() {
        errors.push("auth.password must not be empty".into());
    } else if password.trim() != password {
        errors.push("auth.password must not have surrounding whitespace".into());
    }
}

fn validate_broadcast(errors: &mut Vec<String>, config: &ServerConfig) {
    validate_range(
        errors,
        "broadcast.queue_capacity",
        config.broadcast.queue_capacity,
        1,
        MAX_QUEUE_CAPACITY,
    );
    validate_range_u64(
        errors,
        "broadcast.send_timeout_ms",
        config.broadcast.send_timeout_ms,
        0,
        MAX_SEND_TIMEOUT_MS,
    );
}
