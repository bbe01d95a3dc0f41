//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# murmur server configuration
# Only override what you want to change -- missing fields use defaults.

[listen]
# host = "0.0.0.0"
# port = 8080
# path = "/ws"           # WebSocket upgrade path

[auth]
# Shared secret every client must enter before choosing a name.
password = "password"

[broadcast]
# mode = "queued"        # "queued" (single worker) or "direct"
# queue_capacity = 256   # 1-65536, senders wait when the queue is full
# send_timeout_ms = 5000 # per-recipient write timeout, 0 disables

[presentation]
# decorate_names = false # tint names with ANSI colors
"##
}
