use serde::Deserialize;

/// Logging configuration.
/// Controls application-level structured logging (stdout/stderr) emitted
/// by the forwarding workers and by startup. No metrics-exporter
/// subsystem lives here, spec.md §1 scopes metrics reporting out as an
/// external collaborator; the per-worker counters in
/// [`crate::forwarding::ForwardingStats`] are surfaced only through this
/// log stream.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Can be overridden at runtime via the `RUST_LOG` environment
    /// variable.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Show the module path (target) in log messages.
    #[serde(default = "default_false")]
    pub show_target: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_false() -> bool {
    false
}
