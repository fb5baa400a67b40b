use std::path::PathBuf;

use serde::Deserialize;

use super::telemetry::LoggingConfig;

/// Registration mode for every NIC the forwarder opens, mirroring
/// [`crate::ring::OpenMode`] (spec.md §4.2/§6).
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RingMode {
    /// One worker thread per hardware ring index (the default
    /// partitioning scheme of spec.md §5).
    #[default]
    OneRingPerWorker,
    /// A single worker handles every ring index on each NIC.
    AllRingsSingleWorker,
}

/// Top-level configuration for the forwarder (spec.md §6 "External
/// Interfaces"). Loaded once at startup via [`super::load_from_path`] and
/// never reloaded. The trie and ring bindings it drives are themselves
/// immutable once workers start.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Ordered list of NIC names to attach to. A route's
    /// `next_hop_interface` is a 1-based index into this list.
    pub nics: Vec<String>,
    /// Number of hardware ring indices to bind, i.e. the worker count.
    #[serde(default = "default_ring_indices")]
    pub ring_indices: u16,
    /// `ONE_RING` vs. `ALL_RINGS` registration mode (spec.md §4.2).
    #[serde(default)]
    pub ring_mode: RingMode,
    /// Interface used on an LPM lookup miss. Must be a valid 1-based
    /// index into `nics`; flagged by spec.md §9 as likely unintended for
    /// production, but kept as an explicit, validated setting rather than
    /// a hardcoded fallback.
    pub default_interface: u8,
    /// Optional static route-table seed file (spec.md §6: "bootstrap
    /// populates from a static source"). See [`crate::seed`].
    #[serde(default)]
    pub routes_file: Option<PathBuf>,
    /// Structured logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_ring_indices() -> u16 {
    1
}
