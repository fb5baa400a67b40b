//! Startup configuration: NIC list, ring-index/worker count, ring mode,
//! the lookup-miss default interface, and the ambient logging knobs
//! (spec.md §6 "External Interfaces").

mod loader;
mod root;
mod telemetry;

pub use loader::load_from_path;
pub use root::{Config, RingMode};
pub use telemetry::LoggingConfig;
