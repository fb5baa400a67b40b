use thiserror::Error;

use crate::ring::BindingError;

/// Errors surfaced at startup (spec.md §7). Fast-path conditions such as a
/// full TX ring, a malformed frame, or a lookup miss never produce one of
/// these; they are counted in [`crate::forwarding::ForwardingStats`] instead
/// and processing continues. Only conditions that leave a worker unable to
/// run at all are represented here.
#[derive(Error, Debug)]
pub enum ForwarderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("route seed error: {0}")]
    RouteSeed(String),

    #[error("ring binding failure: {0}")]
    Binding(#[from] BindingError),
}

pub type Result<T> = std::result::Result<T, ForwarderError>;
