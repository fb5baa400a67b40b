//! `ringrouter-lib`: the longest-prefix-match trie, the zero-copy
//! ring-pair bindings, and the forwarding-worker loop for a user-space,
//! kernel-bypass IPv4 packet forwarder (see `spec.md` / `SPEC_FULL.md` at
//! the workspace root).
//!
//! The ring module talks to the outside world through `libc::poll`, so
//! this crate cannot be `forbid(unsafe_code)` end to end; the one
//! `unsafe` block lives at that single FFI boundary, documented there.

pub mod config;
pub mod error;
pub mod forwarding;
pub mod ring;
pub mod seed;
pub mod trie;

pub use config::{load_from_path, Config, LoggingConfig, RingMode};
pub use error::{ForwarderError, Result};
pub use forwarding::{ForwardingStats, StatsSnapshot, Worker};
pub use ring::{
    poll_readable, swap_buffers, BindingError, BufferPool, OpenMode, RingPairHandle, RingProvider,
    RxRing, Slot, SoftwareHandle, SoftwareRingProvider, TxRing, FRAME_CAP,
};
pub use seed::load_routes_into;
pub use trie::{NextHop, Trie, UNSET_INTERFACE};
