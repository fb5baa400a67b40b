//! The forwarding worker: ties the trie and the ring bindings together
//! into the steady-state poll/drain/lookup/swap loop.

mod frame;
mod stats;
mod worker;

pub use stats::{ForwardingStats, StatsSnapshot};
pub use worker::Worker;
