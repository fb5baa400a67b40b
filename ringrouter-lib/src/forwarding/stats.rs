use std::sync::atomic::{AtomicU64, Ordering};

/// Per-worker forwarding counters, read out periodically for a log line.
/// Relaxed ordering throughout: these are independent counters, never used
/// to synchronize access to anything else, and each is only ever written
/// from the single worker thread that owns it.
#[derive(Default)]
pub struct ForwardingStats {
    frames_forwarded: AtomicU64,
    frames_dropped_tx_full: AtomicU64,
    frames_dropped_malformed: AtomicU64,
    batches: AtomicU64,
    frames_in_batches: AtomicU64,
}

/// Point-in-time copy of [`ForwardingStats`] suitable for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub frames_forwarded: u64,
    pub frames_dropped_tx_full: u64,
    pub frames_dropped_malformed: u64,
    pub batches: u64,
    pub frames_in_batches: u64,
}

impl ForwardingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_forwarded(&self) {
        self.frames_forwarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped_tx_full(&self) {
        self.frames_dropped_tx_full.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped_malformed(&self) {
        self.frames_dropped_malformed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one pass over an RX ring that drained `frame_count` frames
    /// (possibly zero).
    pub fn record_batch(&self, frame_count: u64) {
        self.batches.fetch_add(1, Ordering::Relaxed);
        self.frames_in_batches.fetch_add(frame_count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            frames_forwarded: self.frames_forwarded.load(Ordering::Relaxed),
            frames_dropped_tx_full: self.frames_dropped_tx_full.load(Ordering::Relaxed),
            frames_dropped_malformed: self.frames_dropped_malformed.load(Ordering::Relaxed),
            batches: self.batches.load(Ordering::Relaxed),
            frames_in_batches: self.frames_in_batches.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let stats = ForwardingStats::new();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn records_accumulate_independently() {
        let stats = ForwardingStats::new();
        stats.record_forwarded();
        stats.record_forwarded();
        stats.record_dropped_tx_full();
        stats.record_dropped_malformed();
        stats.record_batch(2);

        let snap = stats.snapshot();
        assert_eq!(snap.frames_forwarded, 2);
        assert_eq!(snap.frames_dropped_tx_full, 1);
        assert_eq!(snap.frames_dropped_malformed, 1);
        assert_eq!(snap.batches, 1);
        assert_eq!(snap.frames_in_batches, 2);
    }
}
