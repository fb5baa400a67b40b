use std::os::unix::io::RawFd;

use super::rx::RxRing;
use super::slot::BufferPool;
use super::tx::TxRing;

/// Registration mode for a ring-descriptor open, mirroring netmap's
/// `NR_REG_ALL_NIC` vs. pinning to a single ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// One worker per hardware ring index (the default partitioning of
    /// spec.md §5).
    OneRing,
    /// A single worker handles every ring index on the NIC.
    AllRings,
}

#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    #[error("failed to open ring descriptor for nic '{nic}' ring {ring_index}: {reason}")]
    Open { nic: String, ring_index: u16, reason: String },
    #[error("ring provider I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The contract consumed from a NIC driver / kernel-bypass ring provider
/// (spec.md §4.2). Out of scope to implement against real hardware here;
/// this crate depends only on the trait, never on a specific driver. See
/// [`super::software::SoftwareRingProvider`] for the in-process reference
/// implementation used by tests and the demo binary.
pub trait RingProvider {
    type Handle: RingPairHandle;

    fn open(&self, nic: &str, ring_index: u16, mode: OpenMode) -> Result<Self::Handle, BindingError>;
}

/// A bound `(NIC, ring_index)` ring pair: one RX ring, one TX ring, and the
/// shared buffer region they address, plus the sync/readiness primitives a
/// worker needs to drive its steady-state loop.
pub trait RingPairHandle {
    fn rx_ring(&mut self) -> &mut RxRing;
    fn tx_ring(&mut self) -> &mut TxRing;

    /// Borrows both rings at once. Needed by the forwarding worker when
    /// a NIC forwards a frame back out its own ring pair: `rx_ring()`
    /// and `tx_ring()` each borrow the whole handle, so taking them one
    /// after another can't yield two live `&mut` at the same time.
    fn rings_mut(&mut self) -> (&mut RxRing, &mut TxRing);

    fn pool(&self) -> &BufferPool;

    /// Pushes kernel-observed RX tail updates into userspace's view of the
    /// RX ring.
    fn rx_sync(&mut self) -> std::io::Result<()>;

    /// Releases userspace TX production to the NIC and reclaims slots the
    /// NIC has finished transmitting.
    fn tx_sync(&mut self) -> std::io::Result<()>;

    /// File descriptor to include in the worker's `poll` set; becomes
    /// readable when the RX ring has new data.
    fn as_raw_fd(&self) -> RawFd;
}
