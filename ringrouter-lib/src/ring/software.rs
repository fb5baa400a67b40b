//! In-process reference implementation of [`RingProvider`], used by the
//! test suite and by the demo binary when no real NIC driver is wired in.
//!
//! There is no kernel, no mmap, and no hardware here: an RX ring is filled
//! by a test calling [`SoftwareHandle::inject_frame`] directly, and a TX
//! ring is drained instantly on every [`RingPairHandle::tx_sync`] call, as
//! if transmission always completed immediately. What it does preserve
//! faithfully is the buffer-ownership model: every NIC opened against a
//! given ring index shares one [`BufferPool`], and the slots each ring
//! hands out are disjoint, permanently-assigned regions of it, exactly
//! the invariant a worker's forwarding loop depends on.

use std::collections::HashMap;
use std::os::unix::io::{AsRawFd, RawFd};
use std::os::unix::net::UnixDatagram;
use std::sync::{Arc, Mutex};

use super::provider::{BindingError, OpenMode, RingPairHandle, RingProvider};
use super::rx::RxRing;
use super::slot::BufferPool;
use super::tx::TxRing;

/// Hands out ring pairs backed by plain `Vec`s instead of a kernel-bypass
/// mapping. All NICs opened for the same `ring_index` share one
/// [`BufferPool`], matching the real provider's tolerance for additional
/// NICs sharing a buffer region (spec §4.2); ring-index partitioning
/// still means only one worker thread ever touches that pool.
pub struct SoftwareRingProvider {
    rx_capacity: u32,
    tx_capacity: u32,
    pools: Mutex<HashMap<u16, Arc<BufferPool>>>,
    modes: Mutex<HashMap<String, OpenMode>>,
}

impl SoftwareRingProvider {
    /// `rx_capacity`/`tx_capacity` may differ. A real NIC's RX and TX
    /// ring sizes are independent too, and tests exploit that to force a
    /// TX ring full while its paired RX ring still has room.
    pub fn new(rx_capacity: u32, tx_capacity: u32) -> Self {
        Self { rx_capacity, tx_capacity, pools: Mutex::new(HashMap::new()), modes: Mutex::new(HashMap::new()) }
    }

    fn pool_for(&self, ring_index: u16) -> Arc<BufferPool> {
        let mut pools = self.pools.lock().expect("ring pool registry poisoned");
        pools
            .entry(ring_index)
            .or_insert_with(|| Arc::new(BufferPool::with_capacity(0)))
            .clone()
    }

    /// A NIC is registered under exactly one mode for its whole lifetime,
    /// mirroring netmap's `NR_REG_ALL_NIC` vs. single-ring registration
    /// being a property of the open file descriptor, not of an individual
    /// ring. The first `open` call for a given `nic` fixes its mode; later
    /// calls that disagree are rejected instead of silently mixing
    /// one-ring-per-worker and all-rings-single-worker topologies on the
    /// same NIC.
    fn check_mode(&self, nic: &str, mode: OpenMode) -> Result<(), BindingError> {
        let mut modes = self.modes.lock().expect("ring mode registry poisoned");
        match modes.get(nic) {
            Some(&existing) if existing != mode => Err(BindingError::Open {
                nic: nic.to_string(),
                ring_index: 0,
                reason: format!("nic already registered under {existing:?}, cannot reopen under {mode:?}"),
            }),
            Some(_) => Ok(()),
            None => {
                modes.insert(nic.to_string(), mode);
                Ok(())
            }
        }
    }
}

impl RingProvider for SoftwareRingProvider {
    type Handle = SoftwareHandle;

    fn open(&self, nic: &str, ring_index: u16, mode: OpenMode) -> Result<SoftwareHandle, BindingError> {
        self.check_mode(nic, mode)?;

        let pool = self.pool_for(ring_index);
        let rx_bufs = pool.alloc_range(self.rx_capacity as usize);
        let tx_bufs = pool.alloc_range(self.tx_capacity as usize);

        let (readiness, signal) = UnixDatagram::pair().map_err(BindingError::Io)?;
        readiness.set_nonblocking(true).map_err(BindingError::Io)?;

        Ok(SoftwareHandle {
            nic: nic.to_string(),
            ring_index,
            mode,
            rx: RxRing::new(rx_bufs),
            tx: TxRing::new(tx_bufs),
            pool,
            tx_drain_cursor: 0,
            readiness,
            signal,
        })
    }
}

/// A ring pair bound against [`SoftwareRingProvider`]. `nic`/`ring_index`
/// are kept only for diagnostics; the forwarding worker never inspects
/// them.
pub struct SoftwareHandle {
    nic: String,
    ring_index: u16,
    mode: OpenMode,
    rx: RxRing,
    tx: TxRing,
    pool: Arc<BufferPool>,
    tx_drain_cursor: u32,
    readiness: UnixDatagram,
    signal: UnixDatagram,
}

impl SoftwareHandle {
    pub fn nic(&self) -> &str {
        &self.nic
    }

    pub fn ring_index(&self) -> u16 {
        self.ring_index
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Test harness entry point: simulates the NIC filling the next RX
    /// slot with `bytes` and signals the handle's poll fd readable.
    /// Returns `false` if the RX ring is already full.
    pub fn inject_frame(&mut self, bytes: &[u8]) -> bool {
        if !self.rx.nic_produce(&self.pool, bytes) {
            return false;
        }
        // Best-effort: if the peer's buffer is briefly full this just
        // means a previous wakeup hasn't been drained yet, which still
        // leaves the fd readable.
        let _ = self.signal.send(&[0u8]);
        true
    }

    /// Test harness entry point: returns every frame committed to the TX
    /// ring since the last call, oldest first.
    pub fn drain_tx_frames(&mut self) -> Vec<Vec<u8>> {
        let mut frames = Vec::new();
        while self.tx_drain_cursor != self.tx.head() {
            let slot = *self.tx.slot(self.tx_drain_cursor);
            frames.push(self.pool.read(slot.buf_idx, slot.len));
            self.tx_drain_cursor = self.tx.advance(self.tx_drain_cursor);
        }
        frames
    }
}

impl RingPairHandle for SoftwareHandle {
    fn rx_ring(&mut self) -> &mut RxRing {
        &mut self.rx
    }

    fn tx_ring(&mut self) -> &mut TxRing {
        &mut self.tx
    }

    fn rings_mut(&mut self) -> (&mut RxRing, &mut TxRing) {
        (&mut self.rx, &mut self.tx)
    }

    fn pool(&self) -> &BufferPool {
        &self.pool
    }

    fn rx_sync(&mut self) -> std::io::Result<()> {
        // Drain every pending wakeup datagram so the fd stops reporting
        // readable once the worker has caught up with the RX ring.
        let mut scratch = [0u8; 64];
        loop {
            match self.readiness.recv(&mut scratch) {
                Ok(_) => continue,
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => return Ok(()),
                Err(e) => return Err(e),
            }
        }
    }

    fn tx_sync(&mut self) -> std::io::Result<()> {
        self.tx.nic_consume_all();
        Ok(())
    }

    fn as_raw_fd(&self) -> RawFd {
        self.readiness.as_raw_fd()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_reports_the_mode_it_was_opened_under() {
        let provider = SoftwareRingProvider::new(4, 4);
        let handle = provider.open("eth0", 0, OpenMode::AllRings).unwrap();
        assert_eq!(handle.mode(), OpenMode::AllRings);
    }

    #[test]
    fn reopening_a_nic_under_a_different_mode_is_rejected() {
        let provider = SoftwareRingProvider::new(4, 4);
        provider.open("eth0", 0, OpenMode::OneRing).unwrap();
        assert!(provider.open("eth0", 1, OpenMode::AllRings).is_err());
    }

    #[test]
    fn reopening_a_nic_under_the_same_mode_is_allowed() {
        let provider = SoftwareRingProvider::new(4, 4);
        provider.open("eth0", 0, OpenMode::AllRings).unwrap();
        assert!(provider.open("eth0", 1, OpenMode::AllRings).is_ok());
    }
}
