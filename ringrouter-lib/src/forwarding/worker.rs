use std::os::unix::io::RawFd;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::ring::{poll_readable, swap_buffers, RingPairHandle, RxRing, TxRing};
use crate::trie::Trie;

use super::frame::destination_addr_from_pool;
use super::stats::ForwardingStats;

/// One worker thread's view of the dataplane. `nics[i]` is the ordered list
/// of ring-index handles this worker owns on NIC `i`; NICs are indexed
/// 1-based by position for `next_hop_interface` (`i + 1`), matching
/// `routes`. Under `OneRingPerWorker` every worker owns exactly one ring
/// per NIC (`nics[i].len() == 1`); under `AllRingsSingleWorker` a single
/// worker owns every ring index on every NIC instead, so `nics[i]` holds
/// one handle per hardware ring. A worker never touches a ring another
/// worker owns.
pub struct Worker<H: RingPairHandle> {
    worker_id: u16,
    nics: Vec<Vec<H>>,
    routes: Arc<Trie>,
    default_interface: u8,
    stats: Arc<ForwardingStats>,
}

impl<H: RingPairHandle> Worker<H> {
    pub fn new(
        worker_id: u16,
        nics: Vec<Vec<H>>,
        routes: Arc<Trie>,
        default_interface: u8,
        stats: Arc<ForwardingStats>,
    ) -> Self {
        assert!(!nics.is_empty(), "a worker needs at least one nic to drive");
        assert!(
            nics.iter().all(|rings| !rings.is_empty()),
            "every nic a worker owns needs at least one ring pair"
        );
        Self { worker_id, nics, routes, default_interface, stats }
    }

    pub fn stats(&self) -> &Arc<ForwardingStats> {
        &self.stats
    }

    #[cfg(test)]
    pub(crate) fn nics_for_test(&mut self) -> &mut Vec<Vec<H>> {
        &mut self.nics
    }

    /// Runs the steady-state loop until `poll` returns an error (e.g. a
    /// ring's descriptor is closed out from under it). There is no other
    /// exit: a forwarding worker runs for the lifetime of the process.
    pub fn run(&mut self) -> std::io::Result<()> {
        loop {
            self.poll_and_drain_once(Duration::from_secs(3600))?;
        }
    }

    /// Blocks on `poll` (bounded by `timeout` rather than forever, so
    /// tests can drive the loop deterministically) and then drains every
    /// owned RX ring exactly once, in fixed (nic, ring) order.
    pub fn poll_and_drain_once(&mut self, timeout: Duration) -> std::io::Result<()> {
        let fds: Vec<RawFd> = self.nics.iter().flatten().map(RingPairHandle::as_raw_fd).collect();
        poll_readable(&fds, timeout)?;

        for rings in &mut self.nics {
            for ring in rings {
                ring.rx_sync()?;
            }
        }

        for nic_idx in 0..self.nics.len() {
            for ring_idx in 0..self.nics[nic_idx].len() {
                self.nics[nic_idx][ring_idx].tx_sync()?;
                self.drain_one_ring(nic_idx, ring_idx);
            }
        }
        Ok(())
    }

    fn drain_one_ring(&mut self, nic_idx: usize, ring_idx: usize) {
        let mut frame_count = 0u64;

        loop {
            let (rx_cur, rx_len, rx_buf_idx) = {
                let rx = self.nics[nic_idx][ring_idx].rx_ring();
                if rx.is_empty() {
                    break;
                }
                let cur = rx.cur();
                let slot = *rx.slot(cur);
                (cur, slot.len, slot.buf_idx)
            };

            self.forward_one(nic_idx, ring_idx, rx_cur, rx_buf_idx, rx_len);
            frame_count += 1;

            self.nics[nic_idx][ring_idx].rx_ring().advance_and_commit();
        }

        self.stats.record_batch(frame_count);
        if frame_count > 0 {
            info!(
                worker_id = self.worker_id,
                nic = nic_idx,
                ring = ring_idx,
                frames = frame_count,
                "drained rx ring"
            );
        }
    }

    /// Looks up the destination and swaps the frame onto the chosen TX
    /// ring. Reads only the fixed-size header prefix needed for the
    /// lookup ([`destination_addr_from_pool`]) rather than the whole
    /// frame; `forward_between` then moves the frame itself by exchanging
    /// `buf_idx`, never copying payload bytes.
    fn forward_one(&mut self, nic_idx: usize, ring_idx: usize, rx_cur: u32, rx_buf_idx: u32, rx_len: u16) {
        let pool = self.nics[nic_idx][ring_idx].pool();
        let Some(dst) = destination_addr_from_pool(pool, rx_buf_idx, rx_len) else {
            self.stats.record_dropped_malformed();
            return;
        };

        let interface = self.routes.search(dst).map_or(self.default_interface, |hop| hop.next_hop_interface);
        let Some(dst_nic) = (interface as usize).checked_sub(1).filter(|i| *i < self.nics.len()) else {
            warn!(worker_id = self.worker_id, interface, "route points at an unknown interface");
            self.stats.record_dropped_malformed();
            return;
        };
        // A worker owning fewer rings on the destination NIC than on the
        // source NIC falls back to ring 0, the one ring every owned NIC
        // always has.
        let dst_ring = if ring_idx < self.nics[dst_nic].len() { ring_idx } else { 0 };

        let forwarded = if (nic_idx, ring_idx) == (dst_nic, dst_ring) {
            let (rx, tx) = self.nics[nic_idx][ring_idx].rings_mut();
            forward_between(rx, rx_cur, tx)
        } else {
            let (src, dst) = index_pair_mut(&mut self.nics, (nic_idx, ring_idx), (dst_nic, dst_ring));
            let (rx, _) = src.rings_mut();
            let (_, tx) = dst.rings_mut();
            forward_between(rx, rx_cur, tx)
        };

        if forwarded {
            self.stats.record_forwarded();
        } else {
            self.stats.record_dropped_tx_full();
        }
    }
}

/// Swaps the frame at `rx_cur` onto the next free TX slot, if there is
/// one, and advances/commits the TX ring. Does not touch the RX ring; the
/// caller commits that unconditionally once per drained frame.
fn forward_between(rx: &mut RxRing, rx_cur: u32, tx: &mut TxRing) -> bool {
    if !tx.has_space() {
        return false;
    }
    let mut rx_slot = *rx.slot(rx_cur);
    let tx_cur = tx.cur();
    let mut tx_slot = *tx.slot(tx_cur);

    swap_buffers(&mut rx_slot, &mut tx_slot);

    *rx.slot_mut(rx_cur) = rx_slot;
    *tx.slot_mut(tx_cur) = tx_slot;
    tx.advance_and_commit();
    true
}

/// Borrows two distinct `(nic, ring)` handles out of `nics` mutably at
/// once: either two rings on the same NIC, or one ring each on two
/// different NICs.
fn index_pair_mut<T>(nics: &mut [Vec<T>], a: (usize, usize), b: (usize, usize)) -> (&mut T, &mut T) {
    assert_ne!(a, b, "index_pair_mut requires distinct ring coordinates");
    if a.0 == b.0 {
        let rings = &mut nics[a.0];
        let (i, j) = (a.1, b.1);
        if i < j {
            let (left, right) = rings.split_at_mut(j);
            (&mut left[i], &mut right[0])
        } else {
            let (left, right) = rings.split_at_mut(i);
            (&mut right[0], &mut left[j])
        }
    } else {
        let (i, j) = (a.0, b.0);
        if i < j {
            let (left, right) = nics.split_at_mut(j);
            (&mut left[i][a.1], &mut right[0][b.1])
        } else {
            let (left, right) = nics.split_at_mut(i);
            (&mut right[0][a.1], &mut left[j][b.1])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_pair_mut_borrows_two_rings_on_the_same_nic() {
        let mut nics = vec![vec![10u8, 20u8, 30u8]];
        {
            let (a, b) = index_pair_mut(&mut nics, (0, 0), (0, 2));
            *a += 1;
            *b += 1;
        }
        assert_eq!(nics[0], vec![11, 20, 31]);
    }

    #[test]
    fn index_pair_mut_borrows_rings_on_different_nics_either_order() {
        let mut nics = vec![vec![1u8], vec![2u8]];
        {
            let (a, b) = index_pair_mut(&mut nics, (1, 0), (0, 0));
            *a += 10;
            *b += 10;
        }
        assert_eq!(nics, vec![vec![11], vec![12]]);
    }
}
