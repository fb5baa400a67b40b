//! Ring-pair bindings: the zero-copy RX/TX rings a worker drives, the
//! shared buffer region they address, the `RingProvider` contract that
//! abstracts over the out-of-scope real NIC driver, and the in-process
//! reference implementation used by tests.

pub mod provider;
pub mod rx;
pub mod slot;
pub mod software;
pub mod tx;

use std::os::unix::io::RawFd;
use std::time::Duration;

pub use provider::{BindingError, OpenMode, RingPairHandle, RingProvider};
pub use rx::RxRing;
pub use slot::{BufferPool, Slot, FRAME_CAP};
pub use software::{SoftwareHandle, SoftwareRingProvider};
pub use tx::TxRing;

/// Moves an RX slot's frame onto a TX slot by exchanging buffer indices.
/// No payload is ever copied. `tx`'s `len` becomes the RX slot's frame
/// length; `rx`'s `len` is left at whatever the now-swapped-in buffer
/// previously held, which the caller must not read again (it is about to
/// be recycled by the driver once the RX slot is committed).
pub fn swap_buffers(rx: &mut Slot, tx: &mut Slot) {
    std::mem::swap(&mut rx.buf_idx, &mut tx.buf_idx);
    tx.len = rx.len;
}

/// Blocks until at least one of `fds` is readable, or `timeout` elapses.
/// Returns the indices into `fds` that became ready. A real dataplane
/// worker calls this once per loop iteration across every ring pair it
/// owns, exactly like netmap's `poll(2)`-based blocking wait.
pub fn poll_readable(fds: &[RawFd], timeout: Duration) -> std::io::Result<Vec<usize>> {
    let mut pollfds: Vec<libc::pollfd> =
        fds.iter().map(|&fd| libc::pollfd { fd, events: libc::POLLIN, revents: 0 }).collect();

    let timeout_ms = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);
    // SAFETY: `pollfds` is a valid, uniquely-owned buffer of `pollfds.len()`
    // entries for the duration of the call, matching the `nfds` argument.
    let rc = unsafe { libc::poll(pollfds.as_mut_ptr(), pollfds.len() as libc::nfds_t, timeout_ms) };

    if rc < 0 {
        return Err(std::io::Error::last_os_error());
    }

    Ok(pollfds
        .iter()
        .enumerate()
        .filter(|(_, pfd)| pfd.revents & libc::POLLIN != 0)
        .map(|(i, _)| i)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_exchanges_buffer_ownership_and_sets_tx_len() {
        let mut rx = Slot { buf_idx: 5, len: 64 };
        let mut tx = Slot { buf_idx: 9, len: 0 };
        swap_buffers(&mut rx, &mut tx);
        assert_eq!(rx.buf_idx, 9);
        assert_eq!(tx.buf_idx, 5);
        assert_eq!(tx.len, 64);
    }

    #[test]
    fn poll_readable_reports_signaled_fd() {
        let provider = SoftwareRingProvider::new(8, 8);
        let mut handle = provider.open("eth0", 0, OpenMode::OneRing).unwrap();
        assert!(poll_readable(&[handle.as_raw_fd()], Duration::from_millis(50)).unwrap().is_empty());

        assert!(handle.inject_frame(&[1, 2, 3]));
        let ready = poll_readable(&[handle.as_raw_fd()], Duration::from_millis(500)).unwrap();
        assert_eq!(ready, vec![0]);
    }

    #[test]
    fn shared_pool_hands_out_disjoint_buffers_per_nic() {
        let provider = SoftwareRingProvider::new(4, 4);
        let mut a = provider.open("eth0", 0, OpenMode::OneRing).unwrap();
        let mut b = provider.open("eth1", 0, OpenMode::OneRing).unwrap();

        assert!(a.inject_frame(b"from-eth0"));
        assert!(b.inject_frame(b"from-eth1"));

        let rx_a = a.rx_ring().slot(a.rx_ring().cur()).buf_idx;
        let rx_b = b.rx_ring().slot(b.rx_ring().cur()).buf_idx;
        assert_ne!(rx_a, rx_b, "NICs sharing a ring index must not alias buffers");
    }
}
