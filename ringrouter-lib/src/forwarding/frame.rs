//! Minimal Ethernet/IPv4 frame parsing: just enough to find the
//! destination address and to reject frames the worker shouldn't trust.

use crate::ring::BufferPool;

const ETH_HEADER_LEN: usize = 14;
const ETHERTYPE_OFFSET: usize = 12;
const ETHERTYPE_IPV4: u16 = 0x0800;
const DST_ADDR_OFFSET: usize = ETH_HEADER_LEN + 16;
const MIN_FRAME_LEN: usize = DST_ADDR_OFFSET + 4;

/// Validates `frame` as a plausible Ethernet/IPv4 frame and extracts its
/// destination address. Returns `None` if the frame is too short to hold
/// an Ethernet header plus the IPv4 destination field, or if its
/// ethertype isn't `0x0800`. Both are treated as malformed rather than
/// indexed into.
pub fn destination_addr(frame: &[u8]) -> Option<[u8; 4]> {
    if frame.len() < MIN_FRAME_LEN {
        return None;
    }
    let ethertype = u16::from_be_bytes([frame[ETHERTYPE_OFFSET], frame[ETHERTYPE_OFFSET + 1]]);
    if ethertype != ETHERTYPE_IPV4 {
        return None;
    }
    let mut addr = [0u8; 4];
    addr.copy_from_slice(&frame[DST_ADDR_OFFSET..DST_ADDR_OFFSET + 4]);
    Some(addr)
}

/// Same validation and extraction as [`destination_addr`], but reads only
/// `MIN_FRAME_LEN` bytes out of the shared buffer pool instead of the whole
/// frame. This is what the forwarding worker's fast path calls: a frame can
/// be up to [`crate::ring::FRAME_CAP`] bytes, and the lookup only ever needs
/// the fixed-size Ethernet/IPv4 header prefix.
pub fn destination_addr_from_pool(pool: &BufferPool, buf_idx: u32, len: u16) -> Option<[u8; 4]> {
    if (len as usize) < MIN_FRAME_LEN {
        return None;
    }
    let mut header = [0u8; MIN_FRAME_LEN];
    pool.read_into(buf_idx, &mut header);
    destination_addr(&header)
}
