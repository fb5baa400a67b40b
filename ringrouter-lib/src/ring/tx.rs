use super::slot::Slot;

/// Transmit ring: `[cur, tail)` are free slots userspace may produce into.
/// As with [`super::rx::RxRing`], `head` trails `cur` until
/// [`TxRing::advance_and_commit`] pushes it forward, releasing the newly
/// produced slot to the driver for transmission.
pub struct TxRing {
    head: u32,
    cur: u32,
    tail: u32,
    slots: Vec<Slot>,
}

impl TxRing {
    /// Builds a ring over `buf_indices.len()` slots, each permanently
    /// seated on the given buffer, with the whole ring (minus the one-slot
    /// gap every ring keeps open) initially free for the producer.
    pub fn new(buf_indices: Vec<u32>) -> Self {
        let capacity = buf_indices.len() as u32;
        let slots = buf_indices.into_iter().map(|buf_idx| Slot { buf_idx, len: 0 }).collect();
        let tail = capacity.saturating_sub(1);
        Self { head: 0, cur: 0, tail, slots }
    }

    pub fn capacity(&self) -> u32 {
        self.slots.len() as u32
    }

    /// `cur != tail`: at least one free slot to produce into.
    pub fn has_space(&self) -> bool {
        self.cur != self.tail
    }

    pub fn advance(&self, idx: u32) -> u32 {
        (idx + 1) % self.capacity()
    }

    pub fn cur(&self) -> u32 {
        self.cur
    }

    pub fn head(&self) -> u32 {
        self.head
    }

    pub fn slot(&self, idx: u32) -> &Slot {
        &self.slots[idx as usize]
    }

    pub fn slot_mut(&mut self, idx: u32) -> &mut Slot {
        &mut self.slots[idx as usize]
    }

    /// Advances `cur` past the slot just produced and commits (`head =
    /// cur`), handing the frame to the driver for transmission.
    pub fn advance_and_commit(&mut self) {
        self.cur = self.advance(self.cur);
        self.head = self.cur;
    }

    /// Test/simulation-only: drains every slot transmitted so far (as a
    /// real `tx_sync`/`NIOCTXSYNC` would once hardware completes sending
    /// them) and returns the free region to the producer. The software
    /// provider models the NIC as infinitely fast, so every call frees the
    /// whole ring behind `cur` again.
    pub(crate) fn nic_consume_all(&mut self) {
        self.tail = (self.head + self.capacity() - 1) % self.capacity();
    }
}
