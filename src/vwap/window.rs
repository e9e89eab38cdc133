//! C1: fixed-capacity ring buffer of window slots (spec §4.1).
//!
//! Capacity is fixed at construction and the backing storage is allocated
//! once; no push or pop ever reallocates. The ring carries no
//! synchronization of its own — the owning `PairEngine` is responsible for
//! serializing access (spec §4.1, last line).

use super::types::Slot;

pub struct Window {
    content: Vec<Option<Slot>>,
    read_head: usize,
    write_head: usize,
    len: usize,
    size: usize,
}

impl Window {
    /// Allocates a ring of `size` slots upfront. `size` must be at least 1
    /// (enforced by config validation before any engine is constructed).
    pub fn new(size: usize) -> Self {
        let mut content = Vec::with_capacity(size);
        content.resize_with(size, || None);
        Self {
            content,
            read_head: 0,
            write_head: 0,
            len: 0,
            size,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.size
    }

    /// Appends at the write head; advances it modulo `size`. Returns
    /// `false` without mutating anything if the ring is already full — the
    /// pair engine always calls `pop` first to make room, so this should
    /// never be observed in practice (spec §4.1).
    pub fn push(&mut self, slot: Slot) -> bool {
        if self.is_full() {
            return false;
        }
        self.content[self.write_head] = Some(slot);
        self.write_head = (self.write_head + 1) % self.size;
        self.len += 1;
        true
    }

    /// Removes from the read head; advances it modulo `size`. Returns
    /// `None` if the ring is empty.
    pub fn pop(&mut self) -> Option<Slot> {
        if self.is_empty() {
            return None;
        }
        let slot = self.content[self.read_head].take();
        self.read_head = (self.read_head + 1) % self.size;
        self.len -= 1;
        slot
    }

    /// Returns the last pushed slot without removing it.
    pub fn peek_newest(&self) -> Option<&Slot> {
        if self.len == 0 {
            return None;
        }
        let newest = (self.write_head + self.size - 1) % self.size;
        self.content[newest].as_ref()
    }
}
