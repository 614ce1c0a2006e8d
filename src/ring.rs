//! The cyclic sequence of a hand's participants.
//!
//! Slots are fixed for the life of a hand: removal marks a slot dead rather
//! than shifting elements, so a slot index is a stable identity for turn
//! markers even after folds. Traversal skip-scans dead slots; the ring never
//! holds more than a table's worth of players, so the scans stay trivial.

use crate::player::Player;
use std::sync::Arc;

pub(crate) struct PlayerRing {
    slots: Vec<Arc<Player>>,
    removed: Vec<bool>,
    head: usize,
    len: usize,
}

impl PlayerRing {
    /// Build a ring over `players` with the slot at `head` as the dealer.
    pub fn new(players: Vec<Arc<Player>>, head: usize) -> Self {
        let len = players.len();
        let removed = vec![false; len];
        Self {
            slots: players,
            removed,
            head,
            len,
        }
    }

    /// Number of live participants.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of slots, live or dead. Raw traversal is bounded by this.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The dealer slot.
    pub fn head(&self) -> usize {
        self.head
    }

    pub fn get(&self, slot: usize) -> &Arc<Player> {
        &self.slots[slot]
    }

    pub fn is_live(&self, slot: usize) -> bool {
        !self.removed[slot]
    }

    /// The next live slot after `slot`, wrapping. With a single live
    /// participant this returns that participant's own slot.
    pub fn next(&self, slot: usize) -> usize {
        let n = self.slots.len();
        let mut i = slot;
        for _ in 0..n {
            i = (i + 1) % n;
            if !self.removed[i] {
                return i;
            }
        }
        slot
    }

    /// The previous live slot before `slot`, wrapping.
    pub fn prev(&self, slot: usize) -> usize {
        let n = self.slots.len();
        let mut i = slot;
        for _ in 0..n {
            i = (i + n - 1) % n;
            if !self.removed[i] {
                return i;
            }
        }
        slot
    }

    /// Unlink a participant. If the head is removed it retreats to its live
    /// predecessor so the dealer position stays anchored.
    pub fn remove(&mut self, slot: usize) {
        if self.removed[slot] {
            return;
        }
        self.removed[slot] = true;
        self.len -= 1;
        if slot == self.head && self.len > 0 {
            self.head = self.prev(slot);
        }
    }

    /// Live participants in ring order starting at the head.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Arc<Player>)> {
        let mut order = Vec::with_capacity(self.len);
        if self.len > 0 {
            let start = if self.removed[self.head] {
                self.next(self.head)
            } else {
                self.head
            };
            let mut slot = start;
            loop {
                order.push(slot);
                slot = self.next(slot);
                if slot == start {
                    break;
                }
            }
        }
        order.into_iter().map(|slot| (slot, &self.slots[slot]))
    }

    /// The single remaining participant, if only one is left.
    pub fn solo(&self) -> Option<&Arc<Player>> {
        if self.len != 1 {
            return None;
        }
        self.iter().next().map(|(_, player)| player)
    }
}
