//! The occurrence table (spec.md section 3): pattern occurrences anchored
//! into transactions, the per-extension-item occurrence lists, and the
//! arena-slab layout that backs one recursion frame.

use crate::item::ItemId;
use crate::transaction::Weight;
use std::cell::Cell;

/// A single embedding of the current pattern into one transaction.
///
/// `anchors[d]` is the position (index into `items`) of the pattern's
/// d-th item. It is written just before depth `d + 1` is explored and
/// read by deeper recursion frames and by the closedness test; it is
/// mutated in place rather than copied, which is safe only because
/// recursion is strictly depth-first and single-threaded (spec.md
/// section 5 / section 9 "destructive reuse").
pub struct Occurrence<'t> {
    pub weight: Weight,
    pub items: &'t [ItemId],
    anchors: Vec<Cell<u32>>,
}

impl<'t> Occurrence<'t> {
    pub fn new(weight: Weight, items: &'t [ItemId], max_depth: usize) -> Self {
        Occurrence { weight, items, anchors: vec![Cell::new(0); max_depth.min(items.len()).max(1)] }
    }

    pub fn set_anchor(&self, depth: usize, position: u32) {
        self.anchors[depth].set(position);
    }

    pub fn anchor(&self, depth: usize) -> u32 {
        self.anchors[depth].get()
    }
}

/// Candidate "grow the pattern by item e via this occurrence".
#[derive(Clone, Copy, Default)]
pub struct OccurrenceExt {
    /// Index into the occurrence arena owned by the root call.
    pub occurrence: u32,
    /// Position of the extension item within that occurrence's transaction.
    pub position: u32,
}

#[derive(Clone, Copy)]
struct Slot {
    supp: Weight,
    start: usize,
    cnt: usize,
}

/// One recursion frame's pattern-extension array plus its backing
/// occurrence-extension slab, allocated together the way `sequoia.c`
/// allocates `PATEXT` and `OCCEXT` in a single `malloc` call (spec.md
/// section 9). Each `Frame` lives for the duration of one recursion call
/// and is dropped on return.
pub struct Frame {
    slots: Vec<Slot>,
    slab: Vec<OccurrenceExt>,
}

impl Frame {
    /// Build a frame with `caps.len()` items, where `caps[item]` upper
    /// bounds the number of occurrence-extensions that can ever be
    /// written for `item` in this frame: the number of occurrences in
    /// the *parent* frame that already contain `item` (spec.md section 9
    /// explains why this bound holds - each transaction has unique
    /// items, so a given item occurs in a given occurrence's tail at
    /// most once, regardless of which extension produced that tail).
    pub fn with_capacities(caps: &[u32]) -> Frame {
        let mut slots = Vec::with_capacity(caps.len());
        let mut offset = 0usize;
        for &cap in caps {
            slots.push(Slot { supp: 0, start: offset, cnt: 0 });
            offset += cap as usize;
        }
        Frame { slots, slab: vec![OccurrenceExt::default(); offset] }
    }

    pub fn item_count(&self) -> usize {
        self.slots.len()
    }

    pub fn supp(&self, item: usize) -> Weight {
        self.slots[item].supp
    }

    pub fn cnt(&self, item: usize) -> usize {
        self.slots[item].cnt
    }

    pub fn oxs(&self, item: usize) -> &[OccurrenceExt] {
        let s = &self.slots[item];
        &self.slab[s.start..s.start + s.cnt]
    }

    /// Clear support/count for every item, keeping the slab's per-item
    /// capacity (offsets) intact so the frame can be refilled for the
    /// next extension item tried at this recursion level.
    pub fn reset(&mut self) {
        for s in &mut self.slots {
            s.supp = 0;
            s.cnt = 0;
        }
    }

    /// Append one occurrence-extension for `item`, accumulating its
    /// weight into that item's support.
    pub fn push(&mut self, item: usize, ox: OccurrenceExt, weight: Weight) {
        let s = &mut self.slots[item];
        let idx = s.start + s.cnt;
        self.slab[idx] = ox;
        s.cnt += 1;
        s.supp += weight;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_push_and_reset() {
        let mut frame = Frame::with_capacities(&[2, 1]);
        frame.push(0, OccurrenceExt { occurrence: 0, position: 0 }, 3);
        frame.push(0, OccurrenceExt { occurrence: 1, position: 2 }, 4);
        frame.push(1, OccurrenceExt { occurrence: 0, position: 1 }, 3);
        assert_eq!(frame.supp(0), 7);
        assert_eq!(frame.cnt(0), 2);
        assert_eq!(frame.supp(1), 3);
        frame.reset();
        assert_eq!(frame.supp(0), 0);
        assert_eq!(frame.cnt(0), 0);
        // capacity (offsets) survives a reset, so the same slab can be refilled
        frame.push(0, OccurrenceExt { occurrence: 2, position: 5 }, 9);
        assert_eq!(frame.supp(0), 9);
    }

    #[test]
    fn occurrence_anchor_round_trip() {
        let items = [1u32, 2, 3];
        let occ = Occurrence::new(1, &items, 3);
        occ.set_anchor(0, 0);
        occ.set_anchor(1, 2);
        assert_eq!(occ.anchor(0), 0);
        assert_eq!(occ.anchor(1), 2);
    }
}
