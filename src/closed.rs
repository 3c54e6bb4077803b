//! The closedness test (spec.md section 4.3), shared by the unweighted
//! and weighted recursion engines: a pattern of length `n` has `n` gaps
//! in each occurrence - gap 0 is `items[0 .. ips[0])`, gap `g` for
//! `1 <= g < n` is `items[ips[g-1]+1 .. ips[g])`. The suffix gap after
//! `ips[n-1]` is deliberately excluded: suffix-extension closedness is
//! handled by the reporting gate in `engine::recurse`/`weighted::recurse`
//! via the child's returned maximum extension support, not by this test.
//!
//! Mirrors `closed()`/`closed_iw()` in `sequoia.c`: for each gap, tally
//! how many occurrences contain each item in that gap; if any item's
//! tally reaches the occurrence count for every gap scanned, the pattern
//! is not closed (an internal or prefix extension with the same support
//! exists).

use crate::item::ItemId;
use std::collections::{HashMap, HashSet};

/// `n` is the pattern length (number of anchors, hence number of gaps).
/// `occ_count` is the number of occurrences of the extension being
/// tested. `gap(occ_idx, g)` yields the items of occurrence `occ_idx`'s
/// gap `g`.
pub fn is_closed<I>(n: usize, occ_count: usize, mut gap: impl FnMut(usize, usize) -> I) -> bool
where
    I: IntoIterator<Item = ItemId>,
{
    if occ_count == 0 {
        return true;
    }
    for g in 0..n {
        let mut counts: HashMap<ItemId, usize> = HashMap::new();
        for occ_idx in 0..occ_count {
            let mut seen = HashSet::new();
            for item in gap(occ_idx, g) {
                if seen.insert(item) {
                    *counts.entry(item).or_insert(0) += 1;
                }
            }
        }
        if counts.into_values().any(|c| c == occ_count) {
            return false;
        }
    }
    true
}
