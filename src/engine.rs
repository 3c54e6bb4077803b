//! The unweighted recursion engine (spec.md sections 4.1, 4.2, 4.5): the
//! depth-first pattern-growth search over occurrence tables, mirroring
//! `sequoia()`/`recurse()` in `sequoia.c`.

use crate::closed;
use crate::config::{MiningConfig, Target};
use crate::item::ItemId;
use crate::occurrence::{Frame, Occurrence, OccurrenceExt};
use crate::report::Reporter;
use crate::transaction::{TransactionBag, Weight};

/// Grow the pattern one item at a time from `frame`, the occurrence
/// table of the pattern built so far. `depth` is the length of that
/// pattern (also the anchor slot every occurrence writes into before
/// recursing).
///
/// Returns the maximum support observed among the extensions processed
/// at this level (spec.md section 4.2). The caller compares its own
/// extension's support against this value to decide whether *that*
/// extension is closed: if some deeper extension reaches the same
/// support, a longer pattern already covers it (section 4.2(f) / section
/// 9 "suffix closedness").
fn recurse(
    occs: &[Occurrence],
    frame: &Frame,
    depth: usize,
    cfg: &MiningConfig,
    reporter: &mut dyn Reporter,
) -> std::io::Result<Weight> {
    if frame.item_count() == 0 {
        return Ok(0);
    }
    // One child frame, reused (via reset) across every extension item
    // tried at this depth - the single-allocation-per-level layout
    // spec.md section 9 asks for. Its per-item capacity is bounded by
    // this frame's own per-item occurrence count: see the invariant
    // documented on `Frame::with_capacities`.
    let caps: Vec<u32> = (0..frame.item_count()).map(|k| frame.cnt(k) as u32).collect();
    let mut child = Frame::with_capacities(&caps);

    let mut max_supp: Weight = 0;
    for i in 0..frame.item_count() {
        let supp = frame.supp(i);
        if supp < cfg.min_support {
            continue;
        }
        if supp > max_supp {
            max_supp = supp;
        }

        // Anchor this extension before testing closedness: the gap test
        // reads ips[0..=depth]. The write is harmless even when the item
        // is skipped below - the slot is scratch, overwritten by the
        // next item tried at this depth.
        for ox in frame.oxs(i) {
            occs[ox.occurrence as usize].set_anchor(depth, ox.position);
        }

        if cfg.target == Target::Closed {
            let oxs = frame.oxs(i);
            let gap_closed = closed::is_closed(depth + 1, oxs.len(), |occ_idx, g| {
                let ox = &oxs[occ_idx];
                let occ = &occs[ox.occurrence as usize];
                let start = if g > 0 { occ.anchor(g - 1) as usize + 1 } else { 0 };
                let end = occ.anchor(g) as usize;
                occ.items[start..end].iter().copied()
            });
            // Not closed w.r.t. prefix/internal extension: some item
            // fills every occurrence's gap, so a shorter representation
            // already has this support. Skip entirely - not added, not
            // recursed, not reported.
            if !gap_closed {
                continue;
            }
        }

        reporter.add(i as ItemId);

        let child_max = if depth + 1 < cfg.max_length {
            child.reset();
            for ox in frame.oxs(i) {
                let occ = &occs[ox.occurrence as usize];
                for j in (ox.position as usize + 1)..occ.items.len() {
                    let k = occ.items[j] as usize;
                    child.push(k, OccurrenceExt { occurrence: ox.occurrence, position: j as u32 }, occ.weight);
                }
            }
            recurse(occs, &child, depth + 1, cfg, reporter)?
        } else {
            0
        };

        let keep = match cfg.target {
            Target::All => true,
            Target::Closed => child_max < supp,
        };
        if keep {
            reporter.report(supp)?;
        }

        reporter.remove(1);
    }
    Ok(max_supp)
}

/// Mine `bag` (already recoded so item ids are dense in `0..item_count`)
/// and push every pattern meeting `cfg` through `reporter`.
///
/// The empty pattern is reported last (spec.md section 4.5), after the
/// recursion has produced its maximum root-level extension support:
/// unconditionally in `All` mode, or in `Closed` mode only when that
/// maximum is below the total transaction weight (no single item
/// reaches the whole bag's support, so the empty pattern is itself
/// closed).
pub fn mine(
    bag: &TransactionBag,
    item_count: usize,
    cfg: &MiningConfig,
    reporter: &mut dyn Reporter,
) -> std::io::Result<()> {
    let total_weight = bag.total_weight();

    let occs: Vec<Occurrence> =
        bag.transactions().iter().map(|t| Occurrence::new(t.weight, &t.items, cfg.max_length)).collect();

    let mut counts = vec![0u32; item_count];
    for t in bag.transactions() {
        for &item in &t.items {
            counts[item as usize] += 1;
        }
    }
    let mut root = Frame::with_capacities(&counts);
    for (idx, t) in bag.transactions().iter().enumerate() {
        for (pos, &item) in t.items.iter().enumerate() {
            root.push(item as usize, OccurrenceExt { occurrence: idx as u32, position: pos as u32 }, t.weight);
        }
    }

    let max_supp = recurse(&occs, &root, 0, cfg, reporter)?;

    let report_empty = match cfg.target {
        Target::All => true,
        Target::Closed => max_supp < total_weight,
    };
    if report_empty {
        reporter.report(total_weight)?;
    }
    Ok(())
}
