//! The weighted variant (spec.md section 4.4): same occurrence-table
//! recursion as the unweighted engine, but each item carries a
//! real-valued weight and the engine reports the mean weight at every
//! pattern position instead of a single support count. Mirrors
//! `sequoia_iw()`/`rec_iw()` in `sequoia.c`.

use crate::closed;
use crate::config::{MiningConfig, Target};
use crate::item::ItemId;
use crate::occurrence::{Frame, OccurrenceExt};
use crate::report::WeightedReporter;
use crate::transaction::{ItemWeight, Weight, WeightedItem, WeightedTransaction};
use std::cell::Cell;

/// An occurrence over weighted transactions. Distinct from
/// [`crate::occurrence::Occurrence`] only in the item type its
/// transaction slice holds; the anchor mechanics are identical.
pub struct WeightedOccurrence<'t> {
    pub weight: Weight,
    pub items: &'t [WeightedItem],
    anchors: Vec<Cell<u32>>,
}

impl<'t> WeightedOccurrence<'t> {
    pub fn new(weight: Weight, items: &'t [WeightedItem], max_depth: usize) -> Self {
        WeightedOccurrence { weight, items, anchors: vec![Cell::new(0); max_depth.min(items.len()).max(1)] }
    }

    pub fn set_anchor(&self, depth: usize, position: u32) {
        self.anchors[depth].set(position);
    }

    pub fn anchor(&self, depth: usize) -> u32 {
        self.anchors[depth].get()
    }
}

/// Returns the maximum support observed among the extensions processed
/// at this level, exactly as [`crate::engine::recurse`] does, so the
/// caller can apply the same suffix-closedness gate.
fn recurse(
    occs: &[WeightedOccurrence],
    frame: &Frame,
    depth: usize,
    pattern: &mut Vec<ItemId>,
    cfg: &MiningConfig,
    reporter: &mut dyn WeightedReporter,
) -> std::io::Result<Weight> {
    if frame.item_count() == 0 {
        return Ok(0);
    }
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
                occ.items[start..end].iter().map(|wi| wi.item)
            });
            if !gap_closed {
                continue;
            }
        }

        pattern.push(i as ItemId);

        // Accumulate support-weighted item weight at every position of
        // the pattern built so far, including the one just anchored.
        let mut wgts = vec![0.0 as ItemWeight; depth + 1];
        for ox in frame.oxs(i) {
            let occ = &occs[ox.occurrence as usize];
            for (m, w) in wgts.iter_mut().enumerate() {
                let pos = occ.anchor(m) as usize;
                *w += occ.weight as ItemWeight * occ.items[pos].weight;
            }
        }

        let child_max = if depth + 1 < cfg.max_length {
            child.reset();
            for ox in frame.oxs(i) {
                let occ = &occs[ox.occurrence as usize];
                for j in (ox.position as usize + 1)..occ.items.len() {
                    let k = occ.items[j].item as usize;
                    child.push(k, OccurrenceExt { occurrence: ox.occurrence, position: j as u32 }, occ.weight);
                }
            }
            recurse(occs, &child, depth + 1, pattern, cfg, reporter)?
        } else {
            0
        };

        let keep = match cfg.target {
            Target::All => true,
            Target::Closed => child_max < supp,
        };
        if keep {
            reporter.emit(pattern, &wgts, supp)?;
        }

        pattern.pop();
    }
    Ok(max_supp)
}

/// Mine `transactions` (already recoded to dense item ids) and emit
/// every weighted pattern meeting `cfg` through `reporter`.
///
/// The empty pattern is reported last, mirroring [`crate::engine::mine`]:
/// unconditionally in `All` mode, or in `Closed` mode only when the
/// maximum root-level extension support falls short of the total
/// transaction weight. The two engines keep their own copies of this
/// check rather than sharing one helper, since their occurrence
/// representations differ (plain ids vs. `WeightedItem`).
pub fn mine_weighted(
    transactions: &[WeightedTransaction],
    item_count: usize,
    cfg: &MiningConfig,
    reporter: &mut dyn WeightedReporter,
) -> std::io::Result<()> {
    let total_weight: Weight = transactions.iter().map(|t| t.weight).sum();

    let occs: Vec<WeightedOccurrence> =
        transactions.iter().map(|t| WeightedOccurrence::new(t.weight, &t.items, cfg.max_length)).collect();

    let mut counts = vec![0u32; item_count];
    for t in transactions {
        for wi in &t.items {
            counts[wi.item as usize] += 1;
        }
    }
    let mut root = Frame::with_capacities(&counts);
    for (idx, t) in transactions.iter().enumerate() {
        for (pos, wi) in t.items.iter().enumerate() {
            root.push(wi.item as usize, OccurrenceExt { occurrence: idx as u32, position: pos as u32 }, t.weight);
        }
    }

    let mut pattern = Vec::new();
    let max_supp = recurse(&occs, &root, 0, &mut pattern, cfg, reporter)?;

    let report_empty = match cfg.target {
        Target::All => true,
        Target::Closed => max_supp < total_weight,
    };
    if report_empty {
        reporter.emit(&[], &[], total_weight)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CollectingWeightedReporter;

    fn tx(items: &[(ItemId, ItemWeight)], weight: Weight) -> WeightedTransaction {
        WeightedTransaction::new(items.iter().map(|&(item, weight)| WeightedItem { item, weight }).collect(), weight)
    }

    #[test]
    fn mean_weight_is_support_weighted_average() {
        // item 0 has weight 2.0 in tx A and 4.0 in tx B, each txn weight 1.
        let txs = vec![tx(&[(0, 2.0)], 1), tx(&[(0, 4.0)], 1)];
        let cfg = MiningConfig { min_support: 1, ..MiningConfig::default() };
        let mut reporter = CollectingWeightedReporter::new(&cfg);
        mine_weighted(&txs, 1, &cfg, &mut reporter).unwrap();
        let (_, weights, support) =
            reporter.patterns.iter().find(|(p, _, _)| p == &vec![0]).unwrap();
        assert_eq!(*support, 2);
        assert_eq!(weights[0] / *support as f64, 3.0);
    }

    #[test]
    fn closed_mode_drops_subsumed_weighted_pattern() {
        // `[0]` always extends to `[0, 1]` with identical support, so it
        // is not closed (suffix gate). `[1]` has item 0 in its prefix gap
        // in every occurrence, so it is not closed either (prefix-gap
        // test). Only `[0, 1]` survives.
        let txs = vec![tx(&[(0, 1.0), (1, 1.0)], 1), tx(&[(0, 1.0), (1, 1.0)], 1)];
        let cfg = MiningConfig { min_support: 1, target: Target::Closed, ..MiningConfig::default() };
        let mut reporter = CollectingWeightedReporter::new(&cfg);
        mine_weighted(&txs, 2, &cfg, &mut reporter).unwrap();
        assert!(!reporter.patterns.iter().any(|(p, _, _)| p == &vec![0]));
        assert!(!reporter.patterns.iter().any(|(p, _, _)| p == &vec![1]));
        assert!(reporter.patterns.iter().any(|(p, _, _)| p == &vec![0, 1]));
    }

    #[test]
    fn closed_mode_scenario_prefix_gap_and_suffix_gate() {
        // {(a,b,c), (a,c), (a,b)}, smin=2, CLOSED: only (a), (a,b), (a,c)
        // survive, matching the unweighted engine's scenario coverage.
        let txs = vec![
            tx(&[(0, 1.0), (1, 1.0), (2, 1.0)], 1),
            tx(&[(0, 1.0), (2, 1.0)], 1),
            tx(&[(0, 1.0), (1, 1.0)], 1),
        ];
        let cfg = MiningConfig { min_support: 2, target: Target::Closed, ..MiningConfig::default() };
        let mut reporter = CollectingWeightedReporter::new(&cfg);
        mine_weighted(&txs, 3, &cfg, &mut reporter).unwrap();
        let mut got: Vec<Vec<ItemId>> = reporter.patterns.iter().map(|(p, _, _)| p.clone()).collect();
        got.sort();
        assert_eq!(got, vec![vec![0], vec![0, 1], vec![0, 2]]);
    }

    #[test]
    fn empty_transactions_report_zero_support_empty_pattern() {
        let txs: Vec<WeightedTransaction> = vec![];
        let cfg = MiningConfig { min_support: 0, min_length: 0, ..MiningConfig::default() };
        let mut reporter = CollectingWeightedReporter::new(&cfg);
        mine_weighted(&txs, 0, &cfg, &mut reporter).unwrap();
        assert_eq!(reporter.patterns, vec![(vec![], vec![], 0)]);
    }
}
