//! Frequent sequential pattern mining with unique item occurrences.
//!
//! Given a minimum support threshold, this crate enumerates ordered
//! sequences of items whose occurrences (as ordered sub-sequences of
//! the input transactions) meet that threshold, optionally restricted
//! to closed patterns, and optionally tracking a real-valued weight per
//! item to report the mean weight at each pattern position.
//!
//! # Usage
//!
//! ```
//! use seqocc::{mine_text, MiningConfig};
//!
//! let transactions = "a b c\na c\nb c\n";
//! let cfg = MiningConfig { min_support: 2, ..MiningConfig::default() };
//! let (base, patterns) = mine_text(transactions, &cfg).unwrap();
//! for (pattern, support) in &patterns {
//!     let names: Vec<&str> = pattern.iter().map(|&id| base.name(id)).collect();
//!     println!("{:?} {}", names, support);
//! }
//! ```

pub mod closed;
pub mod config;
pub mod engine;
pub mod error;
pub mod item;
pub mod occurrence;
pub mod reader;
pub mod report;
pub mod transaction;
pub mod weighted;

pub use config::{MiningConfig, Target};
pub use error::{MiningError, Result};
pub use item::{ItemBase, ItemId};
pub use report::{CollectingReporter, CollectingWeightedReporter, Reporter, WeightedReporter};
pub use transaction::{ItemWeight, Transaction, TransactionBag, Weight, WeightedItem, WeightedTransaction};

/// Recode `base`'s items by ascending frequency, dropping any item whose
/// total weight falls below `min_support`, then filter, sort and reduce
/// `bag` to match (spec.md section 4.1's preprocessing step, run once
/// ahead of the engine).
pub fn prepare(base: &mut ItemBase, bag: &mut TransactionBag, min_support: Weight) -> Result<()> {
    let mut counts = vec![0u64; base.item_count()];
    for t in bag.transactions() {
        for &item in &t.items {
            counts[item as usize] += t.weight;
        }
    }
    let mapping = base.recode_by_ascending_frequency(&counts, min_support);

    let mut recoded = TransactionBag::new();
    for t in bag.transactions() {
        let items: Vec<ItemId> = t.items.iter().filter_map(|&old| mapping[old as usize]).collect();
        if !items.is_empty() {
            recoded.push(items, t.weight);
        }
    }
    recoded.sort_and_reduce();
    *bag = recoded;

    if base.item_count() == 0 || bag.is_empty() {
        return Err(MiningError::NoItems);
    }
    Ok(())
}

/// The weighted analogue of [`prepare`]. Filters and recodes in place,
/// but does not merge duplicate transactions the way [`prepare`] does -
/// doing so would require summing per-position item weights across
/// otherwise-identical transactions, which the reporter's own averaging
/// already accounts for at mining time.
pub fn prepare_weighted(
    base: &mut ItemBase,
    transactions: &mut Vec<WeightedTransaction>,
    min_support: Weight,
) -> Result<()> {
    let mut counts = vec![0u64; base.item_count()];
    for t in transactions.iter() {
        for wi in &t.items {
            counts[wi.item as usize] += t.weight;
        }
    }
    let mapping = base.recode_by_ascending_frequency(&counts, min_support);

    let mut recoded = Vec::with_capacity(transactions.len());
    for t in transactions.drain(..) {
        let items: Vec<WeightedItem> = t
            .items
            .into_iter()
            .filter_map(|wi| mapping[wi.item as usize].map(|id| WeightedItem { item: id, weight: wi.weight }))
            .collect();
        if !items.is_empty() {
            recoded.push(WeightedTransaction::new(items, t.weight));
        }
    }
    *transactions = recoded;

    if base.item_count() == 0 || transactions.is_empty() {
        return Err(MiningError::NoItems);
    }
    Ok(())
}

/// Mine unweighted sequential patterns out of raw transaction text:
/// parse, recode, sort and reduce, then run the engine, collecting
/// every pattern in memory.
pub fn mine_text(text: &str, cfg: &MiningConfig) -> Result<(ItemBase, Vec<(Vec<ItemId>, Weight)>)> {
    let mut base = ItemBase::new();
    let reader_cfg = reader::ReaderConfig::default();
    let mut bag = reader::read_transactions(text, &mut base, &reader_cfg)?;
    prepare(&mut base, &mut bag, cfg.min_support)?;

    let mut reporter = CollectingReporter::new(cfg);
    engine::mine(&bag, base.item_count(), cfg, &mut reporter)?;
    Ok((base, reporter.patterns))
}

/// The weighted analogue of [`mine_text`]: each line's items carry a
/// `name:weight` suffix, and each reported pattern carries a summed
/// per-position weight alongside its support.
pub fn mine_weighted_text(
    text: &str,
    cfg: &MiningConfig,
) -> Result<(ItemBase, Vec<(Vec<ItemId>, Vec<ItemWeight>, Weight)>)> {
    let mut base = ItemBase::new();
    let reader_cfg = reader::ReaderConfig::default();
    let mut txs = reader::read_weighted_transactions(text, &mut base, &reader_cfg)?;
    prepare_weighted(&mut base, &mut txs, cfg.min_support)?;

    let mut reporter = CollectingWeightedReporter::new(cfg);
    weighted::mine_weighted(&txs, base.item_count(), cfg, &mut reporter)?;
    Ok((base, reporter.patterns))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mine_text_end_to_end() {
        let cfg = MiningConfig { min_support: 2, ..MiningConfig::default() };
        let (base, patterns) = mine_text("a b c\na c\nb c\n", &cfg).unwrap();
        let by_name: Vec<(Vec<&str>, Weight)> = patterns
            .into_iter()
            .map(|(p, s)| (p.into_iter().map(|id| base.name(id)).collect(), s))
            .collect();
        assert!(by_name.contains(&(vec!["c"], 3)));
        assert!(by_name.contains(&(vec!["a", "c"], 2)));
        assert!(by_name.contains(&(vec!["b", "c"], 2)));
        assert!(!by_name.iter().any(|(p, _)| p == &vec!["a", "b", "c"]));
    }

    #[test]
    fn mine_weighted_text_end_to_end() {
        let cfg = MiningConfig::default();
        let (base, patterns) = mine_weighted_text("a:2.0 b:4.0\na:6.0\n", &cfg).unwrap();
        let a_id = base.id_of("a").unwrap();
        let (_, weights, support) = patterns.iter().find(|(p, _, _)| p == &vec![a_id]).unwrap();
        assert_eq!(*support, 2);
        assert_eq!(weights[0] / *support as f64, 4.0);
    }

    #[test]
    fn prepare_rejects_empty_result() {
        let mut base = ItemBase::new();
        base.intern("a");
        let mut bag = TransactionBag::new();
        bag.push(vec![0], 1);
        let err = prepare(&mut base, &mut bag, 5).unwrap_err();
        assert!(matches!(err, MiningError::NoItems));
    }
}
