//! The transaction container: ordered item sequences with no repeated
//! items, bundled with an integer weight (spec.md section 3). Treated as
//! an external collaborator of the core engine, but implemented here so
//! the crate is usable end to end.

use crate::item::ItemId;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Integer weight of a transaction (its contribution to support).
pub type Weight = u64;

/// A per-item real-valued weight, used only by the weighted variant.
pub type ItemWeight = f64;

/// An ordered transaction with no repeated items (spec.md section 3
/// invariant). Construction does not itself enforce the invariant -
/// `TransactionBag::push` does, by deduplicating on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub items: Vec<ItemId>,
    pub weight: Weight,
}

impl Transaction {
    pub fn new(items: Vec<ItemId>, weight: Weight) -> Self {
        Transaction { items, weight }
    }
}

/// One item and its real-valued weight inside a weighted transaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedItem {
    pub item: ItemId,
    pub weight: ItemWeight,
}

/// A weighted transaction: same ordering/uniqueness invariant as
/// [`Transaction`], but each item carries an extra real-valued weight.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedTransaction {
    pub items: Vec<WeightedItem>,
    pub weight: Weight,
}

impl WeightedTransaction {
    pub fn new(items: Vec<WeightedItem>, weight: Weight) -> Self {
        WeightedTransaction { items, weight }
    }
}

/// A bag (multiset) of transactions, with the housekeeping `sequoia.c`
/// performs before mining: lexicographic sort and roll-up of duplicate
/// transactions into a single weighted instance (`tbg_sort`/`tbg_reduce`).
#[derive(Debug, Default, Clone)]
pub struct TransactionBag {
    transactions: Vec<Transaction>,
}

impl TransactionBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transaction, deduplicating items within it (keeping the
    /// first occurrence), matching the "no repeated items" invariant.
    pub fn push(&mut self, items: Vec<ItemId>, weight: Weight) {
        let mut seen = HashSet::with_capacity(items.len());
        let deduped: Vec<ItemId> = items.into_iter().filter(|i| seen.insert(*i)).collect();
        self.transactions.push(Transaction::new(deduped, weight));
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Total transaction weight (the support of the empty pattern).
    pub fn total_weight(&self) -> Weight {
        self.transactions.iter().map(|t| t.weight).sum()
    }

    /// Total number of item instances across all transactions, used to
    /// size the root occurrence-extension slab (spec.md section 4.1).
    pub fn extent(&self) -> usize {
        self.transactions.iter().map(|t| t.items.len()).sum()
    }

    /// Sort transactions lexicographically by item sequence, then merge
    /// adjacent duplicates by summing their weights. Mirrors
    /// `tbg_sort(tabag, 1, 0)` followed by `tbg_reduce(tabag, 0)`.
    pub fn sort_and_reduce(&mut self) {
        self.transactions.sort_by(|a, b| lexicographic_cmp(&a.items, &b.items));
        let mut reduced: Vec<Transaction> = Vec::with_capacity(self.transactions.len());
        for t in self.transactions.drain(..) {
            match reduced.last_mut() {
                Some(last) if last.items == t.items => last.weight += t.weight,
                _ => reduced.push(t),
            }
        }
        self.transactions = reduced;
    }
}

fn lexicographic_cmp(a: &[ItemId], b: &[ItemId]) -> Ordering {
    a.iter().cmp(b.iter()).then(a.len().cmp(&b.len()))
}
