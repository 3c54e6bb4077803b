//! A minimal transaction-file tokenizer: the Rust analogue of
//! `sequoia.c`'s table reader (`trd_*`), simplified to what the CLI needs
//! (spec.md section 6's external "transaction-file parsing" collaborator).

use crate::item::{ItemBase, ItemId};
use crate::transaction::{ItemWeight, TransactionBag, Weight, WeightedItem, WeightedTransaction};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("cannot open file {0}")]
    Open(String),
    #[error("read error on file {0}")]
    Read(String),
    #[error("malformed item weight {0:?} on line {1}")]
    BadWeight(String, usize),
}

/// Tunable separators, mirroring `trd_allchs`'s record/field/blank/comment
/// character sets, plus the `-w` "weight in last field" and `-u` "weight
/// separator" options.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    pub field_separators: Vec<char>,
    pub comment_prefixes: Vec<char>,
    pub weight_in_last_field: bool,
    pub item_weight_separator: Option<char>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            field_separators: vec![' ', '\t', ','],
            comment_prefixes: vec!['#'],
            weight_in_last_field: false,
            item_weight_separator: None,
        }
    }
}

fn tokenize_line<'a>(line: &'a str, cfg: &ReaderConfig) -> Vec<&'a str> {
    line.split(|c: char| cfg.field_separators.contains(&c))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn is_comment(line: &str, cfg: &ReaderConfig) -> bool {
    line.trim_start()
        .chars()
        .next()
        .map(|c| cfg.comment_prefixes.contains(&c))
        .unwrap_or(false)
}

/// Read unweighted transactions from `text`, one record per line, interning
/// item names through `base`.
pub fn read_transactions(
    text: &str,
    base: &mut ItemBase,
    cfg: &ReaderConfig,
) -> Result<TransactionBag, ReaderError> {
    let mut bag = TransactionBag::new();
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() || is_comment(line, cfg) {
            continue;
        }
        let mut fields = tokenize_line(line, cfg);
        let weight: Weight = if cfg.weight_in_last_field {
            match fields.pop() {
                Some(w) => w
                    .parse()
                    .map_err(|_| ReaderError::BadWeight(w.to_string(), lineno + 1))?,
                None => 1,
            }
        } else {
            1
        };
        let items: Vec<ItemId> = fields.iter().map(|name| base.intern(name)).collect();
        bag.push(items, weight);
    }
    Ok(bag)
}

/// Read weighted transactions: each field is `name<sep>weight`, e.g.
/// `bread:1.5`, where `<sep>` is [`ReaderConfig::item_weight_separator`].
pub fn read_weighted_transactions(
    text: &str,
    base: &mut ItemBase,
    cfg: &ReaderConfig,
) -> Result<Vec<WeightedTransaction>, ReaderError> {
    let sep = cfg.item_weight_separator.unwrap_or(':');
    let mut out = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() || is_comment(line, cfg) {
            continue;
        }
        let mut fields = tokenize_line(line, cfg);
        let weight: Weight = if cfg.weight_in_last_field {
            match fields.pop() {
                Some(w) => w
                    .parse()
                    .map_err(|_| ReaderError::BadWeight(w.to_string(), lineno + 1))?,
                None => 1,
            }
        } else {
            1
        };
        let mut items = Vec::with_capacity(fields.len());
        let mut seen = std::collections::HashSet::new();
        for field in fields {
            let (name, wgt_str) = match field.rsplit_once(sep) {
                Some((n, w)) => (n, w),
                None => (field, "1"),
            };
            let item_weight: ItemWeight = wgt_str
                .parse()
                .map_err(|_| ReaderError::BadWeight(field.to_string(), lineno + 1))?;
            let id = base.intern(name);
            if seen.insert(id) {
                items.push(WeightedItem { item: id, weight: item_weight });
            }
        }
        out.push(WeightedTransaction::new(items, weight));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_plain_transactions() {
        let mut base = ItemBase::new();
        let cfg = ReaderConfig::default();
        let bag = read_transactions("a b c\n# comment\na c\n\n", &mut base, &cfg).unwrap();
        assert_eq!(bag.len(), 2);
        assert_eq!(bag.total_weight(), 2);
    }

    #[test]
    fn reads_trailing_weight() {
        let mut base = ItemBase::new();
        let cfg = ReaderConfig { weight_in_last_field: true, ..Default::default() };
        let bag = read_transactions("a b 3\nc 2\n", &mut base, &cfg).unwrap();
        assert_eq!(bag.transactions()[0].weight, 3);
        assert_eq!(bag.transactions()[1].weight, 2);
    }

    #[test]
    fn reads_weighted_items() {
        let mut base = ItemBase::new();
        let cfg = ReaderConfig::default();
        let txs = read_weighted_transactions("a:1.0 b:3.0\n", &mut base, &cfg).unwrap();
        assert_eq!(txs[0].items[0].weight, 1.0);
        assert_eq!(txs[0].items[1].weight, 3.0);
    }
}
