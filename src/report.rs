//! The reporter adapter boundary (spec.md sections 2 and 6): the engine
//! only ever calls a thin `add`/`report`/`remove` (unweighted) or
//! `emit` (weighted) interface. Everything about *how* a pattern is
//! formatted or stored lives on the other side of that interface, which
//! is why spec.md lists the reporter as an external collaborator.

use crate::config::MiningConfig;
use crate::item::{ItemBase, ItemId};
use crate::transaction::{ItemWeight, Weight};
use std::collections::BTreeMap;
use std::io::Write;

/// Push/pop reporter interface used by the unweighted engine, mirroring
/// `isr_add`/`isr_report`/`isr_remove` in `sequoia.c`.
pub trait Reporter {
    fn add(&mut self, item: ItemId);
    fn report(&mut self, support: Weight) -> std::io::Result<()>;
    fn remove(&mut self, n: usize);
}

/// One-shot emit interface used by the weighted engine, mirroring
/// `isr_isetx` in `sequoia.c`.
pub trait WeightedReporter {
    fn emit(&mut self, pattern: &[ItemId], weights: &[ItemWeight], support: Weight) -> std::io::Result<()>;
}

/// Counts of reported patterns per length, for the `-P`/`-Z` pattern
/// spectrum and statistics output (spec.md section 6, supplemented from
/// `sequoia.c`'s `psp_report`/`isr_prstats`).
#[derive(Debug, Default, Clone)]
pub struct PatternSpectrum {
    /// length -> (support -> count)
    rows: BTreeMap<usize, BTreeMap<Weight, u64>>,
}

impl PatternSpectrum {
    fn record(&mut self, length: usize, support: Weight) {
        *self.rows.entry(length).or_default().entry(support).or_insert(0) += 1;
    }

    /// Rows as `(length, support, count)`, sorted by length then support.
    pub fn rows(&self) -> Vec<(usize, Weight, u64)> {
        let mut out = Vec::new();
        for (&len, by_supp) in &self.rows {
            for (&supp, &count) in by_supp {
                out.push((len, supp, count));
            }
        }
        out
    }

    pub fn signature_count(&self) -> usize {
        self.rows.values().map(|m| m.len()).sum()
    }
}

fn passes_filters(cfg: &MiningConfig, length: usize, support: Weight) -> bool {
    length >= cfg.min_length && length <= cfg.max_length && support >= cfg.effective_min_support(length)
}

/// A reporter that collects patterns in memory, applying
/// [`MiningConfig::effective_min_support`] (the per-length support
/// border) and the length bounds at report time, exactly as spec.md
/// section 4.6 requires. The default choice for library callers and
/// tests; the CLI uses [`TextReporter`] instead.
pub struct CollectingReporter<'c> {
    cfg: &'c MiningConfig,
    pattern: Vec<ItemId>,
    pub patterns: Vec<(Vec<ItemId>, Weight)>,
    pub spectrum: PatternSpectrum,
}

impl<'c> CollectingReporter<'c> {
    pub fn new(cfg: &'c MiningConfig) -> Self {
        CollectingReporter { cfg, pattern: Vec::new(), patterns: Vec::new(), spectrum: PatternSpectrum::default() }
    }
}

impl<'c> Reporter for CollectingReporter<'c> {
    fn add(&mut self, item: ItemId) {
        self.pattern.push(item);
    }

    fn report(&mut self, support: Weight) -> std::io::Result<()> {
        if passes_filters(self.cfg, self.pattern.len(), support) {
            self.patterns.push((self.pattern.clone(), support));
            self.spectrum.record(self.pattern.len(), support);
        }
        Ok(())
    }

    fn remove(&mut self, n: usize) {
        let new_len = self.pattern.len() - n;
        self.pattern.truncate(new_len);
    }
}

/// The weighted analogue of [`CollectingReporter`].
pub struct CollectingWeightedReporter<'c> {
    cfg: &'c MiningConfig,
    pub patterns: Vec<(Vec<ItemId>, Vec<ItemWeight>, Weight)>,
    pub spectrum: PatternSpectrum,
}

impl<'c> CollectingWeightedReporter<'c> {
    pub fn new(cfg: &'c MiningConfig) -> Self {
        CollectingWeightedReporter { cfg, patterns: Vec::new(), spectrum: PatternSpectrum::default() }
    }
}

impl<'c> WeightedReporter for CollectingWeightedReporter<'c> {
    fn emit(&mut self, pattern: &[ItemId], weights: &[ItemWeight], support: Weight) -> std::io::Result<()> {
        if passes_filters(self.cfg, pattern.len(), support) {
            self.patterns.push((pattern.to_vec(), weights.to_vec(), support));
            self.spectrum.record(pattern.len(), support);
        }
        Ok(())
    }
}

/// Output format directives, mirroring `sequoia.c`'s `-i#`/`-v#` option
/// strings: `%i` item count, `%a` absolute support, `%s`/`%S` relative
/// support as a fraction/percentage, `%Q` total transaction weight, `%w`
/// sum of item weights, `%m` mean item weight.
#[derive(Debug, Clone)]
pub struct TextFormat {
    pub header: String,
    pub item_separator: String,
    pub info: String,
    pub item_weight_format: String,
    pub scanable: bool,
}

impl Default for TextFormat {
    fn default() -> Self {
        TextFormat {
            header: String::new(),
            item_separator: " ".to_string(),
            info: " (%S)".to_string(),
            item_weight_format: ":%m".to_string(),
            scanable: false,
        }
    }
}

fn quote(name: &str, sep: &str) -> String {
    if name.contains(sep) || name.contains('"') || name.contains(' ') {
        format!("\"{}\"", name.replace('"', "\\\""))
    } else {
        name.to_string()
    }
}

fn render_info(fmt: &str, length: usize, support: Weight, total_weight: Weight) -> String {
    let mut out = String::new();
    let mut chars = fmt.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some('i') => out.push_str(&length.to_string()),
            Some('a') => out.push_str(&support.to_string()),
            Some('s') => {
                let frac = if total_weight > 0 { support as f64 / total_weight as f64 } else { 0.0 };
                out.push_str(&format!("{:.4}", frac));
            }
            Some('S') => {
                let pct = if total_weight > 0 { 100.0 * support as f64 / total_weight as f64 } else { 0.0 };
                out.push_str(&format!("{:.2}%", pct));
            }
            Some('Q') => out.push_str(&total_weight.to_string()),
            Some(other) => {
                out.push('%');
                out.push(other);
            }
            None => out.push('%'),
        }
    }
    out
}

fn render_weight(fmt: &str, sum: ItemWeight, mean: ItemWeight) -> String {
    let mut out = String::new();
    let mut chars = fmt.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some('w') => out.push_str(&format!("{:.4}", sum)),
            Some('m') => out.push_str(&format!("{:.4}", mean)),
            Some(other) => {
                out.push('%');
                out.push(other);
            }
            None => out.push('%'),
        }
    }
    out
}

/// A reporter that writes formatted text to a [`Write`] sink; the CLI's
/// reporter. Implements both the unweighted push/pop interface and the
/// weighted one-shot `emit` interface, since the CLI picks one engine or
/// the other at runtime but reuses the same output formatting for both.
pub struct TextReporter<'a, W: Write> {
    out: W,
    base: &'a ItemBase,
    pattern: Vec<ItemId>,
    cfg: &'a MiningConfig,
    fmt: TextFormat,
    total_weight: Weight,
    pub spectrum: PatternSpectrum,
    pub reported: u64,
}

impl<'a, W: Write> TextReporter<'a, W> {
    pub fn new(out: W, base: &'a ItemBase, cfg: &'a MiningConfig, fmt: TextFormat, total_weight: Weight) -> Self {
        TextReporter {
            out,
            base,
            pattern: Vec::new(),
            cfg,
            fmt,
            total_weight,
            spectrum: PatternSpectrum::default(),
            reported: 0,
        }
    }

    /// `weights` is `(sums, means)` per pattern position, one pair per
    /// item in `self.pattern`, when writing a weighted pattern.
    fn write_line(&mut self, weights: Option<(&[ItemWeight], &[ItemWeight])>, support: Weight) -> std::io::Result<()> {
        write!(self.out, "{}", self.fmt.header)?;
        for (idx, &item) in self.pattern.iter().enumerate() {
            if idx > 0 {
                write!(self.out, "{}", self.fmt.item_separator)?;
            }
            let name = self.base.name(item);
            let name = if self.fmt.scanable { quote(name, &self.fmt.item_separator) } else { name.to_string() };
            write!(self.out, "{}", name)?;
            if let Some((sums, means)) = weights {
                write!(self.out, "{}", render_weight(&self.fmt.item_weight_format, sums[idx], means[idx]))?;
            }
        }
        writeln!(self.out, "{}", render_info(&self.fmt.info, self.pattern.len(), support, self.total_weight))
    }
}

impl<'a, W: Write> Reporter for TextReporter<'a, W> {
    fn add(&mut self, item: ItemId) {
        self.pattern.push(item);
    }

    fn report(&mut self, support: Weight) -> std::io::Result<()> {
        if !passes_filters(self.cfg, self.pattern.len(), support) {
            return Ok(());
        }
        self.write_line(None, support)?;
        self.spectrum.record(self.pattern.len(), support);
        self.reported += 1;
        Ok(())
    }

    fn remove(&mut self, n: usize) {
        let new_len = self.pattern.len() - n;
        self.pattern.truncate(new_len);
    }
}

impl<'a, W: Write> WeightedReporter for TextReporter<'a, W> {
    /// Emit a weighted pattern directly (the weighted engine's one-shot
    /// interface rather than `add`/`report`/`remove`).
    fn emit(&mut self, pattern: &[ItemId], weights: &[ItemWeight], support: Weight) -> std::io::Result<()> {
        if !passes_filters(self.cfg, pattern.len(), support) {
            return Ok(());
        }
        let means: Vec<ItemWeight> =
            weights.iter().map(|&w| if support > 0 { w / support as f64 } else { 0.0 }).collect();
        self.pattern = pattern.to_vec();
        self.write_line(Some((weights, &means)), support)?;
        self.pattern.clear();
        self.spectrum.record(pattern.len(), support);
        self.reported += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MiningConfig;

    #[test]
    fn collecting_reporter_respects_length_bounds() {
        let cfg = MiningConfig { min_length: 2, max_length: 2, ..MiningConfig::default() };
        let mut r = CollectingReporter::new(&cfg);
        r.add(0);
        r.report(5).unwrap(); // length 1, filtered out
        r.add(1);
        r.report(3).unwrap(); // length 2, kept
        r.remove(2);
        assert_eq!(r.patterns, vec![(vec![0, 1], 3)]);
    }

    #[test]
    fn collecting_reporter_applies_support_border() {
        let cfg = MiningConfig {
            min_support: 1,
            min_length: 1,
            support_border: Some(vec![1, 3]),
            ..MiningConfig::default()
        };
        let mut r = CollectingReporter::new(&cfg);
        r.add(0);
        r.add(1);
        r.report(2).unwrap(); // length 2, border requires 3: filtered out
        r.remove(1);
        r.report(5).unwrap(); // length 1, border requires 1: kept
        assert_eq!(r.patterns, vec![(vec![0], 5)]);
    }

    #[test]
    fn text_reporter_formats_support_percentage() {
        let base = {
            let mut b = ItemBase::new();
            b.intern("a");
            b.intern("b");
            b
        };
        let cfg = MiningConfig::default();
        let mut buf = Vec::new();
        {
            let mut r = TextReporter::new(&mut buf, &base, &cfg, TextFormat::default(), 4);
            r.add(0);
            r.add(1);
            r.report(2).unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "a b (50.00%)\n");
    }

    #[test]
    fn pattern_spectrum_counts_by_length_and_support() {
        let mut spec = PatternSpectrum::default();
        spec.record(1, 5);
        spec.record(1, 5);
        spec.record(2, 3);
        let rows = spec.rows();
        assert!(rows.contains(&(1, 5, 2)));
        assert!(rows.contains(&(2, 3, 1)));
        assert_eq!(spec.signature_count(), 2);
    }
}
