//! Command-line driver, the Rust analogue of `sequoia.c`'s `main()`:
//! parse options, read a transaction file, recode and reduce it, run
//! the engine, and write formatted patterns to an output file.

use clap::{Parser, ValueEnum};
use seqocc::report::{TextFormat, TextReporter};
use seqocc::{config::Target, item::ItemBase, prepare, prepare_weighted, MiningConfig, MiningError};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum TargetArg {
    All,
    Closed,
}

/// Mine frequent sequential patterns with unique item occurrences.
#[derive(Parser, Debug)]
#[command(name = "seqocc", version, about)]
struct Cli {
    /// Transaction input file ('-' for standard input).
    input: PathBuf,

    /// Pattern output file ('-' for standard output).
    #[arg(default_value = "-")]
    output: String,

    /// Minimum support a pattern must reach to be reported.
    #[arg(short = 's', long, default_value_t = 1)]
    min_support: u64,

    /// Minimum pattern length to report.
    #[arg(short = 'm', long, default_value_t = 1)]
    min_length: usize,

    /// Maximum pattern length to report (unbounded if omitted).
    #[arg(short = 'n', long)]
    max_length: Option<usize>,

    /// Which patterns to report.
    #[arg(short = 't', long, value_enum, default_value_t = TargetArg::All)]
    target: TargetArg,

    /// Per-length minimum support, starting at --min-length, e.g. "1,1,2".
    #[arg(short = 'b', long, value_delimiter = ',')]
    border: Vec<u64>,

    /// Last field of each transaction record is an integer weight.
    #[arg(short = 'w', long)]
    txn_weight: bool,

    /// Read `name:weight`-per-item records and report mean item weight
    /// at each pattern position instead of a plain support count.
    #[arg(short = 'W', long)]
    item_weights: bool,

    /// Quote item names containing the separator or whitespace.
    #[arg(short = 'g', long)]
    scanable: bool,

    /// Print the pattern spectrum (length, support, count) after mining.
    #[arg(short = 'P', long)]
    spectrum: bool,

    /// Print a one-line summary (patterns reported, total elapsed time).
    #[arg(short = 'Z', long)]
    stats: bool,
}

fn exit_code(err: &MiningError) -> u8 {
    match err {
        MiningError::InvalidArgument(_) => 1,
        MiningError::Input(_) => 2,
        MiningError::Output(_) => 3,
        MiningError::NoItems => 4,
        MiningError::OutOfMemory => 5,
    }
}

fn read_input(path: &PathBuf) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        fs::read_to_string(path)
    }
}

fn open_output(spec: &str) -> io::Result<Box<dyn Write>> {
    if spec == "-" {
        Ok(Box::new(io::stdout()))
    } else {
        Ok(Box::new(fs::File::create(spec)?))
    }
}

fn run(cli: Cli) -> Result<(), MiningError> {
    let cfg = MiningConfig {
        target: match cli.target {
            TargetArg::All => Target::All,
            TargetArg::Closed => Target::Closed,
        },
        min_support: cli.min_support,
        min_length: cli.min_length,
        max_length: cli.max_length.unwrap_or(usize::MAX),
        support_border: if cli.border.is_empty() { None } else { Some(cli.border) },
    };

    let overall = Instant::now();
    let t0 = Instant::now();
    let text = read_input(&cli.input)
        .map_err(|e| MiningError::InvalidArgument(format!("cannot read {}: {e}", cli.input.display())))?;
    tracing::info!(elapsed = ?t0.elapsed(), bytes = text.len(), "read transaction file");

    let out = open_output(&cli.output).map_err(MiningError::Output)?;
    let reader_cfg = seqocc::reader::ReaderConfig { weight_in_last_field: cli.txn_weight, ..Default::default() };
    let fmt = TextFormat { scanable: cli.scanable, ..TextFormat::default() };

    let reported = if cli.item_weights {
        let mut base = ItemBase::new();
        let t1 = Instant::now();
        let mut txs = seqocc::reader::read_weighted_transactions(&text, &mut base, &reader_cfg)?;
        tracing::info!(elapsed = ?t1.elapsed(), transactions = txs.len(), "parsed transactions");

        let t2 = Instant::now();
        prepare_weighted(&mut base, &mut txs, cfg.min_support)?;
        tracing::info!(elapsed = ?t2.elapsed(), items = base.item_count(), "recoded items");

        let total_weight = txs.iter().map(|t| t.weight).sum();
        let mut reporter = TextReporter::new(out, &base, &cfg, fmt, total_weight);

        let t3 = Instant::now();
        seqocc::weighted::mine_weighted(&txs, base.item_count(), &cfg, &mut reporter)?;
        tracing::info!(elapsed = ?t3.elapsed(), reported = reporter.reported, "mined patterns");

        if cli.spectrum {
            for (length, support, count) in reporter.spectrum.rows() {
                println!("{length}\t{support}\t{count}");
            }
        }
        if cli.stats {
            print_stats(&reporter.spectrum, reporter.reported);
        }
        reporter.reported
    } else {
        let mut base = ItemBase::new();
        let t1 = Instant::now();
        let mut bag = seqocc::reader::read_transactions(&text, &mut base, &reader_cfg)?;
        tracing::info!(elapsed = ?t1.elapsed(), transactions = bag.len(), "parsed transactions");

        let t2 = Instant::now();
        prepare(&mut base, &mut bag, cfg.min_support)?;
        tracing::info!(elapsed = ?t2.elapsed(), items = base.item_count(), "recoded and reduced transactions");

        let total_weight = bag.total_weight();
        let mut reporter = TextReporter::new(out, &base, &cfg, fmt, total_weight);

        let t3 = Instant::now();
        seqocc::engine::mine(&bag, base.item_count(), &cfg, &mut reporter)?;
        tracing::info!(elapsed = ?t3.elapsed(), reported = reporter.reported, "mined patterns");

        if cli.spectrum {
            for (length, support, count) in reporter.spectrum.rows() {
                println!("{length}\t{support}\t{count}");
            }
        }
        if cli.stats {
            print_stats(&reporter.spectrum, reporter.reported);
        }
        reporter.reported
    };

    tracing::info!(total_elapsed = ?overall.elapsed(), reported, "done");
    Ok(())
}

/// Item set / sequence statistics (`-Z`, `isr_prstats` in `sequoia.c`):
/// total patterns reported, broken down by length, distinct from the
/// per-(length, support) pattern spectrum printed by `-P`.
fn print_stats(spectrum: &seqocc::report::PatternSpectrum, reported: u64) {
    println!("number of patterns reported: {reported}");
    let mut by_length: std::collections::BTreeMap<usize, u64> = std::collections::BTreeMap::new();
    for (length, _, count) in spectrum.rows() {
        *by_length.entry(length).or_insert(0) += count;
    }
    for (length, count) in by_length {
        println!("{length}\t{count}");
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "mining failed");
            eprintln!("seqocc: {err}");
            ExitCode::from(exit_code(&err))
        }
    }
}
