//! Error taxonomy (spec.md section 7). Errors are returned, never thrown
//! or panicked; the CLI driver maps them to process exit codes.

use thiserror::Error;

/// Errors the mining engine and its surrounding CLI can produce.
#[derive(Debug, Error)]
pub enum MiningError {
    /// An allocation-sized buffer could not be built. The reference
    /// implementation treats a failed `malloc` identically to a reporter
    /// failure (unwind, free, surface to the caller); in Rust this variant
    /// exists for parity with that taxonomy even though ordinary `Vec`
    /// growth aborts the process rather than returning an error.
    #[error("out of memory")]
    OutOfMemory,

    /// A parameter was invalid (support out of range, zmin/zmax negative,
    /// unknown target character).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Reading or parsing the transaction input failed.
    #[error("input error: {0}")]
    Input(#[from] crate::reader::ReaderError),

    /// The reporter (writer) failed, e.g. an I/O error while emitting a
    /// pattern.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),

    /// After recoding there are no items or no transactions left.
    #[error("no (frequent) items found")]
    NoItems,
}

pub type Result<T> = std::result::Result<T, MiningError>;
