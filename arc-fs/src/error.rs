//! Error types for ARC filesystem operations.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Archive magic mismatch (found {found:#018x}) - possibly not an ARC file")]
    BadMagic { found: u64 },

    #[error("Table section truncated: expected {expected} bytes, got {actual}")]
    TruncatedTable { expected: usize, actual: usize },

    #[error("Decompressed length mismatch: expected {expected} bytes, got {actual}")]
    Decompression { expected: usize, actual: usize },

    #[error("Index {index} out of range for {table} table of length {len}")]
    IndexOutOfRange {
        table: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Redirect chain starting at file record {start} does not terminate")]
    RedirectCycle { start: usize },

    #[error("Not implemented")]
    NotImplemented,
}

pub type Result<T> = std::result::Result<T, Error>;
