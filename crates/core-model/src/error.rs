//! Error taxonomy for load/save, matching the documented policy: read
//! paths recover and return neutral values, write paths surface errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("could not open {path}: {source}")]
    OpenFailed { path: PathBuf, #[source] source: std::io::Error },

    #[error("could not stat {path}: {source}")]
    StatFailed { path: PathBuf, #[source] source: std::io::Error },

    #[error("{path} is not a regular file")]
    NotARegularFile { path: PathBuf },

    #[error("{path} is {size} bytes, over the configured threshold of {threshold} bytes")]
    OverThreshold { path: PathBuf, size: u64, threshold: u64 },

    #[error("load of {path} aborted")]
    Aborted { path: PathBuf },

    #[error("short read of {path}: read {read} of {expected} bytes")]
    PartialRead { path: PathBuf, read: u64, expected: u64 },

    #[error("write to {path} failed: {source}")]
    WriteFailed { path: PathBuf, #[source] source: std::io::Error },

    #[error("partial write to {path}: wrote {written} of {expected} bytes")]
    PartialWrite { path: PathBuf, written: usize, expected: usize },

    #[error("no file name associated with this document")]
    NoFileName,
}
