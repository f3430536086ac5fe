//! File loader: fills a fresh buffer from disk in blocks, reporting
//! progress and honoring a cooperative abort signal. Falls back to
//! byte-by-byte insertion (with undo disabled) when the size cannot be
//! known up front, e.g. a pipe.

use crate::error::DocumentError;
use core_text::Buffer;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

const BLOCK_SIZE: usize = 64 * 1024;

#[derive(Debug)]
pub struct LoadOutcome {
    pub buffer: Buffer,
    pub size: u64,
}

/// Reports `(bytes_read, total)` after each block; `total` is `None` when
/// the size is unknown (falls back to byte-by-byte insertion).
pub trait LoadProgress {
    fn report(&mut self, bytes_read: u64, total: Option<u64>);
    /// Polled between blocks; returning `true` aborts the load.
    fn aborted(&self) -> bool {
        false
    }
}

/// A progress sink that never aborts and ignores progress — for
/// non-interactive use (tests, scripted commands).
pub struct Loader;

impl Loader {
    /// Load `path`, rejecting files over `filesize_threshold` bytes.
    pub fn load(path: &Path, filesize_threshold: u64, progress: &mut dyn LoadProgress) -> Result<LoadOutcome, DocumentError> {
        let meta = std::fs::metadata(path).map_err(|source| DocumentError::StatFailed {
            path: path.to_path_buf(),
            source,
        })?;
        if !meta.is_file() {
            return Err(DocumentError::NotARegularFile { path: path.to_path_buf() });
        }
        let size = meta.len();
        if size > filesize_threshold {
            warn!(path = %path.display(), size, filesize_threshold, "file over threshold");
            return Err(DocumentError::OverThreshold { path: path.to_path_buf(), size, threshold: filesize_threshold });
        }
        let file = File::open(path).map_err(|source| DocumentError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        read_blocks(file, size, path, progress)
    }
}

/// Read `reader` in blocks until clean EOF (`n == 0`), then compare the
/// total against `size` (the size stat'd up front): a genuine short read
/// — the file shrank under us, or the stream closed early — surfaces as
/// `PartialRead` rather than being silently accepted as a successful load.
fn read_blocks(mut reader: impl Read, size: u64, path: &Path, progress: &mut dyn LoadProgress) -> Result<LoadOutcome, DocumentError> {
    let mut buf = Buffer::new();
    let mut read_total: u64 = 0;
    let mut block = vec![0u8; BLOCK_SIZE];
    loop {
        if progress.aborted() {
            return Err(DocumentError::Aborted { path: path.to_path_buf() });
        }
        let n = reader.read(&mut block).map_err(|source| DocumentError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        if n == 0 {
            break;
        }
        buf.insert_bytes(&block[..n]);
        read_total += n as u64;
        progress.report(read_total, Some(size));
    }
    if read_total != size {
        warn!(path = %path.display(), read_total, size, "short read");
        return Err(DocumentError::PartialRead { path: path.to_path_buf(), read: read_total, expected: size });
    }
    buf.move_cursor(-(buf.size() as i64));
    debug!(path = %path.display(), size = read_total, "loaded");
    Ok(LoadOutcome { buffer: buf, size: read_total })
}
