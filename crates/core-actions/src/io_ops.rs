//! File-level open/save wired to a `Document`, in the result-enum style
//! the rest of this crate uses for fallible boundary operations.

use core_config::{EditOptions, EditorLimits};
use core_model::{Document, LoadOutcome, Loader, Saver};
use core_text::Buffer;
use std::path::{Path, PathBuf};
use tracing::error;

pub enum OpenFileResult {
    Success(Box<Document>),
    Error(String),
}

struct SilentProgress;
impl core_model::loader::LoadProgress for SilentProgress {
    fn report(&mut self, _bytes_read: u64, _total: Option<u64>) {}
}

/// Open `path` into a fresh `Document`, honoring the configured size
/// threshold.
pub fn open_file(path: &Path, opts: &EditOptions, limits: EditorLimits) -> OpenFileResult {
    match Loader::load(path, opts.filesize_threshold, &mut SilentProgress) {
        Ok(LoadOutcome { buffer, .. }) => {
            let mut doc = Document::new(buffer, opts, limits);
            doc.file_name = Some(path.to_path_buf());
            OpenFileResult::Success(Box::new(doc))
        }
        Err(e) => {
            error!(target: "io", %e, "open_file_failed");
            OpenFileResult::Error(e.to_string())
        }
    }
}

/// Open an empty, unnamed document — the editor's state when started
/// without a file argument.
pub fn new_empty_document(opts: &EditOptions, limits: EditorLimits) -> Document {
    Document::new(Buffer::new(), opts, limits)
}

#[derive(Debug)]
pub enum WriteFileResult {
    Success,
    NoFilename,
    Error(String),
}

pub fn write_file(doc: &mut Document, opts: &EditOptions, target: Option<&Path>) -> WriteFileResult {
    let path: PathBuf = match target.map(Path::to_path_buf).or_else(|| doc.file_name.clone()) {
        Some(p) => p,
        None => return WriteFileResult::NoFilename,
    };
    match Saver::save(&doc.buf, &path, opts.line_ending, opts.check_nl_at_eof) {
        Ok(()) => {
            doc.modified = false;
            WriteFileResult::Success
        }
        Err(e) => {
            error!(target: "io", %e, "file_write_error");
            WriteFileResult::Error(e.to_string())
        }
    }
}
