//! Narrow traits for the external systems a `Document` talks to but does not
//! own: file locking, the system clipboard, a cross-session history store,
//! and a dirty-flag sink for the renderer. Production code wires these to
//! real OS facilities; tests use the no-op/in-memory versions here.

use std::path::Path;

/// Advisory file locking. Acquiring a lock never blocks a modification —
/// per the error-handling policy, a denied lock still lets the edit
/// proceed with `locked = false`.
pub trait FileLock {
    /// Attempt to acquire the lock for `path`. Returns whether it was
    /// acquired.
    fn acquire(&self, path: Option<&Path>) -> bool;
    fn release(&self, path: Option<&Path>);
}

/// The block clipboard used by `Copy`/`Cut`/`Paste`/`Remove`. Payloads
/// starting with the 5-byte column-block magic (`01 01 01 01 0A`) carry a
/// rectangular selection.
pub trait Clipboard {
    fn set(&self, bytes: Vec<u8>);
    fn get(&self) -> Option<Vec<u8>>;
}

/// A saved cursor position and bookmark set, keyed by file path.
pub struct SavedPosition {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
    pub bookmarks: Vec<(usize, u8)>,
}

/// Cross-session cursor-position and bookmark persistence keyed by file
/// path.
pub trait HistoryStore {
    fn load(&self, path: &Path) -> Option<SavedPosition>;
    fn save(&self, path: &Path, line: usize, column: usize, offset: usize, bookmarks: &[(usize, u8)]);
}

/// Notified when `Document::modified` flips, so a renderer can update a
/// status line without polling.
pub trait DirtySink {
    fn mark_dirty(&self, path: Option<&Path>);
}

/// In-memory/no-op implementations of all four collaborator traits, for
/// tests and for a headless CLI that doesn't need real locking or a system
/// clipboard.
pub struct NoopCollaborators;

impl FileLock for NoopCollaborators {
    fn acquire(&self, _path: Option<&Path>) -> bool {
        true
    }
    fn release(&self, _path: Option<&Path>) {}
}

impl Clipboard for NoopCollaborators {
    fn set(&self, _bytes: Vec<u8>) {}
    fn get(&self) -> Option<Vec<u8>> {
        None
    }
}

impl HistoryStore for NoopCollaborators {
    fn load(&self, _path: &Path) -> Option<SavedPosition> {
        None
    }
    fn save(&self, _path: &Path, _line: usize, _column: usize, _offset: usize, _bookmarks: &[(usize, u8)]) {}
}

impl DirtySink for NoopCollaborators {
    fn mark_dirty(&self, _path: Option<&Path>) {}
}
