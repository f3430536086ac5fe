//! Editor state components: cursor/display anchor, line-offset cache,
//! marks & selection, the compressed undo/redo log, and bookmarks.
//!
//! These are standalone, buffer-adjacent types; `core-model::Document`
//! composes them with `core_text::Buffer` into the edit primitives.

pub mod bookmarks;
pub mod cursor;
pub mod line_cache;
pub mod markers;
pub mod undo;

pub use bookmarks::{Bookmark, BookmarkList};
pub use cursor::Cursor;
pub use line_cache::LineCache;
pub use markers::Markers;
pub use undo::{Opcode, UndoCode, UndoLog};
