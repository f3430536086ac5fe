//! Document model: composes the buffer with cursor, marker, undo/redo, line
//! cache, and bookmark state into the five edit primitives, plus the
//! loader/saver adapters that move bytes between a `Document` and a file.
//!
//! `core-actions`'s command executor is the only caller of the edit
//! primitives in normal operation; this crate owns the invariants the
//! primitives must uphold (cache invalidation, marker/bookmark shifting,
//! the undo/redo boundary) so those invariants live in one place.

mod collaborators;
mod error;
pub mod loader;
mod saver;

pub use collaborators::{Clipboard, DirtySink, FileLock, HistoryStore, NoopCollaborators, SavedPosition};
pub use error::DocumentError;
pub use loader::{LoadOutcome, Loader};
pub use saver::Saver;

use core_config::EditOptions;
use core_state::{Bookmark, BookmarkList, Cursor, LineCache, Markers, Opcode, UndoCode, UndoLog};
use core_text::Buffer;
use std::path::PathBuf;
use tracing::trace;

/// Which log an edit primitive's inverse code goes into: the undo log in
/// normal operation, or the redo log while an `Undo` is being replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Undo,
    Redo,
}

/// The full state of one open buffer: text, cursor/display anchor, marks,
/// undo/redo, line-offset cache, bookmarks, and file metadata.
pub struct Document {
    pub buf: Buffer,
    pub cursor: Cursor,
    pub markers: Markers,
    pub undo: UndoLog,
    pub redo: UndoLog,
    pub bookmarks: BookmarkList,
    pub line_cache: LineCache,
    pub file_name: Option<PathBuf>,
    pub modified: bool,
    pub locked: bool,
    pub redo_stack_reset: bool,
}

impl Document {
    pub fn new(buf: Buffer, opts: &EditOptions, limits: core_config::EditorLimits) -> Self {
        Self {
            buf,
            cursor: Cursor::new(),
            markers: Markers::new(),
            undo: UndoLog::new(limits.max_undo),
            redo: UndoLog::new(limits.max_undo),
            bookmarks: BookmarkList::new(),
            line_cache: LineCache::new(limits.line_cache_seed),
            file_name: None,
            modified: false,
            locked: false,
            redo_stack_reset: false,
        }
        .with_tab_stop_hint(opts)
    }

    fn with_tab_stop_hint(self, _opts: &EditOptions) -> Self {
        // tab_stop is threaded per-call, not stored on Document; this hook
        // exists so a future per-document override has somewhere to land.
        self
    }

    /// Invalidate the line cache, flip `modified` on its first call, and
    /// (on that same first call) acquire the file lock via `lock`. Called
    /// by every edit primitive after it has mutated the buffer.
    fn modification(&mut self, lock: &dyn FileLock) {
        self.line_cache.invalidate();
        if !self.modified {
            self.modified = true;
            self.locked = lock.acquire(self.file_name.as_deref());
        }
    }

    fn log_mut(&mut self, target: LogTarget) -> &mut UndoLog {
        match target {
            LogTarget::Undo => &mut self.undo,
            LogTarget::Redo => &mut self.redo,
        }
    }

    /// Insert one byte before the cursor. Pushes the inverse
    /// (`ByteInsertBehind` would undo a `delete`; the inverse of `insert` is
    /// `backspace`, recorded as `Opcode::Backspace` so undo replays exactly
    /// one backspace) into `target`.
    pub fn insert(&mut self, c: u8, target: LogTarget, lock: &dyn FileLock) {
        self.buf.insert(c);
        let at = self.buf.curs1() - 1;
        self.markers.adjust_on_insert(at, true);
        self.bookmarks_on_insert(c);
        self.log_mut(target).push(UndoCode::Op(Opcode::Backspace));
        self.modification(lock);
        trace!(target: "model.edit", byte = c, "insert");
    }

    /// Insert one byte after the cursor without moving it. Inverse is
    /// `DelChar` (a forward delete at the same position).
    pub fn insert_ahead(&mut self, c: u8, target: LogTarget, lock: &dyn FileLock) {
        self.buf.insert_ahead(c);
        let at = self.buf.curs1();
        self.markers.adjust_on_insert(at, false);
        self.bookmarks_on_insert(c);
        self.log_mut(target).push(UndoCode::Op(Opcode::DelChar));
        self.modification(lock);
        trace!(target: "model.edit", byte = c, "insert_ahead");
    }

    /// Remove the byte after the cursor. Inverse replays as
    /// `insert_ahead(byte)`.
    pub fn delete(&mut self, target: LogTarget, lock: &dyn FileLock) -> Option<u8> {
        let at = self.buf.curs1();
        let removed = self.buf.delete()?;
        self.markers.adjust_on_delete(at);
        self.bookmarks_on_delete(removed, at);
        self.log_mut(target).push(UndoCode::ByteInsertBehind(removed));
        self.modification(lock);
        trace!(target: "model.edit", byte = removed, "delete");
        Some(removed)
    }

    /// Remove the byte before the cursor. Inverse replays as
    /// `insert(byte)`.
    pub fn backspace(&mut self, target: LogTarget, lock: &dyn FileLock) -> Option<u8> {
        let removed = self.buf.backspace()?;
        let at = self.buf.curs1();
        self.markers.adjust_on_delete(at);
        self.bookmarks_on_delete(removed, at);
        self.log_mut(target).push(UndoCode::ByteInsertAhead(removed));
        self.modification(lock);
        trace!(target: "model.edit", byte = removed, "backspace");
        Some(removed)
    }

    /// Remove the character at the cursor: one byte when `byte_delete`,
    /// otherwise the whole codepoint, by looping `delete` `char_length`
    /// times. Returns the last byte removed.
    pub fn delete_chars(&mut self, byte_delete: bool, target: LogTarget, lock: &dyn FileLock) -> Option<u8> {
        let char_length = if byte_delete { 1 } else { self.buf.get_utf(self.buf.curs1()).1 };
        let mut last = None;
        for _ in 0..char_length {
            match self.delete(target, lock) {
                Some(b) => last = Some(b),
                None => break,
            }
        }
        last
    }

    /// Remove the character before the cursor: one byte when `byte_delete`,
    /// otherwise the whole codepoint, by looping `backspace` `char_length`
    /// times. Returns the last byte removed.
    pub fn backspace_chars(&mut self, byte_delete: bool, target: LogTarget, lock: &dyn FileLock) -> Option<u8> {
        let char_length = if byte_delete { 1 } else { self.buf.get_prev_utf(self.buf.curs1()).1 };
        let mut last = None;
        for _ in 0..char_length {
            match self.backspace(target, lock) {
                Some(b) => last = Some(b),
                None => break,
            }
        }
        last
    }

    /// Shift the cursor by `delta` bytes, pushing one `CursLeft`/`CursRight`
    /// opcode per unit shifted (so undo retraces the same path byte by
    /// byte, matching the source's per-unit undo entries).
    pub fn cursor_move(&mut self, delta: i64, target: LogTarget) {
        let step: i64 = if delta >= 0 { 1 } else { -1 };
        let opcode = if delta >= 0 { Opcode::CursRight } else { Opcode::CursLeft };
        let mut remaining = delta.unsigned_abs();
        while remaining > 0 {
            let crossed_nl = if step > 0 {
                self.buf.current_byte() == b'\n'
            } else {
                self.buf.prev_byte() == b'\n'
            };
            self.buf.move_cursor(step);
            if crossed_nl {
                self.line_cache.invalidate();
            }
            self.log_mut(target).push(UndoCode::Op(opcode));
            remaining -= 1;
        }
    }

    fn bookmarks_on_insert(&mut self, c: u8) {
        if c == b'\n' {
            let line = self.buf.count_lines(0, self.buf.curs1() - 1);
            self.bookmarks.inc(line);
        }
    }

    fn bookmarks_on_delete(&mut self, removed: u8, at: usize) {
        if removed == b'\n' {
            let line = self.buf.count_lines(0, at);
            self.bookmarks.dec(line);
        }
    }

    /// Replay one undo code, writing its own inverse into the redo log (or
    /// vice versa for redo). Used by the command executor's `Undo`/`Redo`
    /// handling.
    pub fn apply_code(&mut self, code: UndoCode, inverse_target: LogTarget, lock: &dyn FileLock) {
        match code {
            UndoCode::ByteInsertAhead(b) => {
                self.insert(b, inverse_target, lock);
            }
            UndoCode::ByteInsertBehind(b) => {
                self.insert_ahead(b, inverse_target, lock);
            }
            UndoCode::Op(Opcode::CursLeft) => self.cursor_move(-1, inverse_target),
            UndoCode::Op(Opcode::CursRight) => self.cursor_move(1, inverse_target),
            UndoCode::Op(Opcode::Backspace) => {
                self.backspace(inverse_target, lock);
            }
            UndoCode::Op(Opcode::DelChar) => {
                self.delete(inverse_target, lock);
            }
            UndoCode::Op(Opcode::BackspaceBr | Opcode::DelCharBr) => {
                // bracketed variants: same byte effect, no paragraph reflow
                // side effect to replay here.
            }
            UndoCode::Op(Opcode::ColumnOn) => self.markers.column_highlight = true,
            UndoCode::Op(Opcode::ColumnOff) => self.markers.column_highlight = false,
            UndoCode::SetMark1(m) => self.markers.mark1 = m,
            UndoCode::SetMark2(m) => self.markers.mark2 = m,
            UndoCode::SetEndMarkCurs(m) => self.markers.end_mark_curs = m,
            UndoCode::KeyPress(start_display) => {
                self.cursor.start_display = start_display as usize;
            }
        }
    }

    /// Pop and replay one full command's worth of undo codes (back to the
    /// nearest key-press boundary), recording their inverses into the redo
    /// log.
    pub fn undo_command(&mut self, lock: &dyn FileLock) -> usize {
        let codes = self.undo.pop_command();
        let n = codes.len();
        for code in codes {
            self.apply_code(code, LogTarget::Redo, lock);
        }
        n
    }

    /// Symmetric `redo_command`.
    pub fn redo_command(&mut self, lock: &dyn FileLock) -> usize {
        let codes = self.redo.pop_command();
        let n = codes.len();
        for code in codes {
            self.apply_code(code, LogTarget::Undo, lock);
        }
        n
    }

    pub fn bookmark_insert(&mut self, color: u8) {
        let line = self.buf.count_lines(0, self.buf.curs1());
        self.bookmarks.insert(line, color);
    }

    pub fn bookmark_at_cursor(&self) -> Option<&Bookmark> {
        let line = self.buf.count_lines(0, self.buf.curs1());
        self.bookmarks.find(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collaborators::NoopCollaborators;
    use core_config::EditorLimits;

    fn doc(text: &[u8]) -> Document {
        Document::new(Buffer::from_bytes(text), &EditOptions::default(), EditorLimits::default())
    }

    #[test]
    fn insert_sets_modified_and_acquires_lock_once() {
        let lock = NoopCollaborators;
        let mut d = doc(b"");
        assert!(!d.modified);
        d.insert(b'a', LogTarget::Undo, &lock);
        assert!(d.modified);
        assert!(d.locked);
        d.insert(b'b', LogTarget::Undo, &lock);
        // still true, but acquire() only ever called meaningfully once per our contract
        assert!(d.modified);
    }

    #[test]
    fn insert_then_undo_restores_buffer() {
        let lock = NoopCollaborators;
        let mut d = doc(b"ab");
        d.buf.move_cursor(2);
        d.undo.push_key_press(0);
        d.insert(b'c', LogTarget::Undo, &lock);
        assert_eq!(d.buf.to_bytes(), b"abc");
        d.undo_command(&lock);
        assert_eq!(d.buf.to_bytes(), b"ab");
    }

    #[test]
    fn delete_then_undo_restores_removed_byte() {
        let lock = NoopCollaborators;
        let mut d = doc(b"abc");
        d.buf.move_cursor(-3);
        d.undo.push_key_press(0);
        d.delete(LogTarget::Undo, &lock);
        assert_eq!(d.buf.to_bytes(), b"bc");
        d.undo_command(&lock);
        assert_eq!(d.buf.to_bytes(), b"abc");
    }

    #[test]
    fn insert_shifts_markers_past_cursor() {
        let lock = NoopCollaborators;
        let mut d = doc(b"abc");
        d.markers.set(1, 3, 0, 0);
        d.buf.move_cursor(-(d.buf.size() as i64));
        d.buf.move_cursor(1);
        d.insert(b'X', LogTarget::Undo, &lock);
        assert_eq!(d.markers.mark2, 4);
    }

    #[test]
    fn delete_chars_removes_whole_codepoint_by_default() {
        let lock = NoopCollaborators;
        let mut d = doc("a\u{00e9}b".as_bytes()); // 'a', 'é' (2 bytes), 'b'
        d.buf.move_cursor(-(d.buf.size() as i64));
        d.buf.move_cursor(1);
        d.delete_chars(false, LogTarget::Undo, &lock);
        assert_eq!(d.buf.to_bytes(), b"ab");
    }

    #[test]
    fn delete_chars_removes_one_byte_when_byte_delete() {
        let lock = NoopCollaborators;
        let mut d = doc("a\u{00e9}b".as_bytes()); // 'a', 0xC3 0xA9, 'b'
        d.buf.move_cursor(-(d.buf.size() as i64));
        d.buf.move_cursor(1);
        d.delete_chars(true, LogTarget::Undo, &lock);
        // only the first byte of 'é' was removed, leaving a dangling
        // continuation byte followed by 'b'
        assert_eq!(d.buf.to_bytes(), &[b'a', 0xA9, b'b']);
    }

    #[test]
    fn backspace_chars_removes_whole_codepoint_by_default() {
        let lock = NoopCollaborators;
        let mut d = doc("a\u{00e9}b".as_bytes());
        d.buf.move_cursor(-(d.buf.size() as i64));
        d.buf.move_cursor(3); // cursor after 'é' (2 bytes), before 'b'
        d.backspace_chars(false, LogTarget::Undo, &lock);
        assert_eq!(d.buf.to_bytes(), b"ab");
    }

    #[test]
    fn newline_insert_shifts_bookmarks() {
        let lock = NoopCollaborators;
        let mut d = doc(b"line0\nline1\n");
        d.bookmarks.insert(1, 0);
        d.buf.move_cursor(-(d.buf.size() as i64));
        d.insert(b'\n', LogTarget::Undo, &lock);
        let lines: Vec<_> = d.bookmarks.iter().map(|b| b.line).collect();
        assert_eq!(lines, vec![2]);
    }
}
