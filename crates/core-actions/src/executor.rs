//! The command executor: the single entry point that turns one
//! `(command, char)` pair into buffer/cursor/marker/undo mutations.

use core_config::EditOptions;
use core_model::{Clipboard, Document, FileLock, LogTarget};
use core_state::{Opcode, UndoCode};
use core_text::motion;

use crate::command::Command;

const COLUMN_BLOCK_MAGIC: [u8; 5] = [0x01, 0x01, 0x01, 0x01, 0x0A];

/// Coarse classification of an undo code, used to decide whether two
/// consecutive commands belong to the same group-undo run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActionKind {
    /// A byte-level edit: insert, insert_ahead, delete, or backspace.
    Edit,
    /// A plain cursor move.
    Cursor,
    /// Marker/selection or column-highlight state change.
    Mark,
}

impl ActionKind {
    fn of(code: UndoCode) -> Option<Self> {
        match code {
            UndoCode::ByteInsertAhead(_) | UndoCode::ByteInsertBehind(_) => Some(ActionKind::Edit),
            UndoCode::Op(Opcode::Backspace | Opcode::DelChar | Opcode::BackspaceBr | Opcode::DelCharBr) => {
                Some(ActionKind::Edit)
            }
            UndoCode::Op(Opcode::CursLeft | Opcode::CursRight) => Some(ActionKind::Cursor),
            UndoCode::Op(Opcode::ColumnOn | Opcode::ColumnOff) => Some(ActionKind::Mark),
            UndoCode::SetMark1(_) | UndoCode::SetMark2(_) | UndoCode::SetEndMarkCurs(_) => Some(ActionKind::Mark),
            UndoCode::KeyPress(_) => None,
        }
    }
}

/// Per-session executor state: the selection gesture and the overwrite-mode
/// toggle, since everything else lives on `Document`.
#[derive(Debug, Default)]
pub struct Executor {
    highlight: bool,
    overwrite: bool,
}

impl Executor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with overwrite mode already on, per `EditOptions::overwrite`'s
    /// configured initial state.
    pub fn with_overwrite(initial: bool) -> Self {
        Self { overwrite: initial, ..Self::default() }
    }

    pub fn is_marking(&self) -> bool {
        self.highlight
    }

    pub fn is_overwrite(&self) -> bool {
        self.overwrite
    }

    /// Run one command against `doc`. `lock`/`clipboard` are the external
    /// collaborators for file-lock acquisition and block clipboard I/O.
    pub fn execute(
        &mut self,
        doc: &mut Document,
        opts: &EditOptions,
        lock: &dyn FileLock,
        clipboard: &dyn Clipboard,
        cmd: Command,
    ) {
        let is_undo_redo = matches!(cmd, Command::Undo | Command::Redo);
        if !is_undo_redo {
            doc.undo.push_key_press(doc.cursor.start_display as u64);
        }

        if cmd.is_mark_motion() {
            if !self.highlight {
                doc.markers.toggle_mark(false, doc.buf.curs1(), doc.cursor.curs_col, doc.cursor.over_col);
                self.highlight = true;
            }
        } else if cmd.is_motion() {
            self.highlight = false;
        }

        if cmd.is_forward_modification() {
            doc.redo.clear();
        }

        match cmd {
            Command::Undo => {
                if opts.group_undo {
                    self.group_undo(doc, lock);
                } else {
                    doc.undo_command(lock);
                }
            }
            Command::Redo => {
                doc.redo_command(lock);
            }
            Command::InsertChar(c) => self.insert_char(doc, opts, lock, c),
            Command::Tab => self.insert_tab(doc, opts, lock),
            Command::Enter => self.enter(doc, opts, lock),
            Command::Backspace => self.backspace_cmd(doc, opts, lock),
            Command::DelChar => {
                doc.delete_chars(opts.byte_delete, LogTarget::Undo, lock);
            }
            Command::Left | Command::MarkLeft => self.step_cursor(doc, opts, -1),
            Command::Right | Command::MarkRight => self.step_cursor(doc, opts, 1),
            Command::Up | Command::MarkUp => self.vertical(doc, opts, -1),
            Command::Down | Command::MarkDown => self.vertical(doc, opts, 1),
            Command::WordLeft | Command::MarkWordLeft => self.word_motion(doc, opts, false),
            Command::WordRight | Command::MarkWordRight => self.word_motion(doc, opts, true),
            Command::ParagraphForward => self.paragraph_motion(doc, opts, true),
            Command::ParagraphBackward => self.paragraph_motion(doc, opts, false),
            Command::PageUp => self.page_motion(doc, opts, -1),
            Command::PageDown => self.page_motion(doc, opts, 1),
            Command::Home | Command::MarkHome => self.home(doc, opts),
            Command::End | Command::MarkEnd => self.end(doc, opts),
            Command::Top | Command::MarkTop => self.goto_offset(doc, opts, 0),
            Command::Bottom | Command::MarkBottom => {
                let size = doc.buf.size();
                self.goto_offset(doc, opts, size);
            }
            Command::BlockShiftLeft => self.block_shift(doc, opts, lock, false),
            Command::BlockShiftRight => self.block_shift(doc, opts, lock, true),
            Command::Copy => self.clipboard_copy(doc, opts, clipboard),
            Command::Cut => self.clipboard_cut(doc, opts, lock, clipboard),
            Command::Paste => self.clipboard_paste(doc, opts, lock, clipboard),
            Command::Remove => {
                if let Some((start, end)) = doc.markers.evaluate(&doc.buf, opts.tab_stop) {
                    self.delete_range(doc, lock, start, end);
                }
            }
            Command::ColumnHighlightToggle => {
                doc.markers.column_highlight = !doc.markers.column_highlight;
                let opcode = if doc.markers.column_highlight { Opcode::ColumnOn } else { Opcode::ColumnOff };
                doc.undo.push(UndoCode::Op(opcode));
            }
            Command::OverwriteToggle => self.overwrite = !self.overwrite,
            Command::MatchBracket => self.match_bracket(doc),
        }

        if self.highlight {
            doc.markers.end_mark_curs = doc.buf.curs1() as i64;
        }
    }

    /// Pops the most recent command, then keeps popping and replaying
    /// further commands as long as each one's outermost code is the same
    /// kind as the last — giving word-level granularity to typing instead
    /// of reversing one character at a time.
    fn group_undo(&mut self, doc: &mut Document, lock: &dyn FileLock) {
        let Some(mut prev_kind) = Self::apply_undo_group(doc, lock) else { return };
        while let Some(top) = doc.undo.peek() {
            if ActionKind::of(top) != Some(prev_kind) {
                break;
            }
            let Some(kind) = Self::apply_undo_group(doc, lock) else { break };
            prev_kind = kind;
        }
    }

    /// Pop one key-press-bounded command off the undo log and replay it,
    /// returning the kind of its outermost code (the first one popped).
    fn apply_undo_group(doc: &mut Document, lock: &dyn FileLock) -> Option<ActionKind> {
        if doc.undo.is_empty() {
            return None;
        }
        let codes = doc.undo.pop_command();
        let kind = codes.iter().copied().find_map(ActionKind::of);
        for code in codes {
            doc.apply_code(code, LogTarget::Redo, lock);
        }
        kind
    }

    fn step_cursor(&mut self, doc: &mut Document, opts: &EditOptions, delta: i64) {
        let at_bound = if delta > 0 { doc.buf.curs1() >= doc.buf.size() } else { doc.buf.curs1() == 0 };
        if at_bound {
            return;
        }
        let step = Self::fake_half_tab_step(doc, opts, delta);
        doc.cursor_move(step, LogTarget::Undo);
        doc.cursor.sync_col(&doc.buf, opts.tab_stop);
    }

    /// In `fake_half_tabs` mode, within the indent region and aligned on a
    /// half-tab-stop, `Left`/`Right` step by the whole half-tab-stop instead
    /// of one byte, the way `backspace_cmd`/`insert_tab` already snap to it.
    fn fake_half_tab_step(doc: &Document, opts: &EditOptions, delta: i64) -> i64 {
        if !opts.fake_half_tabs {
            return delta;
        }
        let half = opts.tab_stop / 2;
        if half == 0 {
            return delta;
        }
        let cur = doc.buf.curs1();
        let bol = doc.buf.bol(cur);
        let col = doc.buf.visual_col(bol, cur, opts.tab_stop);
        if col % half != 0 {
            return delta;
        }
        let (span_start, span_end) = if delta > 0 { (cur, cur + half) } else { (cur.saturating_sub(half), cur) };
        let within_indent = span_start >= bol && span_end <= doc.buf.eol(bol);
        let all_spaces = within_indent && (span_start..span_end).all(|i| doc.buf.byte_at(i as i64) == b' ');
        if all_spaces {
            if delta > 0 { half as i64 } else { -(half as i64) }
        } else {
            delta
        }
    }

    fn vertical(&mut self, doc: &mut Document, opts: &EditOptions, n: i64) {
        doc.cursor.move_updown(&mut doc.buf, n, opts.cursor_beyond_eol, opts.tab_stop);
    }

    fn word_motion(&mut self, doc: &mut Document, opts: &EditOptions, forward: bool) {
        let target = if forward {
            motion::right_word_move(&doc.buf, doc.buf.curs1())
        } else {
            motion::left_word_move(&doc.buf, doc.buf.curs1())
        };
        let delta = target as i64 - doc.buf.curs1() as i64;
        doc.buf.move_cursor(delta);
        doc.line_cache.invalidate();
        doc.cursor.sync_col(&doc.buf, opts.tab_stop);
    }

    fn paragraph_motion(&mut self, doc: &mut Document, opts: &EditOptions, forward: bool) {
        let target = if forward {
            motion::forward_paragraph(&doc.buf, doc.buf.curs1())
        } else {
            motion::backward_paragraph(&doc.buf, doc.buf.curs1())
        };
        let delta = target as i64 - doc.buf.curs1() as i64;
        doc.buf.move_cursor(delta);
        doc.line_cache.invalidate();
        doc.cursor.sync_col(&doc.buf, opts.tab_stop);
    }

    fn page_motion(&mut self, doc: &mut Document, opts: &EditOptions, pages: i64) {
        const ROWS_PER_PAGE: i64 = 24;
        self.vertical(doc, opts, pages * ROWS_PER_PAGE);
    }

    fn home(&mut self, doc: &mut Document, opts: &EditOptions) {
        let bol = doc.buf.bol(doc.buf.curs1());
        let delta = bol as i64 - doc.buf.curs1() as i64;
        doc.buf.move_cursor(delta);
        doc.cursor.sync_col(&doc.buf, opts.tab_stop);
    }

    fn end(&mut self, doc: &mut Document, opts: &EditOptions) {
        let eol = doc.buf.eol(doc.buf.curs1());
        let delta = eol as i64 - doc.buf.curs1() as i64;
        doc.buf.move_cursor(delta);
        doc.cursor.sync_col(&doc.buf, opts.tab_stop);
    }

    fn goto_offset(&mut self, doc: &mut Document, opts: &EditOptions, target: usize) {
        let delta = target as i64 - doc.buf.curs1() as i64;
        doc.buf.move_cursor(delta);
        doc.line_cache.invalidate();
        doc.cursor.sync_col(&doc.buf, opts.tab_stop);
    }

    /// §4.H.4: non-persistent selection deletion, overwrite-mode deletion,
    /// over-column materialization, then the byte insert itself.
    fn insert_char(&mut self, doc: &mut Document, opts: &EditOptions, lock: &dyn FileLock, c: char) {
        if !opts.persistent_selections {
            if let Some((start, end)) = doc.markers.evaluate(&doc.buf, opts.tab_stop) {
                self.delete_range(doc, lock, start, end);
            }
        }
        if self.overwrite && doc.buf.current_byte() != b'\n' {
            // whole codepoint, regardless of `byte_delete`: overwrite
            // replaces one typed char with one existing char, never a
            // lone continuation byte.
            doc.delete_chars(false, LogTarget::Undo, lock);
        }
        if doc.cursor.over_col > 0 {
            let spaces = doc.cursor.over_col;
            for _ in 0..spaces {
                doc.insert(b' ', LogTarget::Undo, lock);
            }
            doc.cursor.over_col = 0;
        }
        let mut encode_buf = [0u8; 4];
        let bytes = c.encode_utf8(&mut encode_buf).as_bytes();
        for &b in bytes {
            doc.insert(b, LogTarget::Undo, lock);
        }
        doc.cursor.sync_col(&doc.buf, opts.tab_stop);
        if opts.typewriter_wrap {
            self.wrap_if_needed(doc, opts, lock);
        }
    }

    /// Typewriter-style wrap: once the current line runs past
    /// `word_wrap_line_length`, replace the nearest preceding space with a
    /// newline and restore the cursor to its original (content) position.
    fn wrap_if_needed(&mut self, doc: &mut Document, opts: &EditOptions, lock: &dyn FileLock) {
        let orig_curs = doc.buf.curs1();
        let bol = doc.buf.bol(orig_curs);
        let col = doc.buf.visual_col(bol, orig_curs, opts.tab_stop);
        if col <= opts.word_wrap_line_length as usize {
            return;
        }
        let mut break_at = orig_curs;
        while break_at > bol && doc.buf.byte_at(break_at as i64 - 1) != b' ' {
            break_at -= 1;
        }
        if break_at <= bol {
            return;
        }
        let delta = (break_at - 1) as i64 - doc.buf.curs1() as i64;
        doc.buf.move_cursor(delta);
        doc.delete(LogTarget::Undo, lock);
        doc.insert(b'\n', LogTarget::Undo, lock);
        let delta = orig_curs as i64 - doc.buf.curs1() as i64;
        doc.buf.move_cursor(delta);
        doc.cursor.sync_col(&doc.buf, opts.tab_stop);
    }

    /// Plain backspace, except within leading indent where `fake_half_tabs`
    /// deletes a whole half-tab-stop of spaces at once, and
    /// `backspace_through_tabs` deletes back to the start of the line.
    fn backspace_cmd(&mut self, doc: &mut Document, opts: &EditOptions, lock: &dyn FileLock) {
        let cur = doc.buf.curs1();
        let bol = doc.buf.bol(cur);
        let in_indent = cur > bol && (bol..cur).all(|i| matches!(doc.buf.byte_at(i as i64), b' ' | b'\t'));

        if in_indent && opts.fake_half_tabs {
            let col = doc.buf.visual_col(bol, cur, opts.tab_stop);
            let half = opts.tab_stop / 2;
            if half > 0 && col >= half && col % half == 0 {
                for _ in 0..half {
                    doc.backspace(LogTarget::Undo, lock);
                }
                doc.cursor.sync_col(&doc.buf, opts.tab_stop);
                return;
            }
        }
        if in_indent && opts.backspace_through_tabs {
            while doc.buf.curs1() > bol {
                doc.backspace(LogTarget::Undo, lock);
            }
            doc.cursor.sync_col(&doc.buf, opts.tab_stop);
            return;
        }
        doc.backspace_chars(opts.byte_delete, LogTarget::Undo, lock);
        doc.cursor.sync_col(&doc.buf, opts.tab_stop);
    }

    fn insert_tab(&mut self, doc: &mut Document, opts: &EditOptions, lock: &dyn FileLock) {
        let bol = doc.buf.bol(doc.buf.curs1());
        let in_indent = (bol..doc.buf.curs1()).all(|i| doc.buf.byte_at(i as i64) == b' ' || doc.buf.byte_at(i as i64) == b'\t');
        let col = doc.buf.visual_col(bol, doc.buf.curs1(), opts.tab_stop);

        if opts.fake_half_tabs && in_indent {
            let half = opts.tab_stop / 2;
            let next_half_stop = ((col / half) + 1) * half;
            let to_insert = next_half_stop - col;
            for _ in 0..to_insert {
                doc.insert(b' ', LogTarget::Undo, lock);
            }
        } else if opts.fill_tabs_with_spaces {
            let next_stop = ((col / opts.tab_stop) + 1) * opts.tab_stop;
            for _ in 0..(next_stop - col) {
                doc.insert(b' ', LogTarget::Undo, lock);
            }
        } else {
            doc.insert(b'\t', LogTarget::Undo, lock);
        }
        doc.cursor.sync_col(&doc.buf, opts.tab_stop);
    }

    fn enter(&mut self, doc: &mut Document, opts: &EditOptions, lock: &dyn FileLock) {
        doc.insert(b'\n', LogTarget::Undo, lock);

        if opts.return_does_auto_indent {
            let prev_line_bol = doc.buf.bol(doc.buf.backward_offset(doc.buf.curs1(), 1));
            let prev_line_eol = doc.buf.eol(prev_line_bol);
            let mut i = prev_line_bol;
            while i < prev_line_eol && matches!(doc.buf.byte_at(i as i64), b' ' | b'\t') {
                doc.insert(doc.buf.byte_at(i as i64), LogTarget::Undo, lock);
                i += 1;
            }
        }

        if opts.auto_para_formatting {
            let cur = doc.buf.curs1();
            let prev_blank = motion::is_blank_line(&doc.buf, doc.buf.bol(doc.buf.backward_offset(cur, 1)));
            let next_blank = motion::is_blank_line(&doc.buf, cur);
            if !prev_blank && !next_blank {
                doc.insert(b'\n', LogTarget::Undo, lock);
            }
        }
        doc.cursor.sync_col(&doc.buf, opts.tab_stop);
    }

    fn block_shift(&mut self, doc: &mut Document, opts: &EditOptions, lock: &dyn FileLock, right: bool) {
        let Some((start, end)) = doc.markers.evaluate(&doc.buf, opts.tab_stop) else { return };
        let start_line = doc.buf.count_lines(0, start);
        let end_line = doc.buf.count_lines(0, end);
        for line in (start_line..=end_line).rev() {
            let bol = doc.line_cache.find_line(&doc.buf, line, opts.tab_stop);
            let delta = bol as i64 - doc.buf.curs1() as i64;
            doc.buf.move_cursor(delta);
            if right {
                if opts.fill_tabs_with_spaces {
                    for _ in 0..opts.tab_stop {
                        doc.insert(b' ', LogTarget::Undo, lock);
                    }
                } else {
                    doc.insert(b'\t', LogTarget::Undo, lock);
                }
            } else {
                self.unindent_one(doc, opts, lock);
            }
        }
    }

    fn unindent_one(&mut self, doc: &mut Document, opts: &EditOptions, lock: &dyn FileLock) {
        if doc.buf.current_byte() == b'\t' {
            doc.delete(LogTarget::Undo, lock);
            return;
        }
        let mut removed = 0;
        while removed < opts.tab_stop && doc.buf.current_byte() == b' ' {
            doc.delete(LogTarget::Undo, lock);
            removed += 1;
        }
    }

    fn clipboard_copy(&mut self, doc: &Document, opts: &EditOptions, clipboard: &dyn Clipboard) {
        if let Some((start, end)) = doc.markers.evaluate(&doc.buf, opts.tab_stop) {
            clipboard.set(self.extract(doc, start, end));
        }
    }

    fn clipboard_cut(&mut self, doc: &mut Document, opts: &EditOptions, lock: &dyn FileLock, clipboard: &dyn Clipboard) {
        if let Some((start, end)) = doc.markers.evaluate(&doc.buf, opts.tab_stop) {
            clipboard.set(self.extract(doc, start, end));
            self.delete_range(doc, lock, start, end);
        }
    }

    fn clipboard_paste(&mut self, doc: &mut Document, opts: &EditOptions, lock: &dyn FileLock, clipboard: &dyn Clipboard) {
        let Some(mut payload) = clipboard.get() else { return };
        let column_mode = payload.starts_with(&COLUMN_BLOCK_MAGIC);
        if column_mode {
            payload.drain(0..COLUMN_BLOCK_MAGIC.len());
            self.clipboard_paste_column(doc, opts, lock, &payload);
            return;
        }
        for &b in &payload {
            doc.insert(b, LogTarget::Undo, lock);
        }
        if !opts.cursor_after_inserted_block {
            let delta = -(payload.len() as i64);
            doc.buf.move_cursor(delta);
        }
        doc.cursor.sync_col(&doc.buf, opts.tab_stop);
    }

    /// A column-block payload has one byte per line, all landing at the
    /// cursor's visual column on successive lines starting at the cursor's
    /// own line.
    fn clipboard_paste_column(&mut self, doc: &mut Document, opts: &EditOptions, lock: &dyn FileLock, payload: &[u8]) {
        let start = doc.buf.curs1();
        let start_bol = doc.buf.bol(start);
        let col = doc.buf.visual_col(start_bol, start, opts.tab_stop);
        let start_line = doc.buf.count_lines(0, start);
        for (i, &b) in payload.iter().enumerate() {
            let bol = doc.line_cache.find_line(&doc.buf, start_line + i, opts.tab_stop);
            let eol = doc.buf.eol(bol);
            let target = doc.buf.byte_for_col(bol, eol, col, opts.tab_stop);
            let delta = target as i64 - doc.buf.curs1() as i64;
            doc.buf.move_cursor(delta);
            doc.insert(b, LogTarget::Undo, lock);
        }
        doc.cursor.sync_col(&doc.buf, opts.tab_stop);
    }

    fn extract(&self, doc: &Document, start: usize, end: usize) -> Vec<u8> {
        (start..end).map(|i| doc.buf.byte_at(i as i64)).collect()
    }

    fn delete_range(&mut self, doc: &mut Document, lock: &dyn FileLock, start: usize, end: usize) {
        let delta = start as i64 - doc.buf.curs1() as i64;
        doc.buf.move_cursor(delta);
        for _ in start..end {
            doc.delete(LogTarget::Undo, lock);
        }
        doc.markers.set(0, 0, 0, 0);
    }

    fn match_bracket(&mut self, doc: &mut Document) {
        const DEFAULT_FURTHEST: usize = 10_000;
        if let Some(target) = motion::match_bracket(&doc.buf, doc.buf.curs1(), DEFAULT_FURTHEST, None) {
            let delta = target as i64 - doc.buf.curs1() as i64;
            doc.buf.move_cursor(delta);
            doc.line_cache.invalidate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_config::{EditOptions, EditorLimits};
    use core_model::{Document, NoopCollaborators};
    use core_text::Buffer;
    use std::cell::RefCell;

    fn doc(text: &[u8]) -> Document {
        let mut d = Document::new(Buffer::from_bytes(text), &EditOptions::default(), EditorLimits::default());
        d.buf.move_cursor(-(d.buf.size() as i64));
        d
    }

    #[test]
    fn group_undo_merges_contiguous_inserts_into_one_command() {
        let opts = EditOptions { group_undo: true, ..EditOptions::default() };
        let mut d = doc(b"");
        let lock = NoopCollaborators;
        let mut exec = Executor::new();
        for c in "foo bar".chars() {
            exec.execute(&mut d, &opts, &lock, &lock, Command::InsertChar(c));
        }
        assert_eq!(d.buf.to_bytes(), b"foo bar");
        exec.execute(&mut d, &opts, &lock, &lock, Command::Undo);
        assert_eq!(d.buf.to_bytes(), b"");
    }

    #[test]
    fn group_undo_stops_at_a_different_action_kind() {
        let opts = EditOptions { group_undo: true, ..EditOptions::default() };
        let mut d = doc(b"");
        let lock = NoopCollaborators;
        let mut exec = Executor::new();
        exec.execute(&mut d, &opts, &lock, &lock, Command::InsertChar('a'));
        exec.execute(&mut d, &opts, &lock, &lock, Command::InsertChar('b'));
        exec.execute(&mut d, &opts, &lock, &lock, Command::Left);
        exec.execute(&mut d, &opts, &lock, &lock, Command::InsertChar('c'));
        assert_eq!(d.buf.to_bytes(), b"acb");
        exec.execute(&mut d, &opts, &lock, &lock, Command::Undo);
        // undoes only the trailing 'c' insert, not the cursor move or the
        // earlier inserts, since each is a different action kind
        assert_eq!(d.buf.to_bytes(), b"ab");
    }

    #[derive(Default)]
    struct FakeClipboard {
        payload: RefCell<Option<Vec<u8>>>,
    }
    impl Clipboard for FakeClipboard {
        fn set(&self, bytes: Vec<u8>) {
            *self.payload.borrow_mut() = Some(bytes);
        }
        fn get(&self) -> Option<Vec<u8>> {
            self.payload.borrow().clone()
        }
    }

    #[test]
    fn column_paste_lands_one_byte_per_line() {
        let opts = EditOptions::default();
        let mut d = doc(b"aaa\nbbb\nccc\n");
        let lock = NoopCollaborators;
        let mut exec = Executor::new();
        d.buf.move_cursor(1); // offset 1 of line 0
        let clipboard = FakeClipboard::default();
        clipboard.set([&COLUMN_BLOCK_MAGIC[..], b"XYZ"].concat());
        exec.execute(&mut d, &opts, &lock, &clipboard, Command::Paste);
        assert_eq!(d.buf.to_bytes(), b"aXaa\nbYbb\ncZcc\n");
    }

    #[test]
    fn fake_half_tab_backspace_deletes_four_spaces() {
        let opts = EditOptions { fake_half_tabs: true, ..EditOptions::default() };
        let mut d = doc(b"        foo");
        let lock = NoopCollaborators;
        let mut exec = Executor::new();
        d.buf.move_cursor(8);
        exec.execute(&mut d, &opts, &lock, &lock, Command::Backspace);
        assert_eq!(d.buf.to_bytes(), b"    foo");
    }

    #[test]
    fn typewriter_wrap_breaks_at_previous_space() {
        let opts = EditOptions { typewriter_wrap: true, word_wrap_line_length: 10, ..EditOptions::default() };
        let mut d = doc(b"0123456789 ");
        d.buf.move_cursor(11);
        let lock = NoopCollaborators;
        let mut exec = Executor::new();
        exec.execute(&mut d, &opts, &lock, &lock, Command::InsertChar('x'));
        assert_eq!(d.buf.to_bytes(), b"0123456789\nx");
    }

    #[test]
    fn del_char_removes_whole_codepoint_by_default() {
        let opts = EditOptions::default();
        let mut d = doc("a\u{00e9}b".as_bytes());
        d.buf.move_cursor(1);
        let lock = NoopCollaborators;
        let mut exec = Executor::new();
        exec.execute(&mut d, &opts, &lock, &lock, Command::DelChar);
        assert_eq!(d.buf.to_bytes(), b"ab");
    }

    #[test]
    fn del_char_removes_one_byte_when_byte_delete_is_set() {
        let opts = EditOptions { byte_delete: true, ..EditOptions::default() };
        let mut d = doc("a\u{00e9}b".as_bytes());
        d.buf.move_cursor(1);
        let lock = NoopCollaborators;
        let mut exec = Executor::new();
        exec.execute(&mut d, &opts, &lock, &lock, Command::DelChar);
        assert_eq!(d.buf.to_bytes(), &[b'a', 0xA9, b'b']);
    }

    #[test]
    fn overwrite_mode_replaces_character_under_cursor() {
        let opts = EditOptions::default();
        let mut d = doc(b"abc");
        let lock = NoopCollaborators;
        let mut exec = Executor::with_overwrite(true);
        exec.execute(&mut d, &opts, &lock, &lock, Command::InsertChar('X'));
        assert_eq!(d.buf.to_bytes(), b"Xbc");
    }

    #[test]
    fn overwrite_mode_does_not_eat_newline() {
        let opts = EditOptions::default();
        let mut d = doc(b"\nbc");
        let lock = NoopCollaborators;
        let mut exec = Executor::with_overwrite(true);
        exec.execute(&mut d, &opts, &lock, &lock, Command::InsertChar('X'));
        assert_eq!(d.buf.to_bytes(), b"X\nbc");
    }

    #[test]
    fn fake_half_tab_right_steps_a_half_tab_stop_at_once() {
        let opts = EditOptions { fake_half_tabs: true, ..EditOptions::default() };
        let mut d = doc(b"        foo");
        let lock = NoopCollaborators;
        let mut exec = Executor::new();
        exec.execute(&mut d, &opts, &lock, &lock, Command::Right);
        assert_eq!(d.buf.curs1(), 4);
    }

    #[test]
    fn match_bracket_command_jumps_to_partner() {
        let opts = EditOptions::default();
        let mut d = doc(b"{ foo { bar } baz }");
        let lock = NoopCollaborators;
        let mut exec = Executor::new();
        exec.execute(&mut d, &opts, &lock, &lock, Command::MatchBracket);
        assert_eq!(d.buf.curs1(), d.buf.size() - 1);
    }
}
