//! Compressed undo/redo log.
//!
//! The source packs actions, byte values, markers, and key-press boundaries
//! into overlapping ranges of a signed integer. We use a tagged variant
//! instead (`UndoCode`) and let run-length compression and the key-press
//! group structure do the memory bounding, rather than bit-packing. A
//! `VecDeque` capped at `max_undo` logical entries, with eviction of the
//! oldest whole key-press group when the cap is hit, gives the same
//! externally observable behavior as the source's power-of-two ring with a
//! `bottom` pointer that advances past one group at a time.

use std::collections::VecDeque;
use tracing::trace;

/// Cursor/edit opcodes recorded as undo entries in their own right (distinct
/// from the byte-valued insert codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    CursLeft,
    CursRight,
    Backspace,
    DelChar,
    BackspaceBr,
    DelCharBr,
    ColumnOn,
    ColumnOff,
}

/// A single undo action. Applying it (in `Document::apply_undo_code`)
/// replays the inverse of whatever edit produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoCode {
    /// Inverse of `backspace`: replay as `insert(byte)`.
    ByteInsertAhead(u8),
    /// Inverse of `delete`: replay as `insert_ahead(byte)`.
    ByteInsertBehind(u8),
    Op(Opcode),
    SetMark1(i64),
    SetMark2(i64),
    SetEndMarkCurs(i64),
    /// Key-press boundary; carries the saved `start_display` so redisplay
    /// scroll position is restored along with the edit.
    KeyPress(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Single(UndoCode),
    Run { code: UndoCode, count: u32 },
}

impl Cell {
    fn code(&self) -> UndoCode {
        match self {
            Cell::Single(c) => *c,
            Cell::Run { code, .. } => *code,
        }
    }

    fn logical_len(&self) -> usize {
        match self {
            Cell::Single(_) => 1,
            Cell::Run { count, .. } => *count as usize,
        }
    }
}

pub struct UndoLog {
    cells: VecDeque<Cell>,
    max_undo: usize,
    logical_len: usize,
}

impl UndoLog {
    pub fn new(max_undo: usize) -> Self {
        Self {
            cells: VecDeque::new(),
            max_undo,
            logical_len: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn logical_len(&self) -> usize {
        self.logical_len
    }

    /// Push one undo code, compressing into a run if it repeats the
    /// previous code (key-press boundaries included: an identical
    /// consecutive key-press simply collapses, matching the source's
    /// "no need to record a second identical one").
    pub fn push(&mut self, code: UndoCode) {
        match self.cells.back_mut() {
            Some(cell) if cell.code() == code && matches!(code, UndoCode::KeyPress(_)) => {
                // identical boundary: no-op, do not grow the log
                return;
            }
            Some(Cell::Single(c)) if *c == code => {
                self.cells.pop_back();
                self.cells.push_back(Cell::Run { code, count: 2 });
                self.logical_len += 1;
            }
            Some(Cell::Run { code: c, count }) if *c == code => {
                *count += 1;
                self.logical_len += 1;
            }
            _ => {
                self.cells.push_back(Cell::Single(code));
                self.logical_len += 1;
            }
        }
        trace!(target: "state.undo", logical_len = self.logical_len, ?code, "push");
        self.enforce_bound();
    }

    pub fn push_key_press(&mut self, start_display: u64) {
        self.push(UndoCode::KeyPress(start_display));
    }

    /// Discard all entries, keeping the bound. Used to reset the redo log
    /// on any forward modification.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.logical_len = 0;
    }

    fn enforce_bound(&mut self) {
        while self.logical_len > self.max_undo {
            let Some(front) = self.cells.front() else { break };
            let was_boundary = matches!(front.code(), UndoCode::KeyPress(_));
            let popped = self.cells.pop_front().unwrap();
            self.logical_len -= popped.logical_len();
            if was_boundary {
                // Also drop the rest of that group: every entry up to (but
                // not including) the next boundary, mirroring "bottom
                // advances forward past one full key-press group".
                while let Some(next) = self.cells.front() {
                    if matches!(next.code(), UndoCode::KeyPress(_)) {
                        break;
                    }
                    let next = self.cells.pop_front().unwrap();
                    self.logical_len -= next.logical_len();
                }
            }
        }
        trace!(target: "state.undo", logical_len = self.logical_len, "bound_enforced");
    }

    /// Pop the next code off the top of the log (most recently pushed
    /// first). Runs are consumed one repetition at a time.
    pub fn pop(&mut self) -> Option<UndoCode> {
        let back = self.cells.back_mut()?;
        match back {
            Cell::Single(_) => {
                let cell = self.cells.pop_back().unwrap();
                self.logical_len -= 1;
                Some(cell.code())
            }
            Cell::Run { code, count } => {
                let c = *code;
                if *count > 2 {
                    *count -= 1;
                } else {
                    self.cells.pop_back();
                    self.cells.push_back(Cell::Single(c));
                }
                self.logical_len -= 1;
                Some(c)
            }
        }
    }

    pub fn peek(&self) -> Option<UndoCode> {
        self.cells.back().map(Cell::code)
    }

    /// Pop every code belonging to the most recent command (back to, and
    /// including, the nearest `KeyPress` boundary). Used so one `Undo`
    /// reverses a full user command rather than a single primitive.
    pub fn pop_command(&mut self) -> Vec<UndoCode> {
        let mut out = Vec::new();
        while let Some(code) = self.pop() {
            let is_boundary = matches!(code, UndoCode::KeyPress(_));
            out.push(code);
            if is_boundary {
                break;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_pushes_compress_into_a_run() {
        let mut log = UndoLog::new(1000);
        for _ in 0..5 {
            log.push(UndoCode::Op(Opcode::CursLeft));
        }
        assert_eq!(log.logical_len(), 5);
        assert_eq!(log.cells.len(), 1);
        for _ in 0..5 {
            assert_eq!(log.pop(), Some(UndoCode::Op(Opcode::CursLeft)));
        }
        assert_eq!(log.pop(), None);
    }

    #[test]
    fn identical_key_press_collapses() {
        let mut log = UndoLog::new(1000);
        log.push_key_press(10);
        log.push_key_press(10);
        assert_eq!(log.logical_len(), 1);
    }

    #[test]
    fn pop_command_stops_at_boundary() {
        let mut log = UndoLog::new(1000);
        log.push_key_press(0);
        log.push(UndoCode::ByteInsertAhead(b'a'));
        log.push(UndoCode::ByteInsertAhead(b'b'));
        log.push_key_press(1);
        log.push(UndoCode::ByteInsertAhead(b'c'));

        let group = log.pop_command();
        assert_eq!(group, vec![UndoCode::ByteInsertAhead(b'c'), UndoCode::KeyPress(1)]);
        let group2 = log.pop_command();
        assert_eq!(
            group2,
            vec![
                UndoCode::ByteInsertAhead(b'b'),
                UndoCode::ByteInsertAhead(b'a'),
                UndoCode::KeyPress(0)
            ]
        );
        assert!(log.is_empty());
    }

    #[test]
    fn bound_evicts_oldest_group() {
        let mut log = UndoLog::new(4);
        log.push_key_press(0);
        log.push(UndoCode::ByteInsertAhead(1));
        log.push(UndoCode::ByteInsertAhead(2));
        log.push_key_press(1);
        log.push(UndoCode::ByteInsertAhead(3));
        assert!(log.logical_len() <= 4);
        // the oldest group (key-press 0 + its two inserts) should be gone
        let remaining: Vec<_> = std::iter::from_fn(|| log.pop()).collect();
        assert!(!remaining.contains(&UndoCode::ByteInsertAhead(1)));
    }
}
