//! Cursor & display anchor (column cache, sticky column, scroll anchor).
//!
//! This type tracks the derived cursor state that sits *above* the buffer's
//! own split point: visual column, the column remembered across vertical
//! moves, virtual over-EOL columns, and the scroll anchor. None of these are
//! recoverable from `curs1` alone, which is why they are not part of
//! [`core_text::Buffer`].

use core_text::Buffer;

fn is_utf8_continuation(b: u8) -> bool {
    b & 0b1100_0000 == 0b1000_0000
}

/// Cursor-adjacent display state: visual column, sticky column, virtual
/// over-EOL column, and the scroll anchor (`start_*`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub curs_col: usize,
    pub prev_col: usize,
    pub over_col: usize,
    pub start_display: usize,
    pub start_line: usize,
    pub start_col: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute `curs_col` from the buffer's actual cursor position.
    pub fn sync_col(&mut self, buf: &Buffer, tab_stop: usize) {
        let bol = buf.bol(buf.curs1());
        self.curs_col = buf.visual_col(bol, buf.curs1(), tab_stop);
        self.prev_col = self.curs_col;
        self.over_col = 0;
    }

    /// Position the cursor on the line starting at `anchor_bol`, at the
    /// sticky visual column `prev_col`. With `cursor_beyond_eol`, columns
    /// past EOL are kept virtually in `over_col`; otherwise the cursor snaps
    /// to end-of-line.
    ///
    /// Read literally, the target column would be `prev_col + over_col`, but
    /// feeding `over_col` back in compounds across repeated vertical moves
    /// onto short lines: landing on a 2-column line from column 4 sets
    /// `over_col` to 2, and the next move down would then aim for column 6
    /// instead of returning to the original column 4. `prev_col` alone is
    /// the sticky target; `over_col` is recomputed fresh each move.
    pub fn move_to_col(&mut self, buf: &mut Buffer, anchor_bol: usize, cursor_beyond_eol: bool, tab_stop: usize) {
        let target_col = self.prev_col;
        let eol = buf.eol(anchor_bol);
        let byte = buf.byte_for_col(anchor_bol, eol, target_col, tab_stop);
        let actual_col = buf.visual_col(anchor_bol, byte, tab_stop);
        let delta = byte as i64 - buf.curs1() as i64;
        buf.move_cursor(delta);
        self.curs_col = actual_col;
        self.over_col = if cursor_beyond_eol && actual_col < target_col {
            target_col - actual_col
        } else {
            0
        };
    }

    /// Move `n` lines up (`n < 0`) or down (`n > 0`), landing at the sticky
    /// column, then nudge onto a character boundary if the width
    /// computation left the cursor mid-codepoint.
    pub fn move_updown(&mut self, buf: &mut Buffer, n: i64, cursor_beyond_eol: bool, tab_stop: usize) {
        if n == 0 {
            return;
        }
        let cur_bol = buf.bol(buf.curs1());
        let target_bol = if n > 0 {
            buf.forward_offset(cur_bol, n as usize, 0, tab_stop)
        } else {
            buf.backward_offset(cur_bol, (-n) as usize)
        };
        self.move_to_col(buf, target_bol, cursor_beyond_eol, tab_stop);
        self.snap_to_char_boundary(buf);
    }

    fn snap_to_char_boundary(&self, buf: &mut Buffer) {
        let pos = buf.curs1();
        if pos < buf.size() && is_utf8_continuation(buf.byte_at(pos as i64)) {
            let mut back = 0i64;
            let mut p = pos;
            while p > 0 && is_utf8_continuation(buf.byte_at(p as i64)) {
                p -= 1;
                back += 1;
            }
            if back > 0 {
                buf.move_cursor(-back);
            }
        }
    }
}
