//! Marks and the stream/column selection they delimit.
//!
//! `mark2 == -1` means "selection follows the cursor" (a live gesture in
//! progress); `mark1 == mark2` means no selection at all. This mirrors the
//! source's three observable states (none / following / finalized) without
//! needing a separate enum, because the two marker fields already encode it.

use core_text::Buffer;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Markers {
    pub mark1: i64,
    pub mark2: i64,
    pub end_mark_curs: i64,
    pub column1: usize,
    pub column2: usize,
    pub column_highlight: bool,
}

impl Markers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, m1: i64, m2: i64, c1: usize, c2: usize) {
        self.mark1 = m1;
        self.mark2 = m2;
        self.column1 = c1;
        self.column2 = c2;
    }

    /// Advance the mark state machine. `curs_col`/`over_col` are the cursor's
    /// current visual column state, recorded into `column1`/`column2` on
    /// transition.
    pub fn toggle_mark(&mut self, unmark: bool, curs1: usize, curs_col: usize, over_col: usize) {
        if unmark {
            self.mark1 = 0;
            self.mark2 = 0;
            self.column1 = 0;
            self.column2 = 0;
            self.end_mark_curs = 0;
            return;
        }
        if self.mark2 >= 0 {
            self.mark1 = curs1 as i64;
            self.mark2 = -1;
            self.end_mark_curs = -1;
            self.column1 = curs_col + over_col;
            self.column2 = self.column1;
        } else {
            self.mark2 = curs1 as i64;
            self.column2 = curs_col + over_col;
            self.end_mark_curs = curs1 as i64;
        }
    }

    pub fn has_selection(&self) -> bool {
        self.mark1 != self.mark2
    }

    /// Resolve the selection to `[start, end)` in buffer order. For a column
    /// selection whose column span runs opposite to its row span, the hull
    /// is widened to cover both the textual range and the column range of
    /// the terminal rows.
    pub fn evaluate(&self, buf: &Buffer, tab_stop: usize) -> Option<(usize, usize)> {
        if self.mark1 == self.mark2 {
            return None;
        }
        let m2 = if self.mark2 == -1 {
            self.end_mark_curs.max(0) as usize
        } else {
            self.mark2 as usize
        };
        let m1 = self.mark1.max(0) as usize;
        let (mut start, mut end) = if m1 <= m2 { (m1, m2) } else { (m2, m1) };

        if self.column_highlight && self.column2 < self.column1 {
            let start_bol = buf.bol(start);
            let end_bol = buf.bol(end);
            let col1_off = buf.byte_for_col(start_bol, buf.eol(start_bol), self.column1, tab_stop);
            let col2_off = buf.byte_for_col(end_bol, buf.eol(end_bol), self.column2, tab_stop);
            let diff1 = col2_off.saturating_sub(start);
            let diff2 = end.saturating_sub(col1_off.min(end));
            start = start.saturating_sub(diff1);
            end += diff2;
        }
        Some((start, end))
    }

    /// Shift markers after an insertion of one byte at `at`. `strict`
    /// distinguishes `insert` (markers strictly greater than `at` shift)
    /// from `insert_ahead` (markers at-or-past `at` shift).
    pub fn adjust_on_insert(&mut self, at: usize, strict: bool) {
        let at = at as i64;
        for m in [&mut self.mark1, &mut self.mark2] {
            if *m >= 0 {
                let shifts = if strict { *m > at } else { *m >= at };
                if shifts {
                    *m += 1;
                }
            }
        }
        if self.end_mark_curs >= 0 {
            let shifts = if strict {
                self.end_mark_curs > at
            } else {
                self.end_mark_curs >= at
            };
            if shifts {
                self.end_mark_curs += 1;
            }
        }
    }

    /// Shift markers after a deletion of one byte at `at`.
    pub fn adjust_on_delete(&mut self, at: usize) {
        let at = at as i64;
        for m in [&mut self.mark1, &mut self.mark2] {
            if *m > at {
                *m -= 1;
            }
        }
        if self.end_mark_curs > at {
            self.end_mark_curs -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_mark_starts_then_finalizes_selection() {
        let mut m = Markers::new();
        assert!(!m.has_selection());
        m.toggle_mark(false, 10, 3, 0);
        assert_eq!(m.mark1, 10);
        assert_eq!(m.mark2, -1);
        m.toggle_mark(false, 20, 5, 0);
        assert_eq!(m.mark2, 20);
        assert!(m.has_selection());
    }

    #[test]
    fn unmark_clears_everything() {
        let mut m = Markers::new();
        m.toggle_mark(false, 10, 0, 0);
        m.toggle_mark(false, 20, 0, 0);
        m.toggle_mark(true, 0, 0, 0);
        assert!(!m.has_selection());
        assert_eq!(m.mark1, 0);
        assert_eq!(m.mark2, 0);
    }

    #[test]
    fn evaluate_orders_reversed_marks() {
        let buf = Buffer::from_bytes(b"0123456789");
        let mut m = Markers::new();
        m.set(7, 2, 0, 0);
        assert_eq!(m.evaluate(&buf, 8), Some((2, 7)));
    }

    #[test]
    fn adjust_on_insert_respects_strictness() {
        let mut m = Markers::new();
        m.set(5, 5, 0, 0);
        m.adjust_on_insert(5, true); // strict: mark1==5 not > 5, stays
        assert_eq!(m.mark1, 5);
        m.adjust_on_insert(5, false); // non-strict: mark1==5 >= 5, shifts
        assert_eq!(m.mark1, 6);
    }

    #[test]
    fn adjust_on_delete_shifts_markers_past_point() {
        let mut m = Markers::new();
        m.set(10, 20, 0, 0);
        m.adjust_on_delete(10);
        assert_eq!(m.mark1, 10); // not strictly greater, unaffected
        assert_eq!(m.mark2, 19);
    }
}
