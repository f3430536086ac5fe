//! Visual column width of a single decoded codepoint.
//!
//! The buffer itself is byte/codepoint oriented (see [`crate::Buffer::get_utf`]);
//! display column math needs a width per codepoint, not per grapheme cluster.
//! Tabs are not a fixed width: callers resolve them against the current column
//! and a tab stop via [`tab_width`].

use unicode_width::UnicodeWidthChar;

/// Default tab stop used when no option overrides it.
pub const DEFAULT_TAB_STOP: usize = 8;

/// Terminal column width of `c`, ignoring tab expansion (handled by [`tab_width`]).
/// Control characters other than `\t`/`\n` are given width 1 rather than the
/// `unicode-width` crate's `None`, since the buffer may contain raw bytes.
pub fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(1)
}

/// Number of columns a tab at visual column `col` consumes, given `tab_stop`.
/// A `tab_stop` of 0 is treated as 1 (tabs behave like a single space).
pub fn tab_width(col: usize, tab_stop: usize) -> usize {
    let stop = tab_stop.max(1);
    stop - (col % stop)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_width_one() {
        assert_eq!(char_width('a'), 1);
    }

    #[test]
    fn tab_advances_to_next_stop() {
        assert_eq!(tab_width(0, 8), 8);
        assert_eq!(tab_width(3, 8), 5);
        assert_eq!(tab_width(8, 8), 8);
    }

    #[test]
    fn wide_cjk_is_width_two() {
        assert_eq!(char_width('\u{6F22}'), 2);
    }
}
