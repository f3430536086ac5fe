//! Word classification, word/paragraph motion, and bracket matching.
//!
//! These are pure functions over a [`Buffer`] and a byte offset; none of them
//! touch the buffer's own cursor split, so they are equally usable for
//! scanning around an arbitrary position (bracket matching under the mouse,
//! for instance) as for driving the real cursor.

use crate::Buffer;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Class segments, `'!'`-delimited. Letters fold to `'a'`, digits to `'0'`,
/// whitespace to `' '`; everything else is looked up (or, for a punctuation
/// character outside this table, falls into a single shared "other" class).
const CLASS_TABLE: &str =
    "!a!0! !\"!#!$!%!&!'!(!)!*!+!,!-!.!/!:!;!<!=!>!?!@![!\\!]!^!`!{!|!}!~!";

const OTHER_CLASS: u64 = 1 << 63;

fn class_table() -> &'static HashMap<char, u64> {
    static TABLE: OnceLock<HashMap<char, u64>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut map = HashMap::new();
        for (bit, segment) in CLASS_TABLE.split('!').filter(|s| !s.is_empty()).enumerate() {
            for ch in segment.chars() {
                map.insert(ch, 1u64 << bit);
            }
        }
        map
    })
}

fn fold(c: char) -> char {
    if c.is_alphanumeric() || c == '_' {
        if c.is_ascii_digit() { '0' } else { 'a' }
    } else if c.is_whitespace() {
        ' '
    } else {
        c
    }
}

/// Class bitmask of `c`. Two characters are in the same class iff
/// `my_type_of(c1) & my_type_of(c2) != 0`.
pub fn my_type_of(c: char) -> u64 {
    let folded = fold(c);
    *class_table().get(&folded).unwrap_or(&OTHER_CLASS)
}

/// A boundary separates `c1` and `c2` when their classes are disjoint, when
/// either is `'\n'`, or (if `space_sensitive`) when transitioning from
/// non-space to space.
pub fn is_boundary(c1: char, c2: char, space_sensitive: bool) -> bool {
    if c1 == '\n' || c2 == '\n' {
        return true;
    }
    if my_type_of(c1) & my_type_of(c2) == 0 {
        return true;
    }
    if space_sensitive && !c1.is_whitespace() && c2.is_whitespace() {
        return true;
    }
    false
}

/// Move right to the start of the next word, skipping any trailing run of
/// the current class and then any whitespace (newlines included).
pub fn right_word_move(buf: &Buffer, off: usize) -> usize {
    let size = buf.size();
    let mut pos = off.min(size);
    if pos >= size {
        return size;
    }
    let (c0, _) = buf.get_utf(pos);
    if !c0.is_whitespace() {
        let class = my_type_of(c0);
        loop {
            if pos >= size {
                break;
            }
            let (c, len) = buf.get_utf(pos);
            if c.is_whitespace() || my_type_of(c) & class == 0 {
                break;
            }
            pos += len.max(1);
        }
    }
    while pos < size {
        let (c, len) = buf.get_utf(pos);
        if !c.is_whitespace() {
            break;
        }
        pos += len.max(1);
    }
    pos
}

/// Move left to the start of the previous word: skip whitespace backward,
/// then skip the run of the landed-on class.
pub fn left_word_move(buf: &Buffer, off: usize) -> usize {
    let mut pos = off;
    while pos > 0 {
        let (c, len) = buf.get_prev_utf(pos);
        if !c.is_whitespace() {
            break;
        }
        pos -= len.max(1);
    }
    if pos == 0 {
        return 0;
    }
    let (c0, _) = buf.get_prev_utf(pos);
    let class = my_type_of(c0);
    loop {
        if pos == 0 {
            break;
        }
        let (c, len) = buf.get_prev_utf(pos);
        if c.is_whitespace() || my_type_of(c) & class == 0 {
            break;
        }
        pos -= len.max(1);
    }
    pos
}

pub fn is_blank_line(buf: &Buffer, bol: usize) -> bool {
    let eol = buf.eol(bol);
    (bol..eol).all(|i| buf.byte_at(i as i64).is_ascii_whitespace())
}

/// Locate the next blank line after `off`. If already on a blank line, first
/// skips the run of consecutive blank lines before searching for the
/// following non-blank-then-blank transition.
pub fn forward_paragraph(buf: &Buffer, off: usize) -> usize {
    let size = buf.size();
    let mut bol = buf.bol(off);
    if is_blank_line(buf, bol) {
        while bol < size && is_blank_line(buf, bol) {
            let eol = buf.eol(bol);
            if eol >= size {
                return size;
            }
            bol = eol + 1;
        }
    }
    // Bounded by the number of lines remaining: each iteration consumes one
    // line, so this cannot loop more than `lines() + 1` times.
    let mut remaining_lines = buf.lines() + 1;
    while bol < size && !is_blank_line(buf, bol) {
        let eol = buf.eol(bol);
        if eol >= size {
            return size;
        }
        bol = eol + 1;
        if remaining_lines == 0 {
            break;
        }
        remaining_lines -= 1;
    }
    bol
}

/// Locate the previous blank line before `off`, symmetric to [`forward_paragraph`].
pub fn backward_paragraph(buf: &Buffer, off: usize) -> usize {
    let mut bol = buf.bol(off);
    if bol == 0 {
        return 0;
    }
    if is_blank_line(buf, bol) {
        while bol > 0 {
            let prev_bol = buf.bol(bol - 1);
            if !is_blank_line(buf, prev_bol) {
                break;
            }
            bol = prev_bol;
        }
    }
    let mut remaining_lines = buf.lines() + 1;
    while bol > 0 && !is_blank_line(buf, buf.bol(bol - 1)) {
        bol = buf.bol(bol - 1);
        if remaining_lines == 0 {
            break;
        }
        remaining_lines -= 1;
    }
    if bol > 0 {
        bol = buf.bol(bol - 1);
    }
    bol
}

fn bracket_pair(c: char) -> Option<(char, i64)> {
    match c {
        '{' => Some(('}', 1)),
        '}' => Some(('{', -1)),
        '[' => Some((']', 1)),
        ']' => Some(('[', -1)),
        '(' => Some((')', 1)),
        ')' => Some(('(', -1)),
        _ => None,
    }
}

/// Find the bracket matching the one at `pos`, scanning at most `furthest`
/// bytes in the implied direction (or the narrower `bound`, inclusive, when
/// given — used by callers that only want to search within the visible
/// screen). Returns `None` if `pos` is not on a bracket or no match is found
/// within the scan bound.
pub fn match_bracket(buf: &Buffer, pos: usize, furthest: usize, bound: Option<usize>) -> Option<usize> {
    let (c, _) = buf.get_utf(pos);
    let (target, dir) = bracket_pair(c)?;
    let default_bound = if dir > 0 {
        pos.saturating_add(furthest)
    } else {
        pos.saturating_sub(furthest)
    };
    let bound = match bound {
        Some(b) if dir > 0 => b.min(default_bound),
        Some(b) => b.max(default_bound),
        None => default_bound,
    };
    let mut depth: i32 = 1;
    let mut i = pos as i64;
    loop {
        i += dir;
        if dir > 0 {
            if i > bound as i64 || i as usize >= buf.size() {
                return None;
            }
        } else if i < bound as i64 || i < 0 {
            return None;
        }
        let (c2, _) = buf.get_utf(i as usize);
        if c2 == c {
            depth += 1;
        } else if c2 == target {
            depth -= 1;
            if depth == 0 {
                return Some(i as usize);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_forward_skips_punct_and_space() {
        let b = Buffer::from_bytes(b"foo, bar");
        let comma = b.bol(0) + 3;
        assert_eq!(right_word_move(&b, 0), comma);
        let bar = right_word_move(&b, comma);
        assert_eq!(&b.to_bytes()[bar..], b"bar");
    }

    #[test]
    fn word_backward_is_symmetric() {
        let b = Buffer::from_bytes(b"foo, bar");
        let end = b.size();
        let back1 = left_word_move(&b, end);
        assert_eq!(&b.to_bytes()[back1..], b"bar");
        let back2 = left_word_move(&b, back1);
        assert_eq!(&b.to_bytes()[back2..], b", bar");
    }

    #[test]
    fn paragraph_forward_finds_blank_line() {
        let b = Buffer::from_bytes(b"one\ntwo\n\nthree\n");
        let target = forward_paragraph(&b, 0);
        assert_eq!(target, b.bol(8)); // the empty line after "two"
    }

    #[test]
    fn bracket_match_nested() {
        let b = Buffer::from_bytes(b"{ foo { bar } baz }");
        let outer_open = 0;
        let outer_close = b.size() - 1;
        assert_eq!(match_bracket(&b, outer_open, 10_000, None), Some(outer_close));
        let inner_open = b.to_bytes().iter().position(|&c| c == b'{').unwrap();
        let inner_open = b.to_bytes()[inner_open + 1..]
            .iter()
            .position(|&c| c == b'{')
            .map(|i| i + inner_open + 1)
            .unwrap();
        let inner_close_char = match_bracket(&b, inner_open, 10_000, None).unwrap();
        assert_eq!(b.byte_at(inner_close_char as i64), b'}');
        assert_eq!(match_bracket(&b, inner_close_char, 10_000, None), Some(inner_open));
    }

    #[test]
    fn bracket_match_none_outside_bound() {
        let b = Buffer::from_bytes(b"(aaaaaaaaaa)");
        assert_eq!(match_bracket(&b, 0, 2, None), None);
    }
}
