//! File saver: writes a buffer back out, converting `'\n'` to the
//! configured line ending with a two-byte look-ahead (so an existing CRLF
//! under `Unix` mode collapses to one `\n`, not `\r\n`).

use crate::error::DocumentError;
use core_config::LineEnding;
use core_text::Buffer;
use std::fs;
use std::path::Path;
use tracing::info;

pub struct Saver;

impl Saver {
    /// Render `buf` to bytes using `ending`'s convention, then write to
    /// `path`, verifying the written length against what was intended.
    pub fn save(buf: &Buffer, path: &Path, ending: LineEnding, check_nl_at_eof: bool) -> Result<(), DocumentError> {
        let out = Self::render(buf, ending, check_nl_at_eof);
        let expected = out.len();
        fs::write(path, &out).map_err(|source| DocumentError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let written = fs::metadata(path).map(|m| m.len() as usize).unwrap_or(0);
        if written != expected {
            return Err(DocumentError::PartialWrite { path: path.to_path_buf(), written, expected });
        }
        info!(path = %path.display(), bytes = written, "saved");
        Ok(())
    }

    /// Convert the buffer's bytes for `ending`. `Asis` is a straight copy;
    /// the others scan for `'\n'` and emit the configured sequence,
    /// collapsing a preceding `'\r'` that was part of an original CRLF.
    /// When `check_nl_at_eof`, a non-empty result missing a trailing
    /// line ending gets one appended.
    pub fn render(buf: &Buffer, ending: LineEnding, check_nl_at_eof: bool) -> Vec<u8> {
        let bytes = buf.to_bytes();
        let sep: &[u8] = match ending {
            LineEnding::Asis | LineEnding::Unix => b"\n",
            LineEnding::Win => b"\r\n",
            LineEnding::Mac => b"\r",
        };
        let mut out = if matches!(ending, LineEnding::Asis) {
            bytes
        } else {
            let mut out = Vec::with_capacity(bytes.len());
            let mut i = 0;
            while i < bytes.len() {
                if bytes[i] == b'\r' && i + 1 < bytes.len() && bytes[i + 1] == b'\n' {
                    out.extend_from_slice(sep);
                    i += 2;
                } else if bytes[i] == b'\n' {
                    out.extend_from_slice(sep);
                    i += 1;
                } else {
                    out.push(bytes[i]);
                    i += 1;
                }
            }
            out
        };
        if check_nl_at_eof && !out.is_empty() && !out.ends_with(sep) {
            out.extend_from_slice(sep);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asis_is_a_straight_copy() {
        let buf = Buffer::from_bytes(b"a\r\nb\n");
        assert_eq!(Saver::render(&buf, LineEnding::Asis, false), b"a\r\nb\n");
    }

    #[test]
    fn unix_collapses_crlf_to_lf() {
        let buf = Buffer::from_bytes(b"a\r\nb\n");
        assert_eq!(Saver::render(&buf, LineEnding::Unix, false), b"a\nb\n");
    }

    #[test]
    fn win_expands_lf_to_crlf_without_doubling_existing() {
        let buf = Buffer::from_bytes(b"a\r\nb\n");
        assert_eq!(Saver::render(&buf, LineEnding::Win, false), b"a\r\nb\r\n");
    }

    #[test]
    fn mac_uses_bare_cr() {
        let buf = Buffer::from_bytes(b"a\nb\n");
        assert_eq!(Saver::render(&buf, LineEnding::Mac, false), b"a\rb\r");
    }

    #[test]
    fn check_nl_at_eof_appends_missing_trailing_newline() {
        let buf = Buffer::from_bytes(b"no trailing newline");
        assert_eq!(Saver::render(&buf, LineEnding::Unix, true), b"no trailing newline\n");
    }

    #[test]
    fn check_nl_at_eof_leaves_existing_trailing_newline_alone() {
        let buf = Buffer::from_bytes(b"already terminated\n");
        assert_eq!(Saver::render(&buf, LineEnding::Unix, true), b"already terminated\n");
    }

    #[test]
    fn check_nl_at_eof_does_nothing_to_an_empty_buffer() {
        let buf = Buffer::new();
        assert_eq!(Saver::render(&buf, LineEnding::Unix, true), b"");
    }

    #[test]
    fn save_writes_and_verifies_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let buf = Buffer::from_bytes(b"hi\n");
        Saver::save(&buf, &path, LineEnding::Unix, false).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"hi\n");
    }
}
