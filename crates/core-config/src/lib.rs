//! Editor configuration: the option table consulted by the command executor
//! and loader/saver, plus TOML loading of a project config file.
//!
//! Every option is read-only at command time: `EditOptions` is built once
//! (defaults, then overlaid with a parsed file) and handed to commands by
//! shared reference, never mutated mid-command.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};
use tracing::{debug, info};

/// Saver policy: how a save writes the file back to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum SaveMode {
    /// Overwrite in place.
    #[default]
    #[serde(rename = "QUICK")]
    Quick,
    /// Write to a temp file, then rename over the original.
    #[serde(rename = "SAFE")]
    Safe,
    /// `Safe`, and keep the previous version under `backup_ext`.
    #[serde(rename = "DO_BACKUPS")]
    DoBackups,
}

/// Line-ending convention applied at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LineEnding {
    /// No conversion.
    #[default]
    Asis,
    Unix,
    Win,
    Mac,
}

fn default_word_wrap_line_length() -> u16 {
    72
}

fn default_filesize_threshold() -> u64 {
    4 * 1024 * 1024
}

fn default_backup_ext() -> String {
    ".bak".to_string()
}

fn default_tab_stop() -> usize {
    8
}

/// All options of the external interface's configuration table, in one
/// struct so a command site takes a single `&EditOptions` rather than
/// threading a dozen booleans.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EditOptions {
    /// Column at which typewriter-wrap inserts a newline at the previous
    /// whitespace.
    pub word_wrap_line_length: u16,
    /// Enable typewriter-style wrapping.
    pub typewriter_wrap: bool,
    /// Enter/modification triggers paragraph reformat.
    pub auto_para_formatting: bool,
    /// Tab inserts spaces instead of `\t`.
    pub fill_tabs_with_spaces: bool,
    /// Copy previous line's leading whitespace on Enter.
    pub return_does_auto_indent: bool,
    /// Backspace in indent deletes up to previous BOL.
    pub backspace_through_tabs: bool,
    /// Motion/tab treat four-space groups as half-tabs.
    pub fake_half_tabs: bool,
    /// Motion/insertion does not clear selection.
    pub persistent_selections: bool,
    /// Virtual columns past EOL are allowed.
    pub cursor_beyond_eol: bool,
    /// Paste leaves cursor at end of the inserted block.
    pub cursor_after_inserted_block: bool,
    /// `Undo` merges adjacent same-type commands.
    pub group_undo: bool,
    /// Warn/insert a trailing newline at save.
    pub check_nl_at_eof: bool,
    /// `DelChar`/`Backspace` remove exactly one byte instead of a whole
    /// UTF-8 codepoint.
    pub byte_delete: bool,
    /// Start the session in overwrite mode (toggled at runtime by
    /// `Command::OverwriteToggle`).
    pub overwrite: bool,
    /// Rendering hint: show tab characters distinctly.
    pub visible_tabs: bool,
    /// Rendering hint: show trailing whitespace distinctly.
    pub visible_tws: bool,
    /// Rendering hint: draw a right margin guide.
    pub show_right_margin: bool,
    /// Rendering hint: show per-line modification/bookmark state.
    pub line_state: bool,
    /// Saver policy.
    pub save_mode: SaveMode,
    /// Max file size before the loader prompts/aborts instead of loading.
    pub filesize_threshold: u64,
    /// Suffix for backup files under `SaveMode::DoBackups`.
    pub backup_ext: String,
    /// Line-ending convention applied at load time.
    pub line_ending: LineEnding,
    /// Tab stop width, in columns, used by every visual-column computation.
    pub tab_stop: usize,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            word_wrap_line_length: default_word_wrap_line_length(),
            typewriter_wrap: false,
            auto_para_formatting: false,
            fill_tabs_with_spaces: false,
            return_does_auto_indent: false,
            backspace_through_tabs: false,
            fake_half_tabs: false,
            persistent_selections: false,
            cursor_beyond_eol: true,
            cursor_after_inserted_block: false,
            group_undo: true,
            check_nl_at_eof: true,
            byte_delete: false,
            overwrite: false,
            visible_tabs: false,
            visible_tws: false,
            show_right_margin: false,
            line_state: false,
            save_mode: SaveMode::default(),
            filesize_threshold: default_filesize_threshold(),
            backup_ext: default_backup_ext(),
            line_ending: LineEnding::default(),
            tab_stop: default_tab_stop(),
        }
    }
}

/// Construction-time-only parameters: never read from the live-reloadable
/// config file, only ever passed at editor-instance construction.
#[derive(Debug, Clone, Copy)]
pub struct EditorLimits {
    pub max_undo: usize,
    pub line_cache_seed: u64,
}

impl Default for EditorLimits {
    fn default() -> Self {
        Self {
            max_undo: 10_000,
            line_cache_seed: 0x9E37_79B9_7F4A_7C15,
        }
    }
}

impl EditOptions {
    /// Load from a TOML file, falling back to defaults for any absent key
    /// (and for the whole file, if it doesn't exist).
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "config file absent, using defaults");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let opts: Self = toml::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        info!(path = %path.display(), "loaded config");
        Ok(opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let opts = EditOptions::default();
        assert_eq!(opts.word_wrap_line_length, 72);
        assert!(opts.cursor_beyond_eol);
        assert!(opts.group_undo);
        assert!(opts.check_nl_at_eof);
        assert_eq!(opts.save_mode, SaveMode::Quick);
        assert_eq!(opts.line_ending, LineEnding::Asis);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let opts = EditOptions::load(Path::new("/nonexistent/oxidized.toml")).unwrap();
        assert_eq!(opts.word_wrap_line_length, 72);
    }

    #[test]
    fn partial_file_overlays_only_given_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oxidized.toml");
        fs::write(&path, "fake_half_tabs = true\nsave_mode = \"DO_BACKUPS\"\n").unwrap();
        let opts = EditOptions::load(&path).unwrap();
        assert!(opts.fake_half_tabs);
        assert_eq!(opts.save_mode, SaveMode::DoBackups);
        assert_eq!(opts.word_wrap_line_length, 72);
        assert!(!opts.typewriter_wrap);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oxidized.toml");
        fs::write(&path, "not valid = = toml").unwrap();
        assert!(EditOptions::load(&path).is_err());
    }
}
