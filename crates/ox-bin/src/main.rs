//! CLI entry point: `edit <file>[:<line>]`, driving the editor core from a
//! line-oriented command script read from stdin (or `--script`).

use anyhow::{Context, Result};
use clap::Parser;
use core_actions::{Command, Executor};
use core_config::{EditOptions, EditorLimits};
use core_model::{DirtySink, NoopCollaborators};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Parser, Debug)]
#[command(name = "ox", version, about = "A text-editor core with a scripted command interface")]
struct Args {
    /// File to open, optionally suffixed with `:<line>` to position the cursor.
    path: Option<String>,
    /// Read commands from this file instead of stdin.
    #[arg(long = "script")]
    script: Option<PathBuf>,
    /// Path to an `oxidized.toml`-style config file.
    #[arg(long = "config")]
    config: Option<PathBuf>,
}

fn parse_path_arg(raw: &str) -> (PathBuf, Option<usize>) {
    if let Some((path, line)) = raw.rsplit_once(':') {
        if let Ok(n) = line.parse::<usize>() {
            return (PathBuf::from(path), Some(n));
        }
    }
    (PathBuf::from(raw), None)
}

fn configure_logging() -> Result<WorkerGuard> {
    let log_dir = Path::new(".");
    let file_appender = tracing_appender::rolling::never(log_dir, "ox.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}

/// Parse one line of the command script into zero or more `Command`s.
/// Unrecognized lines are ignored with a warning — scripts are expected to
/// be hand-written or generated by tests, not attacker-controlled input.
fn parse_script_line(line: &str) -> Vec<Command> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Vec::new();
    }
    match line {
        "left" => vec![Command::Left],
        "right" => vec![Command::Right],
        "up" => vec![Command::Up],
        "down" => vec![Command::Down],
        "word-left" => vec![Command::WordLeft],
        "word-right" => vec![Command::WordRight],
        "home" => vec![Command::Home],
        "end" => vec![Command::End],
        "top" => vec![Command::Top],
        "bottom" => vec![Command::Bottom],
        "tab" => vec![Command::Tab],
        "enter" => vec![Command::Enter],
        "backspace" => vec![Command::Backspace],
        "delete" => vec![Command::DelChar],
        "undo" => vec![Command::Undo],
        "redo" => vec![Command::Redo],
        "mark-left" => vec![Command::MarkLeft],
        "mark-right" => vec![Command::MarkRight],
        "copy" => vec![Command::Copy],
        "cut" => vec![Command::Cut],
        "paste" => vec![Command::Paste],
        other => {
            if let Some(text) = other.strip_prefix("insert ") {
                text.chars().map(Command::InsertChar).collect()
            } else {
                tracing::warn!(target: "script", line = other, "unrecognized command, ignoring");
                Vec::new()
            }
        }
    }
}

fn run() -> Result<i32> {
    let args = Args::parse();
    let opts = match &args.config {
        Some(path) => EditOptions::load(path)?,
        None => EditOptions::load(Path::new("oxidized.toml"))?,
    };
    let limits = EditorLimits::default();

    let (mut doc, open_failed) = match &args.path {
        Some(raw) => {
            let (path, line) = parse_path_arg(raw);
            match core_actions::io_ops::open_file(&path, &opts, limits) {
                core_actions::io_ops::OpenFileResult::Success(mut doc) => {
                    if let Some(target_line) = line {
                        let bol = doc.line_cache.find_line(&doc.buf, target_line, opts.tab_stop);
                        let delta = bol as i64 - doc.buf.curs1() as i64;
                        doc.buf.move_cursor(delta);
                    }
                    (doc, false)
                }
                core_actions::io_ops::OpenFileResult::Error(e) => {
                    eprintln!("ox: could not open {}: {e}", path.display());
                    (Box::new(core_actions::io_ops::new_empty_document(&opts, limits)), true)
                }
            }
        }
        None => (Box::new(core_actions::io_ops::new_empty_document(&opts, limits)), false),
    };
    if open_failed {
        return Ok(1);
    }

    info!(target: "runtime", path = ?args.path, "startup");

    let collaborators = NoopCollaborators;
    let mut executor = Executor::with_overwrite(opts.overwrite);

    let commands: Vec<Command> = match &args.script {
        Some(script_path) => {
            let reader = std::io::BufReader::new(
                std::fs::File::open(script_path)
                    .with_context(|| format!("opening script {}", script_path.display()))?,
            );
            reader.lines().map_while(Result::ok).flat_map(|l| parse_script_line(&l)).collect()
        }
        None => {
            let stdin = std::io::stdin();
            stdin.lock().lines().map_while(Result::ok).flat_map(|l| parse_script_line(&l)).collect()
        }
    };

    for cmd in commands {
        executor.execute(&mut doc, &opts, &collaborators, &collaborators, cmd);
    }

    if doc.modified {
        collaborators.mark_dirty(doc.file_name.as_deref());
    }

    if doc.modified {
        match core_actions::io_ops::write_file(&mut doc, &opts, None) {
            core_actions::io_ops::WriteFileResult::Success => {}
            core_actions::io_ops::WriteFileResult::NoFilename => {
                print!("{}", String::from_utf8_lossy(&doc.buf.to_bytes()));
                return Ok(0);
            }
            core_actions::io_ops::WriteFileResult::Error(e) => {
                eprintln!("ox: save failed: {e}");
                return Ok(1);
            }
        }
    }
    Ok(0)
}

fn main() -> Result<()> {
    let _log_guard = configure_logging()?;
    let code = run()?;
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_path_arg_splits_trailing_line_number() {
        assert_eq!(parse_path_arg("foo.txt:42"), (PathBuf::from("foo.txt"), Some(42)));
        assert_eq!(parse_path_arg("foo.txt"), (PathBuf::from("foo.txt"), None));
        assert_eq!(parse_path_arg("a:b:7"), (PathBuf::from("a:b"), Some(7)));
    }

    #[test]
    fn script_line_parses_known_commands() {
        assert_eq!(parse_script_line("left"), vec![Command::Left]);
        assert_eq!(parse_script_line("insert ab"), vec![Command::InsertChar('a'), Command::InsertChar('b')]);
        assert_eq!(parse_script_line("# comment"), vec![]);
        assert_eq!(parse_script_line(""), vec![]);
    }
}
