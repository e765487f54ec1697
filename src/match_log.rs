//! Where match narration goes.
//!
//! The arbiter writes human-readable lines (board header, moves, faults, result) to a
//! [`MatchSink`]. During a tournament every match gets its own file in the log directory;
//! tests use [`MemorySink`].

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use tracing::{error, trace};

/// Receives narration lines, one call per line.
pub trait MatchSink {
    /// Append one line.
    fn line(&mut self, line: &str);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl MatchSink for NullSink {
    fn line(&mut self, _line: &str) {}
}

/// Keeps lines in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    /// Everything written so far.
    pub lines: Vec<String>,
}

impl MemorySink {
    /// True if any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }
}

impl MatchSink for MemorySink {
    fn line(&mut self, line: &str) {
        self.lines.push(line.to_owned());
    }
}

/// Writes lines to a file.
///
/// Write errors do not interrupt the match: the first one is kept and returned by
/// [`finish`](FileSink::finish).
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    writer: BufWriter<File>,
    failure: Option<std::io::Error>,
}

impl FileSink {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let file = File::create(&path)
            .with_context(|| format!("cannot create match log '{}'", path.display()))?;
        Ok(FileSink {
            path,
            writer: BufWriter::new(file),
            failure: None,
        })
    }

    /// Path of the file being written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and report the first write error, if any.
    pub fn finish(mut self) -> anyhow::Result<()> {
        if let Some(err) = self.failure.take() {
            return Err(err).with_context(|| format!("cannot write '{}'", self.path.display()));
        }
        self.writer
            .flush()
            .with_context(|| format!("cannot write '{}'", self.path.display()))
    }
}

impl MatchSink for FileSink {
    fn line(&mut self, line: &str) {
        trace!(target: "match", "{line}");
        if self.failure.is_some() {
            return;
        }
        if let Err(err) = writeln!(self.writer, "{line}") {
            error!(path = %self.path.display(), "match log write failed: {err}");
            self.failure = Some(err);
        }
    }
}

/// Keeps letters, digits, `-` and `_`; everything else becomes `_`.
pub fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// File name of a match log: `game_<nnn>__<board>__<player0>__<player1>...log`.
pub fn match_log_file_name<'a>(
    match_number: usize,
    board: &str,
    players: impl IntoIterator<Item = &'a str>,
) -> String {
    let players = players
        .into_iter()
        .map(sanitize)
        .collect::<Vec<_>>()
        .join("__");
    format!("game_{match_number:03}__{}__{players}.log", sanitize(board))
}

/// Create `dir` if needed. With `clean`, remove the plain files it already holds
/// (subdirectories are left alone). A file that cannot be removed is logged, not fatal.
pub fn prepare_log_dir(dir: &Path, clean: bool) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create log directory '{}'", dir.display()))?;
    if !clean {
        return Ok(());
    }
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("cannot read log directory '{}'", dir.display()))?;
    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        if path.is_file() {
            if let Err(e) = std::fs::remove_file(&path) {
                error!("Could not delete '{}': {e}", path.display());
            }
        }
    }
    Ok(())
}

/// Write `message` to `ERROR__<board>.log` in `dir`.
pub fn write_error_log(dir: &Path, board: &str, message: &str) -> anyhow::Result<PathBuf> {
    let path = dir.join(format!("ERROR__{}.log", sanitize(board)));
    std::fs::write(&path, format!("{message}\n"))
        .with_context(|| format!("cannot write '{}'", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("big board #2"), "big_board__2");
        assert_eq!(sanitize("Scan-Bot_v1"), "Scan-Bot_v1");
    }

    #[test]
    fn test_match_log_file_name() {
        assert_eq!(
            match_log_file_name(7, "classic 3x3", ["RandomBot", "ScanBot"]),
            "game_007__classic_3x3__RandomBot__ScanBot.log"
        );
        assert_eq!(
            match_log_file_name(1234, "b", ["a"]),
            "game_1234__b__a.log"
        );
    }

    #[test]
    fn test_file_sink_writes_lines() {
        let dir = std::env::temp_dir().join(format!("line-tournament-sink-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("game_001__b__x__y.log");

        let mut sink = FileSink::create(&path).unwrap();
        assert_eq!(sink.path(), path.as_path());
        sink.line("first");
        sink.line("second");
        sink.finish().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::default();
        sink.line("Winner: P0 (A)");
        assert!(sink.contains("Winner"));
        assert!(!sink.contains("draw"));
    }
}
