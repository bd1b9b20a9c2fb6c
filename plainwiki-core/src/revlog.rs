//! Append-only revision log, one file per page.
//!
//! Each changed save appends a single line:
//!
//! ```text
//! 2024/03/09 10:05 - {"version":1,"hunks":[...],"digest":"..."}
//! ```

use crate::diff::{PageDiff, DEFAULT_CONTEXT_LINES, DIFF_SCHEMA_VERSION};
use crate::error::{Error, Result};
use crate::models::{RevisionEntry, RevisionRecord, TIMESTAMP_FORMAT};
use crate::paths;
use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const LOG_EXTENSION: &str = "log";
const ENTRY_SEPARATOR: &str = " - ";

#[derive(Serialize, Deserialize)]
struct EntryBody {
    #[serde(flatten)]
    diff: PageDiff,
    digest: String,
}

pub fn content_digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

impl RevisionEntry {
    pub fn to_log_line(&self) -> Result<String> {
        let body = serde_json::to_string(&EntryBody {
            diff: self.diff.clone(),
            digest: self.digest.clone(),
        })?;
        Ok(format!(
            "{}{}{}\n",
            self.formatted_timestamp(),
            ENTRY_SEPARATOR,
            body
        ))
    }

    /// Parse one log line. `line_number` is one-based and only used in errors.
    pub fn parse_log_line(line: &str, line_number: usize) -> Result<Self> {
        let malformed = |reason: String| Error::MalformedLogEntry {
            line: line_number,
            reason,
        };

        let line = line.trim_end_matches(['\n', '\r']);
        let (timestamp, body) = line
            .split_once(ENTRY_SEPARATOR)
            .ok_or_else(|| malformed("missing separator".to_string()))?;
        let timestamp = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
            .map_err(|e| malformed(format!("bad timestamp: {e}")))?;
        let body: EntryBody =
            serde_json::from_str(body).map_err(|e| malformed(format!("bad diff: {e}")))?;
        if body.diff.version != DIFF_SCHEMA_VERSION {
            return Err(malformed(format!(
                "unsupported diff version {}",
                body.diff.version
            )));
        }

        Ok(Self {
            timestamp,
            diff: body.diff,
            digest: body.digest,
        })
    }
}

/// The raw contents of one page's log, read once. Iterate as many times as
/// needed; parsing happens lazily per line.
#[derive(Debug, Clone, Default)]
pub struct History {
    raw: String,
}

impl History {
    pub fn from_raw(raw: String) -> Self {
        Self { raw }
    }

    /// True when no line of the log parses as an entry.
    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }

    /// Parsed entries in write order. Malformed lines are logged and skipped.
    pub fn entries(&self) -> impl Iterator<Item = RevisionEntry> + '_ {
        self.raw
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(i, line)| match RevisionEntry::parse_log_line(line, i + 1) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping revision log line: {}", e);
                    None
                }
            })
    }

    pub fn records(&self) -> impl Iterator<Item = RevisionRecord> + '_ {
        self.entries().map(|entry| entry.to_record())
    }
}

/// True when the file is non-empty and its last byte is not a newline, i.e. an
/// earlier append was cut short.
fn ends_with_torn_line(file: &mut File) -> Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

#[derive(Debug, Clone)]
pub struct RevisionLog {
    root: PathBuf,
    context_lines: usize,
}

impl RevisionLog {
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        Ok(Self {
            root: paths::absolute_root(root.as_ref())?,
            context_lines: DEFAULT_CONTEXT_LINES,
        })
    }

    pub fn with_context_lines(mut self, context_lines: usize) -> Self {
        self.context_lines = context_lines;
        self
    }

    pub fn log_path(&self, title: &str) -> Result<PathBuf> {
        paths::confine(&self.root, &format!("{title}.{LOG_EXTENSION}"))
    }

    /// Record the change from `previous` to `new`, stamped with the current
    /// local time. Returns `None` when the contents are identical.
    pub fn append(&self, title: &str, previous: &str, new: &str) -> Result<Option<RevisionEntry>> {
        let now = Local::now().naive_local();
        let now = now
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(now);
        self.append_at(title, previous, new, now)
    }

    pub fn append_at(
        &self,
        title: &str,
        previous: &str,
        new: &str,
        timestamp: NaiveDateTime,
    ) -> Result<Option<RevisionEntry>> {
        let path = self.log_path(title)?;

        if previous == new {
            debug!("No change to {}, nothing logged", title);
            return Ok(None);
        }

        let entry = RevisionEntry {
            timestamp,
            diff: PageDiff::compute_with_context(previous, new, self.context_lines),
            digest: content_digest(new),
        };
        let mut line = entry.to_log_line()?;

        let mut file = OpenOptions::new()
            .read(true)
            .create(true)
            .append(true)
            .open(&path)?;
        if ends_with_torn_line(&mut file)? {
            warn!("Revision log of {} ends with an unterminated line", title);
            line.insert(0, '\n');
        }
        file.write_all(line.as_bytes())?;

        info!(
            "Logged revision of {} ({} hunk(s))",
            title,
            entry.diff.hunks.len()
        );

        Ok(Some(entry))
    }

    /// Read the whole log for `title`. A missing log is an empty history.
    pub fn history(&self, title: &str) -> Result<History> {
        let path = self.log_path(title)?;
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(History::from_raw(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(History::default()),
            Err(e) => Err(e.into()),
        }
    }
}
