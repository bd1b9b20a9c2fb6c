use crate::error::Result;
use crate::models::{Page, RevisionEntry};
use crate::paths;
use crate::revlog::{History, RevisionLog};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

const PAGE_EXTENSION: &str = "txt";

/// Plain-text page files under a single root directory. Every save also goes
/// through the page's [`RevisionLog`].
#[derive(Debug, Clone)]
pub struct PageRepository {
    root: PathBuf,
    log: RevisionLog,
}

impl PageRepository {
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = paths::absolute_root(root.as_ref())?;
        let log = RevisionLog::new(&root)?;
        Ok(Self { root, log })
    }

    pub fn with_log(mut self, log: RevisionLog) -> Self {
        self.log = log;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn log(&self) -> &RevisionLog {
        &self.log
    }

    pub fn page_path(&self, title: &str) -> Result<PathBuf> {
        paths::confine(&self.root, &format!("{title}.{PAGE_EXTENSION}"))
    }

    /// Load a page. A title with no backing file yields `Ok(None)`.
    pub fn load(&self, title: &str) -> Result<Option<Page>> {
        let path = self.page_path(title)?;
        Ok(read_if_exists(&path)?.map(|content| Page::new(title, content)))
    }

    /// Write `content` as the new version of `title` and log the change.
    ///
    /// The content is written before the log entry is appended: if appending
    /// fails the page is still correct, only its history is incomplete.
    pub fn save(&self, title: &str, content: &str) -> Result<Option<RevisionEntry>> {
        let path = self.page_path(title)?;
        self.log.log_path(title)?;

        let previous = read_if_exists(&path)?.unwrap_or_default();
        if previous == content {
            debug!("Save of {} left content unchanged", title);
            return Ok(None);
        }

        write_replacing(&self.root, &path, content)?;
        info!("Saved page {} ({} bytes)", title, content.len());

        self.log.append(title, &previous, content)
    }

    pub fn history(&self, title: &str) -> Result<History> {
        self.log.history(title)
    }

    /// Titles of all stored pages, sorted.
    pub fn titles(&self) -> Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut titles = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(PAGE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                titles.push(stem.to_string());
            }
        }
        titles.sort();
        Ok(titles)
    }
}

/// Write `content` to a temporary file beside `path`, then rename it over
/// `path`. Readers see either the old page or the new one, never a partial write.
fn write_replacing(dir: &Path, path: &Path, content: &str) -> Result<()> {
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(content.as_bytes())?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn read_if_exists(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
