use crate::config::WikiConfig;
use crate::error::{Error, Result};
use crate::models::{Page, RevisionEntry};
use crate::repository::PageRepository;
use crate::revlog::{content_digest, History, RevisionLog};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

/// Loads, renders, saves and replays pages. Saves to the same title are
/// serialized within this process.
pub struct WikiService {
    repository: PageRepository,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl WikiService {
    pub fn new(repository: PageRepository) -> Self {
        Self {
            repository,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &WikiConfig) -> Result<Self> {
        let pages = config.pages_path();
        std::fs::create_dir_all(&pages)?;
        let log = RevisionLog::new(&pages)?.with_context_lines(config.context_lines);
        let repository = PageRepository::new(&pages)?.with_log(log);
        info!("Serving pages from {:?}", repository.root());
        Ok(Self::new(repository))
    }

    pub fn repository(&self) -> &PageRepository {
        &self.repository
    }

    pub fn load(&self, title: &str) -> Result<Option<Page>> {
        self.repository.load(title)
    }

    /// Rendered HTML of a stored page, or `None` if the page does not exist.
    pub fn view(&self, title: &str) -> Result<Option<String>> {
        Ok(self.load(title)?.map(|page| page.render()))
    }

    /// The stored page, or an empty one to start editing from.
    pub fn edit(&self, title: &str) -> Result<Page> {
        Ok(self.load(title)?.unwrap_or_else(|| Page::empty(title)))
    }

    pub fn save(&self, title: &str, content: &str) -> Result<Option<RevisionEntry>> {
        let lock = self.title_lock(title);
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.repository.save(title, content)
        };
        self.release_title_lock(title, lock);
        result
    }

    pub fn history(&self, title: &str) -> Result<History> {
        self.repository.history(title)
    }

    /// Content of `title` as of its `index`-th logged revision (one-based),
    /// rebuilt by replaying every diff from an empty page.
    pub fn revision_content(&self, title: &str, index: usize) -> Result<String> {
        let history = self.history(title)?;
        let not_found = || Error::RevisionNotFound {
            title: title.to_string(),
            index,
        };
        if index == 0 {
            return Err(not_found());
        }

        let mut content = String::new();
        let mut replayed = 0;
        for entry in history.entries().take(index) {
            content = entry.diff.apply(&content)?;
            if content_digest(&content) != entry.digest {
                return Err(Error::DiffMismatch(format!(
                    "revision {} of {} does not match its digest",
                    replayed + 1,
                    title
                )));
            }
            replayed += 1;
        }

        if replayed < index {
            return Err(not_found());
        }
        Ok(content)
    }

    fn title_lock(&self, title: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(title.to_string()).or_default())
    }

    /// Drop the map's entry for `title` once no other save holds it.
    fn release_title_lock(&self, title: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        drop(lock);
        if locks.get(title).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(title);
        }
    }
}
