use crate::diff::DEFAULT_CONTEXT_LINES;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Wiki settings, usually read from a `plainwiki.toml`:
///
/// ```toml
/// root = "/srv/wiki"
/// pages_dir = "pages"
/// assets_dir = "assets"
/// bind = "127.0.0.1:8000"
/// context_lines = 3
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WikiConfig {
    pub root: PathBuf,
    /// Page files and revision logs. Relative paths resolve against `root`.
    pub pages_dir: PathBuf,
    /// Static files served under `/assets`. Relative paths resolve against `root`.
    pub assets_dir: PathBuf,
    pub bind: String,
    pub context_lines: usize,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            pages_dir: PathBuf::from("pages"),
            assets_dir: PathBuf::from("assets"),
            bind: "127.0.0.1:8000".to_string(),
            context_lines: DEFAULT_CONTEXT_LINES,
        }
    }
}

impl WikiConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn with_root(mut self, root: PathBuf) -> Self {
        self.root = root;
        self
    }

    pub fn with_bind(mut self, bind: String) -> Self {
        self.bind = bind;
        self
    }

    pub fn pages_path(&self) -> PathBuf {
        self.root.join(&self.pages_dir)
    }

    pub fn assets_path(&self) -> PathBuf {
        self.root.join(&self.assets_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WikiConfig::default();
        assert_eq!(config.pages_path(), PathBuf::from("./pages"));
        assert_eq!(config.context_lines, 3);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = WikiConfig::from_toml("root = \"/srv/wiki\"\nbind = \"0.0.0.0:9000\"\n").unwrap();

        assert_eq!(config.pages_path(), PathBuf::from("/srv/wiki/pages"));
        assert_eq!(config.assets_path(), PathBuf::from("/srv/wiki/assets"));
        assert_eq!(config.bind, "0.0.0.0:9000");
    }

    #[test]
    fn test_absolute_pages_dir_overrides_root() {
        let config = WikiConfig::from_toml("root = \"/srv/wiki\"\npages_dir = \"/data/pages\"\n").unwrap();
        assert_eq!(config.pages_path(), PathBuf::from("/data/pages"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(matches!(
            WikiConfig::from_toml("colour = \"blue\"\n"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(WikiConfig::load("/definitely/not/here.toml").is_err());
    }
}
