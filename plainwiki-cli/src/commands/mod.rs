pub mod history;
pub mod list;
pub mod render;
pub mod revision;
pub mod save;
pub mod serve;
pub mod show;

use anyhow::{Context, Result};
use plainwiki_core::{Title, WikiConfig};
use std::io::Read;
use std::path::PathBuf;

const DEFAULT_CONFIG_FILE: &str = "plainwiki.toml";

/// Resolve configuration: an explicit file must exist, `plainwiki.toml` in the
/// current directory is used when present, defaults otherwise. `--root` wins.
pub fn load_config(path: Option<PathBuf>, root: Option<PathBuf>) -> Result<WikiConfig> {
    let config = match path {
        Some(path) => WikiConfig::load(&path)?,
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default.is_file() {
                WikiConfig::load(&default)?
            } else {
                WikiConfig::default()
            }
        }
    };

    Ok(match root {
        Some(root) => config.with_root(root),
        None => config,
    })
}

pub fn parse_title(raw: &str) -> Result<Title> {
    Title::parse(raw).context("titles look like HomePage: a capital letter, then letters or digits")
}

pub fn read_input(file: Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_root_overrides_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wiki.toml");
        std::fs::write(&path, "root = \"/srv/wiki\"\ncontext_lines = 1\n").unwrap();

        let config = load_config(Some(path), Some(PathBuf::from("/tmp/other"))).unwrap();

        assert_eq!(config.root, PathBuf::from("/tmp/other"));
        assert_eq!(config.context_lines, 1);
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        assert!(load_config(Some(PathBuf::from("/no/such/file.toml")), None).is_err());
    }

    #[test]
    fn test_parse_title() {
        assert!(parse_title("HomePage").is_ok());
        assert!(parse_title("../etc").is_err());
    }
}
