use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

fn title_pattern() -> &'static Regex {
    static TITLE: OnceLock<Regex> = OnceLock::new();
    TITLE.get_or_init(|| Regex::new(r"^[A-Z][A-Za-z0-9]+$").expect("title pattern is valid"))
}

/// A page title accepted by the wiki routes: an uppercase letter followed by
/// one or more ASCII letters or digits (`Home`, `MeetingNotes2024`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    pub fn parse(s: &str) -> Result<Self> {
        if title_pattern().is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(Error::InvalidTitle(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Title {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Title {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Title> for String {
    fn from(title: Title) -> Self {
        title.0
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_titles() {
        for s in ["Home", "FooBar", "Page2", "ABC"] {
            assert_eq!(Title::parse(s).unwrap().as_str(), s);
        }
    }

    #[test]
    fn test_invalid_titles() {
        for s in ["", "H", "home", "Foo Bar", "../Home", "Foo/Bar", "Ünicode"] {
            assert!(matches!(Title::parse(s), Err(Error::InvalidTitle(_))), "{s}");
        }
    }

    #[test]
    fn test_serde_validates() {
        let title: Title = serde_json::from_str("\"FrontPage\"").unwrap();
        assert_eq!(title.to_string(), "FrontPage");
        assert!(serde_json::from_str::<Title>("\"../etc\"").is_err());
    }
}
