use crate::diff::{LineTag, PageDiff};
use crate::markup::escape_html;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Wall-clock format of revision timestamps, minute resolution.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub title: String,
    pub content: String,
}

impl Page {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// An unsaved page with no content, offered when a title has no backing file.
    pub fn empty(title: impl Into<String>) -> Self {
        Self::new(title, String::new())
    }

    pub fn render(&self) -> String {
        crate::markup::render(&self.content)
    }
}

/// One recorded change to a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionEntry {
    pub timestamp: NaiveDateTime,
    pub diff: PageDiff,
    /// SHA-256 hex digest of the content after this change.
    pub digest: String,
}

impl RevisionEntry {
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn to_record(&self) -> RevisionRecord {
        let mut lines = Vec::new();
        for hunk in &self.diff.hunks {
            if hunk.has_removals() {
                lines.extend(hunk.old.iter().map(|l| RenderedLine::new(l.tag, &l.text)));
            }
            if hunk.has_additions() {
                lines.extend(hunk.new.iter().map(|l| RenderedLine::new(l.tag, &l.text)));
            }
        }

        RevisionRecord {
            timestamp: self.timestamp,
            lines,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineClass {
    Context,
    Add,
    Del,
    Mod,
}

impl LineClass {
    pub fn as_str(&self) -> &str {
        match self {
            LineClass::Context => "context",
            LineClass::Add => "add",
            LineClass::Del => "del",
            LineClass::Mod => "mod",
        }
    }
}

impl From<LineTag> for LineClass {
    fn from(tag: LineTag) -> Self {
        match tag {
            LineTag::Context => LineClass::Context,
            LineTag::Added => LineClass::Add,
            LineTag::Removed => LineClass::Del,
            LineTag::Changed => LineClass::Mod,
        }
    }
}

/// A diff line prepared for display: classified, prefixed with its
/// context-diff marker and HTML-escaped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedLine {
    pub class: LineClass,
    pub html: String,
}

impl RenderedLine {
    fn new(tag: LineTag, text: &str) -> Self {
        let text = text.trim_end_matches(['\n', '\r']);
        Self {
            class: tag.into(),
            html: escape_html(&format!("{}{}", tag.marker(), text)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionRecord {
    pub timestamp: NaiveDateTime,
    pub lines: Vec<RenderedLine>,
}

impl RevisionRecord {
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        html.push_str("<div class=\"entry clearfix\">\n");
        html.push_str(&format!(
            "<div class=\"entry-timestamp\">{}</div>\n",
            self.formatted_timestamp()
        ));
        html.push_str("<div class=\"entry-diff\">\n");
        for line in &self.lines {
            html.push_str(&format!(
                "<div class=\"{}\">{}</div>\n",
                line.class.as_str(),
                line.html
            ));
        }
        html.push_str("</div>\n</div>\n");
        html
    }
}
