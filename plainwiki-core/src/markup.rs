//! Line-oriented renderer for the wiki markup dialect.
//!
//! Supported constructs, recognised by line prefix:
//!
//! - `#`, `##`, ... headings
//! - a line starting with three backticks opens or closes a preformatted block
//! - `- item` list items; a blank line closes the list
//! - `[CamelCase]` links inside paragraphs
//!
//! Input is HTML-escaped before any markup is applied, so the only tags in the
//! output are the ones the renderer generates.

use regex::Regex;
use std::sync::OnceLock;

const FENCE: &str = "```";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenderState {
    Normal,
    InPreformattedBlock,
    InListBlock,
}

fn link_pattern() -> &'static Regex {
    static LINK: OnceLock<Regex> = OnceLock::new();
    LINK.get_or_init(|| Regex::new(r"\[([A-Z]\w+)\]").expect("link pattern is valid"))
}

/// Escape the characters that are significant in HTML text and attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render wiki markup into HTML.
///
/// Never fails. An unterminated preformatted block or list is closed at the end
/// of input so the output is always balanced.
pub fn render(text: &str) -> String {
    let escaped = escape_html(text);
    let mut out = String::with_capacity(escaped.len() + escaped.len() / 2);
    let mut state = RenderState::Normal;

    for line in escaped.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if state == RenderState::InPreformattedBlock {
            if line.starts_with(FENCE) {
                out.push_str("</pre>\n");
                state = RenderState::Normal;
            } else {
                out.push_str(line);
                out.push('\n');
            }
            continue;
        }

        if state == RenderState::InListBlock && is_blank(line) {
            out.push_str("</ul>\n");
            state = RenderState::Normal;
            continue;
        }

        if line.starts_with('#') {
            let body = line.trim_start_matches('#');
            let level = line.len() - body.len();
            let body = body.trim_start();
            out.push_str(&format!("<h{level}>{body}</h{level}>\n"));
        } else if line.starts_with(FENCE) {
            if state == RenderState::InListBlock {
                out.push_str("</ul>\n");
            }
            out.push_str("<pre>\n");
            state = RenderState::InPreformattedBlock;
        } else if let Some(item) = list_item(line) {
            if state != RenderState::InListBlock {
                out.push_str("<ul>\n");
                state = RenderState::InListBlock;
            }
            out.push_str(&format!("<li>{item}</li>\n"));
        } else if !is_blank(line) {
            out.push_str("<p>");
            out.push_str(&linkify(line));
            out.push_str("</p>\n");
        }
    }

    match state {
        RenderState::InPreformattedBlock => out.push_str("</pre>\n"),
        RenderState::InListBlock => out.push_str("</ul>\n"),
        RenderState::Normal => {}
    }

    out
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// `- text` with at least one whitespace character after the dash.
fn list_item(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('-')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim_start())
}

/// Replace every `[PageName]` token with a link to that page's view path.
pub fn linkify(line: &str) -> String {
    link_pattern()
        .replace_all(line, r#"<a href="/view/$1">$1</a>"#)
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_empty_input() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn test_plain_paragraphs() {
        let html = render("first line\n\n\nsecond line\n");
        assert_eq!(html, "<p>first line</p>\n<p>second line</p>\n");
        assert!(!html.contains("<h"));
        assert!(!html.contains("<ul>"));
        assert!(!html.contains("<pre>"));
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(render("# Title"), "<h1>Title</h1>\n");
        assert_eq!(render("### Title"), "<h3>Title</h3>\n");
        assert_eq!(render("##NoSpace"), "<h2>NoSpace</h2>\n");
    }

    #[test]
    fn test_list_closed_by_blank_line() {
        let html = render("- a\n- b\n\nafter");
        assert_eq!(
            html,
            "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n<p>after</p>\n"
        );
    }

    #[test]
    fn test_list_closed_at_end_of_input() {
        assert_eq!(render("- a\n- b\n"), "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n");
        assert_eq!(render("- only"), "<ul>\n<li>only</li>\n</ul>\n");
    }

    #[test]
    fn test_dash_without_space_is_paragraph() {
        assert_eq!(render("-not a list"), "<p>-not a list</p>\n");
    }

    #[test]
    fn test_preformatted_block_is_verbatim() {
        let html = render("```\n# not a heading\n- not a list\n[NoLink]\n```\nafter");
        assert_eq!(
            html,
            "<pre>\n# not a heading\n- not a list\n[NoLink]\n</pre>\n<p>after</p>\n"
        );
    }

    #[test]
    fn test_unterminated_preformatted_block_is_closed() {
        let html = render("```\nlet x = 1;");
        assert_eq!(html, "<pre>\nlet x = 1;\n</pre>\n");
        assert_eq!(html.matches("<pre>").count(), html.matches("</pre>").count());
    }

    #[test]
    fn test_fence_closes_open_list() {
        let html = render("- a\n```\ncode\n```\n\nafter");
        assert_eq!(
            html,
            "<ul>\n<li>a</li>\n</ul>\n<pre>\ncode\n</pre>\n<p>after</p>\n"
        );
        assert_eq!(html.matches("<ul>").count(), html.matches("</ul>").count());
    }

    #[test]
    fn test_link_substitution() {
        let html = render("[FooBar] text");
        assert_eq!(html, "<p><a href=\"/view/FooBar\">FooBar</a> text</p>\n");
    }

    #[test]
    fn test_multiple_links_per_line() {
        let html = render("see [HomePage] and [OtherPage], not [lower]");
        assert!(html.contains("<a href=\"/view/HomePage\">HomePage</a>"));
        assert!(html.contains("<a href=\"/view/OtherPage\">OtherPage</a>"));
        assert!(html.contains("[lower]"));
    }

    #[test]
    fn test_markup_characters_are_escaped() {
        let html = render("<script>alert(\"x\")</script>\n# a & b");
        assert_eq!(
            html,
            "<p>&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;</p>\n<h1>a &amp; b</h1>\n"
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(render("# Title\r\nbody\r\n"), "<h1>Title</h1>\n<p>body</p>\n");
    }
}
