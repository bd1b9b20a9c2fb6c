//! Page templates with `{{name}}` placeholders.

pub const VIEW: &str = include_str!("../templates/view.html");
pub const EDIT: &str = include_str!("../templates/edit.html");
pub const HISTORY: &str = include_str!("../templates/history.html");

/// Substitute `{{name}}` placeholders in a single pass. Values are inserted
/// as-is, so callers escape them first. Unknown placeholders are left intact.
pub fn render_template(template: &str, context: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };

        let name = after[..close].trim();
        match context.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after[close + 2..];
    }

    out.push_str(rest);
    out
}
