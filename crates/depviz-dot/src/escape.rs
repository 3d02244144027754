//! Quoting and escaping rules for DOT identifiers and labels.

use std::borrow::Cow;

/// DOT keywords, matched case-insensitively; these cannot be used as bare IDs.
const KEYWORDS: [&str; 6] = ["node", "edge", "graph", "digraph", "subgraph", "strict"];

/// Escape a string for use inside a double-quoted DOT string.
///
/// Backslashes and double quotes are escaped, and line breaks are written
/// as the `\n` escape so every statement stays on one line.
///
/// # Examples
///
/// ```
/// use depviz_dot::escape_label;
///
/// assert_eq!(escape_label(r#"say "hi""#), r#"say \"hi\""#);
/// ```
#[must_use]
pub fn escape_label(label: &str) -> Cow<'_, str> {
    if !label.contains(['\\', '"', '\n', '\r']) {
        return Cow::Borrowed(label);
    }

    let mut escaped = String::with_capacity(label.len() + 8);
    for c in label.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

/// Format a string as a DOT ID, quoting it when it is not a bare identifier
/// or numeral.
///
/// # Examples
///
/// ```
/// use depviz_dot::format_id;
///
/// assert_eq!(format_id("dependencies"), "dependencies");
/// assert_eq!(format_id("42"), "42");
/// assert_eq!(format_id("my-graph"), "\"my-graph\"");
/// ```
#[must_use]
pub fn format_id(id: &str) -> Cow<'_, str> {
    if is_bare_identifier(id) || is_numeral(id) {
        Cow::Borrowed(id)
    } else {
        Cow::Owned(format!("\"{}\"", escape_label(id)))
    }
}

fn is_bare_identifier(id: &str) -> bool {
    let mut chars = id.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(id))
}

fn is_numeral(id: &str) -> bool {
    let digits = id.strip_prefix('-').unwrap_or(id);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
