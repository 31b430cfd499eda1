//! Parse the optional front-matter block at the top of a TIL note.
//!
//! Hand-rolled `key: value` parsing (no YAML crate). Only the fields the
//! catalog uses are kept.

use regex::Regex;
use std::sync::LazyLock;

/// Parsed note frontmatter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    /// `None` when absent or blank
    pub title: Option<String>,
}

/// A note split into frontmatter and markdown body
#[derive(Debug, Clone)]
pub struct ParsedNote {
    pub frontmatter: Frontmatter,
    pub body: String,
}

static H1_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^# (.*)$").unwrap());

/// Parse a complete note file (frontmatter + body)
pub fn parse_note(content: &str) -> ParsedNote {
    let (yaml, body) = split_frontmatter(content);
    ParsedNote {
        frontmatter: parse_frontmatter(&yaml),
        body,
    }
}

/// Split content into (frontmatter_yaml, body). Returns empty frontmatter if none found.
///
/// The block must open on the very first line with `---` and close with a
/// line that is exactly `---`. An unterminated block is treated as body.
/// Only the closing fence's line break is consumed; blank lines after it stay
/// in the body.
pub fn split_frontmatter(content: &str) -> (String, String) {
    let text = content.strip_prefix('\u{feff}').unwrap_or(content);
    let Some(after_open) = strip_fence_line(text) else {
        return (String::new(), content.to_string());
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = after_open[..offset].trim().to_string();
            // `line` carries its own line break, so the body starts right after it
            let body = after_open[offset + line.len()..].to_string();
            return (yaml, body);
        }
        offset += line.len();
    }

    (String::new(), content.to_string())
}

fn strip_fence_line(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("---")?;
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}

/// Parse frontmatter `key: value` lines into a [`Frontmatter`]
fn parse_frontmatter(yaml: &str) -> Frontmatter {
    let mut fm = Frontmatter::default();

    for line in yaml.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = trimmed.split_once(':') {
            if key.trim() == "title" {
                let title = unquote(value);
                fm.title = if title.is_empty() { None } else { Some(title) };
            }
        }
    }

    fm
}

/// Text of the first `# ` heading line in a markdown body
pub fn first_heading(body: &str) -> Option<String> {
    H1_RE
        .captures(body)
        .map(|cap| cap[1].trim().to_string())
}

/// Remove surrounding quotes from a string
fn unquote(s: &str) -> String {
    let s = s.trim();
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
    {
        s[1..s.len() - 1].trim().to_string()
    } else {
        s.to_string()
    }
}
