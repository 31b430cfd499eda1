//! Derivation rules shared by every content store
//!
//! Turns a raw markdown file plus its location into a [`TilEntry`]. Stores do
//! the I/O; everything here is pure so both the disk and in-memory stores
//! produce identical entries.

use til_types::TilEntry;

use super::frontmatter;
use crate::error::{TilError, TilResult};

/// Category reported when a lookup resolves a file directly in the content
/// root. Such files are reachable by path but never listed.
pub const ROOT_CATEGORY: &str = "General";

const NOTE_EXTENSION: &str = ".md";

/// Whether a directory entry name should be loaded as a note.
///
/// Extension match is case-sensitive; `readme.md` is skipped in any casing.
pub fn is_note_file(file_name: &str) -> bool {
    match file_name.strip_suffix(NOTE_EXTENSION) {
        Some(stem) => !stem.is_empty() && !file_name.starts_with('.') && !stem.eq_ignore_ascii_case("readme"),
        None => false,
    }
}

/// Whether a directory should be scanned for notes
pub fn is_category_dir(dir_name: &str) -> bool {
    !dir_name.starts_with('.')
}

/// Upper-case the first character, leave the rest untouched
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "my-cool-fact.md" -> "My cool fact"
pub fn title_from_file_name(file_name: &str) -> String {
    let stem = file_name.strip_suffix(NOTE_EXTENSION).unwrap_or(file_name);
    capitalize(&stem.replace('-', " "))
}

/// Category for a note living in `dir` (`None` = content root)
pub fn category_for_dir(dir: Option<&str>) -> String {
    match dir {
        Some(dir) if !dir.is_empty() => capitalize(dir),
        _ => ROOT_CATEGORY.to_string(),
    }
}

/// Build a catalog entry for a file found in category directory `dir`.
///
/// Title is the frontmatter title, otherwise derived from the file name.
pub fn entry_from_scan(dir: &str, file_name: &str, raw: &str) -> TilEntry {
    let parsed = frontmatter::parse_note(raw);
    let title = parsed
        .frontmatter
        .title
        .unwrap_or_else(|| title_from_file_name(file_name));

    TilEntry {
        title,
        category: category_for_dir(Some(dir)),
        content: parsed.body,
        path: format!("{}/{}", dir, file_name),
    }
}

/// Build an entry for a direct lookup of `relative_path` (already normalized).
///
/// Title is the frontmatter title, else the first H1 heading, else empty.
pub fn entry_from_lookup(relative_path: &str, raw: &str) -> TilEntry {
    let parsed = frontmatter::parse_note(raw);
    let title = parsed
        .frontmatter
        .title
        .or_else(|| frontmatter::first_heading(&parsed.body))
        .unwrap_or_default();

    let dir = relative_path.rsplit_once('/').map(|(dir, _)| dir);

    TilEntry {
        title,
        category: category_for_dir(dir),
        content: parsed.body,
        path: relative_path.to_string(),
    }
}

/// Normalize a client-supplied lookup path to `dir/name.md`.
///
/// Leading and trailing slashes are dropped and `.md` is appended when
/// missing. Segments that could escape the root or reach hidden files are
/// rejected.
pub fn normalize_lookup_path(raw: &str) -> TilResult<String> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(TilError::InvalidPath("empty path".to_string()));
    }
    if trimmed.contains('\\') || trimmed.contains('\0') {
        return Err(TilError::InvalidPath(raw.to_string()));
    }
    if trimmed
        .split('/')
        .any(|segment| segment.is_empty() || segment.starts_with('.'))
    {
        return Err(TilError::InvalidPath(raw.to_string()));
    }

    if trimmed.ends_with(NOTE_EXTENSION) {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{}{}", trimmed, NOTE_EXTENSION))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_note_file() {
        assert!(is_note_file("my-cool-fact.md"));
        assert!(!is_note_file("README.md"));
        assert!(!is_note_file("readme.md"));
        assert!(!is_note_file("ReadMe.md"));
        assert!(!is_note_file("notes.MD"));
        assert!(!is_note_file("image.png"));
        assert!(!is_note_file(".draft.md"));
        assert!(!is_note_file(".md"));
    }

    #[test]
    fn test_is_category_dir() {
        assert!(is_category_dir("rust"));
        assert!(!is_category_dir(".git"));
        assert!(!is_category_dir(".github"));
    }

    #[test]
    fn test_title_from_file_name() {
        assert_eq!(title_from_file_name("my-cool-fact.md"), "My cool fact");
        assert_eq!(title_from_file_name("already.md"), "Already");
        assert_eq!(title_from_file_name("über-cool.md"), "Über cool");
    }

    #[test]
    fn test_category_for_dir() {
        assert_eq!(category_for_dir(Some("rust")), "Rust");
        assert_eq!(category_for_dir(Some("postgres")), "Postgres");
        assert_eq!(category_for_dir(Some("HTML")), "HTML");
        assert_eq!(category_for_dir(None), "General");
    }

    #[test]
    fn test_entry_from_scan_uses_file_name_title() {
        let entry = entry_from_scan("rust", "my-cool-fact.md", "# Something else\n\nBody");
        assert_eq!(entry.title, "My cool fact");
        assert_eq!(entry.category, "Rust");
        assert_eq!(entry.path, "rust/my-cool-fact.md");
        assert_eq!(entry.content, "# Something else\n\nBody");
    }

    #[test]
    fn test_entry_from_scan_prefers_frontmatter_title() {
        let raw = "---\ntitle: Borrowing Rules\n---\nBody";
        let entry = entry_from_scan("rust", "borrow.md", raw);
        assert_eq!(entry.title, "Borrowing Rules");
        assert_eq!(entry.content, "Body");
    }

    #[test]
    fn test_entry_from_lookup_title_rules() {
        let from_heading = entry_from_lookup("rust/a.md", "Intro\n# Heading Title\nBody");
        assert_eq!(from_heading.title, "Heading Title");

        let from_frontmatter = entry_from_lookup("rust/a.md", "---\ntitle: FM\n---\n# Heading\n");
        assert_eq!(from_frontmatter.title, "FM");

        let untitled = entry_from_lookup("rust/my-cool-fact.md", "No heading at all");
        assert_eq!(untitled.title, "");
        assert_eq!(untitled.category, "Rust");
    }

    #[test]
    fn test_entry_from_lookup_root_category() {
        let entry = entry_from_lookup("loose.md", "Body");
        assert_eq!(entry.category, "General");
        assert_eq!(entry.path, "loose.md");
    }

    #[test]
    fn test_normalize_lookup_path() {
        assert_eq!(normalize_lookup_path("rust/fact").unwrap(), "rust/fact.md");
        assert_eq!(normalize_lookup_path("rust/fact.md").unwrap(), "rust/fact.md");
        assert_eq!(normalize_lookup_path("/rust/fact/").unwrap(), "rust/fact.md");
        assert_eq!(normalize_lookup_path("loose").unwrap(), "loose.md");
    }

    #[test]
    fn test_normalize_lookup_path_rejects_escapes() {
        for bad in ["", "/", "../etc/passwd", "rust/../../x", ".git/config", "rust//fact", "a\\b"] {
            let err = normalize_lookup_path(bad).unwrap_err();
            assert!(matches!(err, TilError::InvalidPath(_)), "{bad:?} should be rejected");
        }
    }
}
