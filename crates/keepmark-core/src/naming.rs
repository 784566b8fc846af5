//! Artifact naming: filename sanitization and duplicate resolution.

use std::collections::HashSet;

/// Maximum artifact base-name length in characters.
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Characters that may not appear in an artifact file name.
pub const ILLEGAL_FILE_CHARS: &[char] = &[
    '<', '>', ':', '"', '/', '\\', '|', '?', '*', '&', '\n', '\r', '\t',
];

/// Strip illegal filename characters from a candidate title.
///
/// Truncates to the first [`MAX_FILENAME_LENGTH`] characters, then replaces
/// each illegal character with a single space. Total and idempotent; empty
/// input yields empty output.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| if ILLEGAL_FILE_CHARS.contains(&c) { ' ' } else { c })
        .collect()
}

/// Resolve a base name to one unique among `existing` names.
///
/// Returns `base` unchanged when it is not taken, otherwise appends `_1`,
/// `_2`, … until a free name is found. Pure; callers supply the existing
/// set from a directory listing.
pub fn resolve_unique(base: &str, existing: &HashSet<String>) -> String {
    if !existing.contains(base) {
        return base.to_string();
    }
    let mut index = 1usize;
    loop {
        let candidate = format!("{base}_{index}");
        if !existing.contains(&candidate) {
            return candidate;
        }
        index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_illegal_chars_with_spaces() {
        assert_eq!(sanitize_title("a/b:c?d"), "a b c d");
        assert_eq!(sanitize_title("tab\there"), "tab here");
        assert_eq!(sanitize_title("line\nbreak"), "line break");
    }

    #[test]
    fn test_sanitize_preserves_legal_chars() {
        assert_eq!(sanitize_title("Meeting Notes (2024)"), "Meeting Notes (2024)");
    }

    #[test]
    fn test_sanitize_empty() {
        assert_eq!(sanitize_title(""), "");
    }

    #[test]
    fn test_sanitize_truncates_to_max_length() {
        let long = "x".repeat(400);
        let sanitized = sanitize_title(&long);
        assert_eq!(sanitized.chars().count(), MAX_FILENAME_LENGTH);
    }

    #[test]
    fn test_sanitize_truncates_before_replacing() {
        // An illegal char past the cutoff never survives into the output.
        let mut long = "y".repeat(MAX_FILENAME_LENGTH);
        long.push('/');
        assert_eq!(sanitize_title(&long), "y".repeat(MAX_FILENAME_LENGTH));
    }

    #[test]
    fn test_sanitize_idempotent() {
        let inputs = ["a/b:c", "plain title", "", "mix<of>chars|and\ttabs"];
        for input in inputs {
            let once = sanitize_title(input);
            assert_eq!(sanitize_title(&once), once);
        }
    }

    #[test]
    fn test_sanitize_output_has_no_illegal_chars() {
        let sanitized = sanitize_title("<>:\"/\\|?*&\n\r\t");
        assert!(sanitized.chars().all(|c| !ILLEGAL_FILE_CHARS.contains(&c)));
    }

    #[test]
    fn test_resolve_unique_free_name_unchanged() {
        let existing = HashSet::new();
        assert_eq!(resolve_unique("Meeting Notes", &existing), "Meeting Notes");
    }

    #[test]
    fn test_resolve_unique_appends_suffix() {
        let existing: HashSet<String> = ["Meeting Notes".to_string()].into_iter().collect();
        assert_eq!(resolve_unique("Meeting Notes", &existing), "Meeting Notes_1");
    }

    #[test]
    fn test_resolve_unique_increments_until_free() {
        let existing: HashSet<String> = [
            "Note".to_string(),
            "Note_1".to_string(),
            "Note_2".to_string(),
        ]
        .into_iter()
        .collect();
        assert_eq!(resolve_unique("Note", &existing), "Note_3");
    }

    #[test]
    fn test_resolve_unique_result_not_in_existing() {
        let existing: HashSet<String> =
            (0..50).map(|i| format!("Title_{i}")).chain(["Title".to_string()]).collect();
        let resolved = resolve_unique("Title", &existing);
        assert!(!existing.contains(&resolved));
    }
}
