//! Markdown transforms: bullet lists, checkbox glyphs, URL auto-linking.

use once_cell::sync::Lazy;
use regex::Regex;

/// HTTP/HTTPS URL pattern: scheme, then alphanumerics, a fixed punctuation
/// allowlist, and percent-encoded octets.
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://(?:[a-zA-Z0-9~#$\-_@.&+!*(),/?=:]|%[0-9a-fA-F][0-9a-fA-F])+")
        .expect("URL pattern is valid")
});

/// Render items as a markdown bullet block.
///
/// Literal `\n` escapes and embedded newlines are stripped from each item
/// so one item stays one line. With `wrap_links` each item becomes a
/// `[[cross-reference]]`. Every rendered line ends with a newline; an empty
/// input renders as the empty string rather than a lone blank line.
pub fn bulletize(items: &[String], wrap_links: bool) -> String {
    let mut bullets = String::new();
    for item in items {
        let item = item.replace("\\n", "").replace('\n', "");
        if wrap_links {
            bullets.push_str(&format!("- [[{item}]]\n"));
        } else {
            bullets.push_str(&format!("- {item}\n"));
        }
    }
    bullets
}

/// Replace ballot-box glyphs with markdown checkboxes.
///
/// Verbatim substring replacement, not line-anchored: `☐` becomes `- [ ]`
/// and `☑` becomes `- [x]` wherever they occur.
pub fn replace_checkboxes(text: &str) -> String {
    text.replace('\u{2610}', "- [ ]").replace('\u{2611}', "- [x]")
}

/// Wrap every URL occurrence in a markdown link `[url](url)`.
///
/// Replacement is literal substring substitution per distinct matched URL,
/// in first-match order; identical URLs are linked everywhere but only
/// substituted once. Known edge case: when one matched URL is a substring
/// of another, the later substitution can re-process already-linked text.
pub fn autolink_urls(text: &str) -> String {
    let mut urls: Vec<&str> = Vec::new();
    for m in URL_RE.find_iter(text) {
        if !urls.contains(&m.as_str()) {
            urls.push(m.as_str());
        }
    }

    let mut out = text.to_string();
    for url in urls {
        out = out.replace(url, &format!("[{url}]({url})"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulletize_plain() {
        let items = vec!["X".to_string(), "Y".to_string()];
        assert_eq!(bulletize(&items, false), "- X\n- Y\n");
    }

    #[test]
    fn test_bulletize_wrapped_as_references() {
        let items = vec!["X".to_string(), "Y".to_string()];
        assert_eq!(bulletize(&items, true), "- [[X]]\n- [[Y]]\n");
    }

    #[test]
    fn test_bulletize_strips_newlines_from_items() {
        let items = vec!["multi\nline".to_string(), "escaped\\nitem".to_string()];
        assert_eq!(bulletize(&items, false), "- multiline\n- escapeditem\n");
    }

    #[test]
    fn test_bulletize_empty_is_empty_string() {
        assert_eq!(bulletize(&[], false), "");
        assert_eq!(bulletize(&[], true), "");
    }

    #[test]
    fn test_checkbox_unchecked() {
        assert_eq!(replace_checkboxes("Buy milk\u{2610}"), "Buy milk- [ ]");
    }

    #[test]
    fn test_checkbox_checked() {
        assert_eq!(replace_checkboxes("\u{2611}Done item"), "- [x]Done item");
    }

    #[test]
    fn test_checkbox_not_line_anchored() {
        assert_eq!(
            replace_checkboxes("a\u{2610}b\u{2611}c"),
            "a- [ ]b- [x]c"
        );
    }

    #[test]
    fn test_autolink_simple_url() {
        assert_eq!(
            autolink_urls("see https://example.com for details"),
            "see [https://example.com](https://example.com) for details"
        );
    }

    #[test]
    fn test_autolink_http_and_query() {
        let text = "http://a.example/path?x=1&y=2 end";
        assert_eq!(
            autolink_urls(text),
            "[http://a.example/path?x=1&y=2](http://a.example/path?x=1&y=2) end"
        );
    }

    #[test]
    fn test_autolink_percent_encoding() {
        let text = "https://example.com/a%20b";
        assert_eq!(
            autolink_urls(text),
            "[https://example.com/a%20b](https://example.com/a%20b)"
        );
    }

    #[test]
    fn test_autolink_repeated_url_linked_everywhere() {
        let text = "https://example.com and again https://example.com";
        assert_eq!(
            autolink_urls(text),
            "[https://example.com](https://example.com) and again [https://example.com](https://example.com)"
        );
    }

    #[test]
    fn test_autolink_no_urls_unchanged() {
        assert_eq!(autolink_urls("no links here"), "no links here");
    }
}
