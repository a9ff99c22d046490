//! Rich text normalisation.
//!
//! The frontend never receives markup: rich text becomes a flat list of plain
//! paragraph strings, with line breaks kept as `\n` inside a paragraph.

use std::sync::LazyLock;

use regex::Regex;

/// `<br>`, `<br/>`, `<br />` in any case.
///
/// # Panics
///
/// Panics if the hard-coded regex literal is invalid (impossible in practice).
#[allow(clippy::expect_used)]
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid regex literal"));

/// Opening or closing paragraph tag, with attributes.
#[allow(clippy::expect_used)]
static PARAGRAPH_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?p(\s[^>]*)?>").expect("valid regex literal"));

/// Any remaining tag.
#[allow(clippy::expect_used)]
static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex literal"));

/// Split rich text into plain paragraphs.
///
/// Line breaks become `\n`, paragraph tags delimit paragraphs, other tags are
/// stripped, and paragraphs that are empty after stripping are dropped.
pub fn paragraphs(html: &str) -> Vec<String> {
    let with_newlines = LINE_BREAK.replace_all(html, "\n");
    PARAGRAPH_TAG
        .split(&with_newlines)
        .map(|chunk| ANY_TAG.replace_all(chunk, "").trim().to_string())
        .filter(|paragraph| !paragraph.is_empty())
        .collect()
}

/// Strip all markup, keeping text content only.
pub fn strip_tags(html: &str) -> String {
    ANY_TAG.replace_all(html, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_and_line_breaks() {
        assert_eq!(paragraphs("<p>A</p><p>B<br/>C</p>"), vec!["A", "B\nC"]);
    }

    #[test]
    fn br_variants() {
        assert_eq!(
            paragraphs("<p>one<br>two<BR />three</p>"),
            vec!["one\ntwo\nthree"]
        );
    }

    #[test]
    fn inline_markup_is_stripped() {
        assert_eq!(
            paragraphs(r#"<p class="lead">Hello <b>bold</b> <a href="/x">link</a></p>"#),
            vec!["Hello bold link"]
        );
    }

    #[test]
    fn empty_paragraphs_dropped() {
        assert_eq!(
            paragraphs("<p></p><p>  <i></i> </p><p>kept</p>"),
            vec!["kept"]
        );
        assert!(paragraphs("").is_empty());
    }

    #[test]
    fn text_without_paragraph_tags() {
        assert_eq!(paragraphs("<h2>Our <i>work</i></h2>"), vec!["Our work"]);
        assert_eq!(paragraphs("plain"), vec!["plain"]);
    }

    #[test]
    fn pre_is_not_a_paragraph_boundary() {
        assert_eq!(paragraphs("<pre>code</pre>"), vec!["code"]);
    }

    #[test]
    fn strip_tags_keeps_text() {
        assert_eq!(
            strip_tags("<p><strong>Name:</strong> Ada</p>"),
            "Name: Ada"
        );
    }
}
