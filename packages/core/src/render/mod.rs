//! Output documents generated from a [`Vocabulary`](crate::Vocabulary).
//!
//! Every renderer is a pure function of the vocabulary: terms in identifier
//! order, relations sorted, narrower lists from the precomputed closure.
//! Relation objects are classified once, by [`ObjectRef::classify`], so a
//! local term is an in-document anchor and an external URI a hyperlink in
//! every format.
//!
//! | Module | Output |
//! |--------|--------|
//! | [`turtle`] | Turtle (`.ttl`) |
//! | [`html`] | XHTML table (`.html`) |
//! | [`json`] | Flattened JSON (`.json`) |
//! | [`meta`] | `META.INF` index entry and `.htaccess` |
//! | [`index`] | The vocabulary table of the tree's index page |

pub mod html;
pub mod index;
pub mod json;
pub mod meta;
pub mod turtle;

use crate::types::ObjectRef;

/// Escape text for use in XHTML content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// The identifier or URI a reader sees for a relation object.
pub fn object_text(object: &str) -> &str {
    ObjectRef::classify(object).display_text()
}

/// Greedy word wrap at `width` columns.
///
/// `first` prefixes the first line, `rest` every following one.
pub(crate) fn wrap(text: &str, width: usize, first: &str, rest: &str) -> String {
    let mut out = String::from(first);
    let mut line_len = first.chars().count();
    let mut at_line_start = true;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if !at_line_start && line_len + 1 + word_len > width {
            out.push('\n');
            out.push_str(rest);
            line_len = rest.chars().count();
            at_line_start = true;
        }
        if !at_line_start {
            out.push(' ');
            line_len += 1;
        }
        out.push_str(word);
        line_len += word_len;
        at_line_start = false;
    }
    out
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn object_text_strips_fragment_marker() {
        assert_eq!(object_text("#star"), "star");
        assert_eq!(object_text("https://x.org/a#b"), "https://x.org/a#b");
    }

    #[test]
    fn wraps_words() {
        let w = wrap("one two three four five", 14, "D: ", "  ");
        assert_eq!(w, "D: one two\n  three four\n  five");
        assert_eq!(wrap("", 10, "D: ", "  "), "D: ");
    }

    #[test]
    fn overlong_word_gets_own_line() {
        let w = wrap("a supercalifragilistic b", 10, "", "");
        assert_eq!(w, "a\nsupercalifragilistic\nb");
    }
}
