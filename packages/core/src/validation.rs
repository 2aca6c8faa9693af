//! Lexical checks shared by the parsers and renderers.

use std::path::{Component, Path};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::VocabError;

/// Characters allowed in a term identifier: `[\w-]+`.
static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w-]+$").expect("invalid identifier regex"));

/// `PREDICATE[(OBJECT)]`, both drawn from the full-term character class.
pub(crate) static RELATION_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([\w#:/.*%-]+)(?:\(([\w#:/.*%-]+)\))?$").expect("invalid relation regex")
});

/// A scheme prefix or a leading `#`. Deliberately loose.
static URI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[a-zA-Z]+://|#)").expect("invalid uri regex"));

/// An absolute URI with a scheme and no fragment.
static BASEURI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://[^\s#]+$").expect("invalid base uri regex")
});

/// Prefixed names such as `rdfs:Class` that Turtle can take verbatim.
static CURIE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w*:[\w.-]*$").expect("invalid curie regex"));

/// Returns `Ok(())` if `s` is usable as a term identifier.
pub fn validate_identifier(s: &str) -> Result<(), VocabError> {
    if is_plain_identifier(s) {
        Ok(())
    } else {
        Err(VocabError::MalformedIdentifier(s.to_string()))
    }
}

pub fn is_plain_identifier(s: &str) -> bool {
    IDENTIFIER_RE.is_match(s)
}

/// `true` if `s` looks like a URI: it starts with `scheme://` or `#`.
pub fn is_uri(s: &str) -> bool {
    URI_RE.is_match(s)
}

pub fn is_curie(s: &str) -> bool {
    CURIE_RE.is_match(s)
}

/// Turn a bare identifier into a same-vocabulary fragment reference; URIs and
/// anything else are returned unchanged.
pub fn localize(reference: &str) -> String {
    if is_plain_identifier(reference) {
        format!("#{reference}")
    } else {
        reference.to_string()
    }
}

/// Vocabulary timestamps are plain ISO dates.
pub fn validate_timestamp(name: &str, s: &str) -> Result<(), VocabError> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| VocabError::InvalidTimestamp {
            name: name.to_string(),
            value: s.to_string(),
        })
}

/// Term URIs are formed as `baseuri#identifier`, so the base must be
/// absolute and fragment-free.
pub fn validate_baseuri(name: &str, s: &str) -> Result<(), VocabError> {
    if BASEURI_RE.is_match(s) {
        Ok(())
    } else {
        Err(VocabError::InvalidBaseUri {
            name: name.to_string(),
            value: s.to_string(),
        })
    }
}

/// `path` is joined onto the output directory: it must be relative and made
/// of plain segments only.
pub fn validate_output_path(name: &str, path: &str) -> Result<(), VocabError> {
    let components: Vec<Component> = Path::new(path).components().collect();
    if components.is_empty() || !components.iter().all(|c| matches!(c, Component::Normal(_))) {
        return Err(VocabError::UnsafePath {
            name: name.to_string(),
            path: path.to_string(),
        });
    }
    Ok(())
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(validate_identifier("abc").is_ok());
        assert!(validate_identifier("a_b-c9").is_ok());
        assert!(validate_identifier("Größe").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("a b").is_err());
        assert!(validate_identifier("a#b").is_err());
        assert!(validate_identifier("a.b").is_err());
    }

    #[test]
    fn uri_heuristic() {
        assert!(is_uri("http://example.org"));
        assert!(is_uri("https://example.org/x#y"));
        assert!(is_uri("#local"));
        assert!(!is_uri("local"));
        assert!(!is_uri("rdfs:Class"));
        assert!(!is_uri("urn:x"));
    }

    #[test]
    fn localize_only_plain_identifiers() {
        assert_eq!(localize("foo"), "#foo");
        assert_eq!(localize("#foo"), "#foo");
        assert_eq!(localize("http://x.org/y"), "http://x.org/y");
        assert_eq!(localize("rdfs:Class"), "rdfs:Class");
    }

    #[test]
    fn curies() {
        assert!(is_curie("rdfs:Class"));
        assert!(is_curie(":__"));
        assert!(!is_curie("plain text"));
    }

    #[test]
    fn timestamps() {
        assert!(validate_timestamp("v", "2024-02-29").is_ok());
        assert!(validate_timestamp("v", "2023-02-29").is_err());
        assert!(validate_timestamp("v", "yesterday").is_err());
    }

    #[test]
    fn base_uris() {
        assert!(validate_baseuri("v", "http://www.ivoa.net/rdf/demo").is_ok());
        assert!(validate_baseuri("v", "urn+x://a").is_ok());
        assert!(validate_baseuri("v", "http://x.org/v#").is_err());
        assert!(validate_baseuri("v", "x.org/v").is_err());
        assert!(validate_baseuri("v", "http://x.org/a b").is_err());
    }

    #[test]
    fn output_paths() {
        assert!(validate_output_path("v", "demo").is_ok());
        assert!(validate_output_path("v", "old/demo").is_ok());
        assert!(validate_output_path("v", "/abs").is_err());
        assert!(validate_output_path("v", "a/../b").is_err());
        assert!(validate_output_path("v", "./a").is_err());
        assert!(validate_output_path("v", "").is_err());
    }

    #[test]
    fn relation_token_shape() {
        let caps = RELATION_TOKEN_RE.captures("skos:exactMatch(https://x.org/a)").unwrap();
        assert_eq!(&caps[1], "skos:exactMatch");
        assert_eq!(caps.get(2).map(|m| m.as_str()), Some("https://x.org/a"));
        let caps = RELATION_TOKEN_RE.captures("ivoasem:deprecated").unwrap();
        assert!(caps.get(2).is_none());
        assert!(RELATION_TOKEN_RE.captures("bad(token").is_none());
        assert!(RELATION_TOKEN_RE.captures("p(a b)").is_none());
    }
}
