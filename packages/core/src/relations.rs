//! The relation annotation mini-language.
//!
//! The last column of a term record holds whitespace-separated tokens of the
//! form `predicate[(object)]`:
//!
//! ```text
//! ivoasem:deprecated ivoasem:useInstead(newterm) skos:exactMatch(https://example.org/t)
//! ```
//!
//! A token without an object yields a blank (flag) relation. A bare local
//! identifier as object is turned into a fragment reference (`newterm` becomes
//! `#newterm`).

use crate::error::VocabError;
use crate::types::{Relation, Term};
use crate::validation::{localize, RELATION_TOKEN_RE};

/// One parsed annotation token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationToken {
    pub predicate: String,
    pub object: Option<String>,
}

/// Split `annotation` into tokens. `term` only appears in error messages.
///
/// Predicates are not checked here; that happens when the tokens are added
/// to a [`Term`] through [`apply_annotation`].
pub fn parse_annotation(term: &str, annotation: &str) -> Result<Vec<RelationToken>, VocabError> {
    annotation
        .split_whitespace()
        .map(|token| {
            let caps = RELATION_TOKEN_RE
                .captures(token)
                .ok_or_else(|| VocabError::MalformedRelation {
                    term: term.to_string(),
                    token: token.to_string(),
                })?;
            Ok(RelationToken {
                predicate: caps[1].to_string(),
                object: caps.get(2).map(|m| localize(m.as_str())),
            })
        })
        .collect()
}

/// Parse `annotation` and add every relation to `term`.
pub fn apply_annotation(term: &mut Term, annotation: &str) -> Result<(), VocabError> {
    for token in parse_annotation(term.identifier(), annotation)? {
        term.add_relation(&token.predicate, token.object)?;
    }
    Ok(())
}

/// Write relations back out in annotation syntax, sorted.
pub fn format_annotation<'a>(relations: impl IntoIterator<Item = &'a Relation>) -> String {
    let mut rels: Vec<&Relation> = relations.into_iter().collect();
    rels.sort();
    rels.iter()
        .map(|r| match &r.object {
            Some(obj) => format!("{}({})", r.predicate, obj),
            None => r.predicate.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// --- tests -------------------------------------------------------------------
