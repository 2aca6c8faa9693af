//! Flattened JSON rendering for clients that do not speak RDF.
//!
//! Terms are keyed by identifier; relation objects are shown the way
//! readers see them (bare identifiers for local terms, full URIs
//! otherwise). Next to the convenience fields, `relations` carries every
//! relation of a term keyed by predicate, with `null` for a blank object,
//! so nothing in the Turtle rendering is missing here.

use std::collections::BTreeMap;

use serde::Serialize;

use super::object_text;
use crate::error::VocabError;
use crate::types::{Predicate, Term};
use crate::vocabulary::Vocabulary;

#[derive(Debug, Serialize)]
struct VocabularyDoc<'a> {
    uri: &'a str,
    flavour: &'a str,
    title: &'a str,
    description: &'a str,
    timestamp: &'a str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    draft: bool,
    terms: BTreeMap<&'a str, TermDoc<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TermDoc<'a> {
    label: &'a str,
    description: &'a str,
    wider: Vec<&'a str>,
    narrower: Vec<&'a str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    preliminary: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    deprecated: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    relations: BTreeMap<&'static str, Vec<Option<&'a str>>>,
}

impl<'a> TermDoc<'a> {
    fn new(vocab: &'a Vocabulary, term: &'a Term) -> Self {
        let mut relations: BTreeMap<&'static str, Vec<Option<&'a str>>> = BTreeMap::new();
        for rel in term.sorted_relations() {
            relations
                .entry(rel.predicate.as_curie())
                .or_default()
                .push(rel.object.as_deref().map(object_text));
        }
        Self {
            label: term.label(),
            description: term.description(),
            wider: vocab.wider(term).into_iter().map(object_text).collect(),
            narrower: vocab
                .narrower(term.identifier())
                .iter()
                .map(String::as_str)
                .collect(),
            preliminary: term.has_flag(Predicate::Preliminary),
            deprecated: term.has_flag(Predicate::Deprecated),
            relations,
        }
    }
}

/// Render the vocabulary as pretty-printed JSON.
pub fn render_json(vocab: &Vocabulary) -> Result<String, VocabError> {
    let meta = vocab.meta();
    let doc = VocabularyDoc {
        uri: meta.baseuri(),
        flavour: vocab.spec().name,
        title: meta.title(),
        description: meta.description(),
        timestamp: meta.timestamp(),
        draft: meta.draft(),
        terms: vocab
            .sorted_terms()
            .into_iter()
            .map(|t| (t.identifier(), TermDoc::new(vocab, t)))
            .collect(),
    };
    let mut out = serde_json::to_string_pretty(&doc)?;
    out.push('\n');
    Ok(out)
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Flavour;
    use crate::vocabulary::VocabularyMeta;
    use serde_json::{json, Value};

    #[test]
    fn shape_of_document() {
        let meta = VocabularyMeta::new("demo", "Demo", "Demo terms.", "Ann", "2024-05-01").unwrap();
        let v = Vocabulary::from_records(
            meta,
            Flavour::RdfClass,
            "terms.csv",
            "a;1;A;First\nb;2;B;Second;skos:exactMatch(https://example.org/b)\nc;3;C;Third;ivoasem:deprecated ivoasem:useInstead(b)\n",
        )
        .unwrap();

        let value: Value = serde_json::from_str(&render_json(&v).unwrap()).unwrap();
        assert_eq!(value["uri"], "http://www.ivoa.net/rdf/demo");
        assert_eq!(value["flavour"], "RDF Class");
        assert!(value.get("draft").is_none());
        assert_eq!(
            value["terms"]["a"],
            json!({"label": "A", "description": "First", "wider": [], "narrower": ["b", "c"]})
        );
        assert_eq!(
            value["terms"]["b"]["relations"]["skos:exactMatch"],
            json!(["https://example.org/b"])
        );
        assert_eq!(value["terms"]["c"]["wider"], json!(["b"]));
        assert_eq!(value["terms"]["c"]["deprecated"], json!(true));
        assert_eq!(
            value["terms"]["c"]["relations"],
            json!({
                "ivoasem:deprecated": [null],
                "ivoasem:useInstead": ["b"],
                "rdfs:subClassOf": ["b"]
            })
        );
    }

    #[test]
    fn every_relation_is_kept() {
        let meta = VocabularyMeta::new("demo", "Demo", "Demo terms.", "Ann", "2024-05-01").unwrap();
        let v = Vocabulary::from_records(
            meta,
            Flavour::RdfClass,
            "terms.csv",
            "a;1;A;\nb;1;B;;skos:broader(a) rdfs:subPropertyOf(a) skos:related ivoasem:deprecated(a)\n",
        )
        .unwrap();

        let value: Value = serde_json::from_str(&render_json(&v).unwrap()).unwrap();
        let b = &value["terms"]["b"];
        assert_eq!(b["wider"], json!([]));
        assert!(b.get("deprecated").is_none());
        assert_eq!(
            b["relations"],
            json!({
                "ivoasem:deprecated": ["a"],
                "rdfs:subPropertyOf": ["a"],
                "skos:broader": ["a"],
                "skos:related": [null]
            })
        );
        assert!(value["terms"]["a"].get("relations").is_none());
    }

    #[test]
    fn keys_are_sorted() {
        let meta = VocabularyMeta::new("demo", "Demo", "Demo terms.", "Ann", "2024-05-01").unwrap();
        let v = Vocabulary::from_records(meta, Flavour::Skos, "t.csv", "zeta;1;Z;\nalpha;1;A;\n")
            .unwrap();
        let out = render_json(&v).unwrap();
        assert!(out.find("\"alpha\"").unwrap() < out.find("\"zeta\"").unwrap());
    }
}
