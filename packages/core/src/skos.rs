//! Building a vocabulary from externally sourced SKOS triples.
//!
//! Every subject inside `baseuri#` becomes a term. Labels and definitions
//! are single-valued; broader links become the parent list; the remaining
//! supported properties are folded into the relation annotation syntax and
//! go through the same grammar as record sources.

use std::collections::BTreeMap;

use oxrdf::{Subject, Term as RdfTerm, Triple};

use crate::error::VocabError;
use crate::external::run_filter;
use crate::rdf::{parse_rdf, write_ntriples, RdfFormat};
use crate::types::Flavour;
use crate::vocabulary::{TermGraphBuilder, Vocabulary, VocabularyMeta};

const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
const IVOASEM: &str = "http://www.ivoa.net/rdf/ivoasem#";

/// What to do with a property found on a term subject.
enum PropertyRole {
    Label,
    Definition,
    Broader,
    /// Carries an object; the annotation predicate to use.
    Relation(&'static str),
    /// Flag; the annotation predicate to use.
    Flag(&'static str),
    Ignored,
}

fn property_role(iri: &str) -> Option<PropertyRole> {
    if let Some(local) = iri.strip_prefix(SKOS) {
        return match local {
            "prefLabel" => Some(PropertyRole::Label),
            "definition" => Some(PropertyRole::Definition),
            "broader" => Some(PropertyRole::Broader),
            "exactMatch" => Some(PropertyRole::Relation("skos:exactMatch")),
            "related" => Some(PropertyRole::Relation("skos:related")),
            "inScheme" | "topConceptOf" | "narrower" => Some(PropertyRole::Ignored),
            _ => None,
        };
    }
    if let Some(local) = iri.strip_prefix(IVOASEM) {
        return match local {
            "useInstead" => Some(PropertyRole::Relation("ivoasem:useInstead")),
            "deprecated" => Some(PropertyRole::Flag("ivoasem:deprecated")),
            "preliminary" => Some(PropertyRole::Flag("ivoasem:preliminary")),
            _ => None,
        };
    }
    if iri == format!("{RDF}type") {
        return Some(PropertyRole::Ignored);
    }
    None
}

/// Reshapes arbitrary RDF into well-formed SKOS before terms are extracted.
pub trait SkosNormalizer {
    fn normalize(&self, triples: Vec<Triple>) -> Result<Vec<Triple>, VocabError>;
}

/// Uses the triples as they are.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThrough;

impl SkosNormalizer for PassThrough {
    fn normalize(&self, triples: Vec<Triple>) -> Result<Vec<Triple>, VocabError> {
        Ok(triples)
    }
}

/// Pipes N-Triples through an external program and reads N-Triples back.
#[derive(Debug, Clone)]
pub struct CommandNormalizer {
    pub program: String,
    pub args: Vec<String>,
}

impl SkosNormalizer for CommandNormalizer {
    fn normalize(&self, triples: Vec<Triple>) -> Result<Vec<Triple>, VocabError> {
        let text = run_filter(&self.program, &self.args, write_ntriples(&triples))?;
        parse_rdf(&self.program, &text, RdfFormat::NTriples, None)
    }
}

/// The IRI, blank node label, or literal text of a triple object.
fn object_text(object: &RdfTerm) -> String {
    match object {
        RdfTerm::NamedNode(node) => node.as_str().to_string(),
        RdfTerm::BlankNode(node) => node.as_str().to_string(),
        RdfTerm::Literal(literal) => literal.value().to_string(),
        #[allow(unreachable_patterns)]
        other => other.to_string(),
    }
}

/// Values collected for one subject.
#[derive(Default)]
struct Collected {
    labels: Vec<String>,
    definitions: Vec<String>,
    parents: Vec<String>,
    annotation: Vec<String>,
}

impl Vocabulary {
    /// Build a vocabulary from triples. Subjects outside `baseuri#` are
    /// skipped.
    pub fn from_triples(
        meta: VocabularyMeta,
        flavour: Flavour,
        triples: &[Triple],
    ) -> Result<Self, VocabError> {
        let namespace = format!("{}#", meta.baseuri());
        let shorten = |iri: &str| -> String {
            iri.strip_prefix(namespace.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| iri.to_string())
        };

        let mut subjects: BTreeMap<String, Collected> = BTreeMap::new();
        for triple in triples {
            let Subject::NamedNode(subject) = &triple.subject else {
                continue;
            };
            let Some(local) = subject.as_str().strip_prefix(namespace.as_str()) else {
                continue;
            };
            let entry = subjects.entry(local.to_string()).or_default();
            let object = object_text(&triple.object);

            let role = property_role(triple.predicate.as_str()).ok_or_else(|| {
                VocabError::UnknownPredicate {
                    term: local.to_string(),
                    predicate: triple.predicate.as_str().to_string(),
                    object: Some(object.clone()),
                }
            })?;
            match role {
                PropertyRole::Label => entry.labels.push(object),
                PropertyRole::Definition => entry.definitions.push(object),
                PropertyRole::Broader => entry.parents.push(shorten(&object)),
                PropertyRole::Relation(pred) => {
                    entry.annotation.push(format!("{pred}({})", shorten(&object)))
                }
                PropertyRole::Flag(pred) => entry.annotation.push(pred.to_string()),
                PropertyRole::Ignored => {}
            }
        }

        let mut builder = TermGraphBuilder::new(flavour, meta.draft());
        for (local, collected) in subjects {
            let label = pick_exactly_one(
                collected.labels,
                &format!("preferred label for {local}"),
                None,
            )?;
            let description = pick_exactly_one(
                collected.definitions,
                &format!("description for {local}"),
                Some(String::new()),
            )?;
            let annotation = collected.annotation.join(" ");
            builder.add_term(
                &local,
                &label,
                &description,
                &collected.parents,
                Some(annotation.as_str()).filter(|a| !a.is_empty()),
            )?;
        }

        let vocab = builder.finish(meta)?;
        tracing::info!(
            vocabulary = %vocab.meta().name(),
            terms = vocab.len(),
            "loaded vocabulary from triples"
        );
        Ok(vocab)
    }

    /// Parse an RDF document, normalise it, and build the vocabulary.
    /// Relative IRIs in the document resolve against the vocabulary URI.
    pub fn from_rdf(
        meta: VocabularyMeta,
        flavour: Flavour,
        source_name: &str,
        text: &str,
        format: RdfFormat,
        normalizer: &dyn SkosNormalizer,
    ) -> Result<Self, VocabError> {
        let triples = parse_rdf(source_name, text, format, Some(meta.baseuri()))?;
        let triples = normalizer.normalize(triples)?;
        Self::from_triples(meta, flavour, &triples)
    }
}

/// The single element of `values`. An empty list yields `default` if given.
fn pick_exactly_one(
    values: Vec<String>,
    what: &str,
    default: Option<String>,
) -> Result<String, VocabError> {
    let count = values.len();
    let mut values = values.into_iter();
    match (values.next(), values.next(), default) {
        (Some(only), None, _) => Ok(only),
        (None, _, Some(default)) => Ok(default),
        _ => Err(VocabError::NotExactlyOne {
            what: what.to_string(),
            count,
        }),
    }
}

// --- tests -------------------------------------------------------------------
