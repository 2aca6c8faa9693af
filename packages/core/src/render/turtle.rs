//! Turtle rendering.
//!
//! ```text
//! @base <http://www.ivoa.net/rdf/demo>.
//! @prefix : <#>.
//! ...
//! <#dwarf> a rdfs:Class;
//!   rdfs:label "Dwarf star";
//!   rdfs:comment "A small star.";
//!   rdfs:subClassOf <#star>.
//! ```

use crate::types::{ObjectRef, Term};
use crate::validation::is_curie;
use crate::vocabulary::Vocabulary;

const PREFIXES: &str = "\
@prefix dc: <http://purl.org/dc/terms/> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix foaf: <http://xmlns.com/foaf/0.1/>.
@prefix ivoasem: <http://www.ivoa.net/rdf/ivoasem#>.
@prefix skos: <http://www.w3.org/2004/02/skos/core#>.
";

const ANNOTATION_PROPERTIES: &str = "\
dc:created a owl:AnnotationProperty.
dc:creator a owl:AnnotationProperty.
dc:title a owl:AnnotationProperty.
dc:description a owl:AnnotationProperty.
";

/// Render the whole vocabulary as a Turtle document.
pub fn render_turtle(vocab: &Vocabulary) -> String {
    let meta = vocab.meta();
    let mut out = format!("@base <{}>.\n@prefix : <#>.\n\n{}\n", meta.baseuri(), PREFIXES);

    let creators = meta
        .author_list()
        .iter()
        .map(|a| format!("[ foaf:name {} ]", string_literal(a)))
        .collect::<Vec<_>>()
        .join(",\n    ");
    let title = string_literal(meta.title());

    out.push_str("<> a owl:Ontology;\n");
    out.push_str(&format!("    dc:created {};\n", string_literal(meta.timestamp())));
    out.push_str(&format!("    dc:creator {creators};\n"));
    out.push_str(&format!("    rdfs:label {title}@en;\n"));
    out.push_str(&format!("    dc:title {title}@en;\n"));
    out.push_str(&format!(
        "    dc:description {};\n",
        string_literal(meta.description())
    ));
    out.push_str(&format!(
        "    ivoasem:vocflavour {}.\n\n",
        string_literal(vocab.spec().name)
    ));
    out.push_str(ANNOTATION_PROPERTIES);
    out.push('\n');

    for term in vocab.sorted_terms() {
        out.push_str(&render_term(vocab, term));
        out.push_str("\n\n");
    }
    out
}

/// One term as a Turtle statement block.
pub fn render_term(vocab: &Vocabulary, term: &Term) -> String {
    let spec = vocab.spec();
    let mut parts = vec![
        format!("<#{}> a {}", term.identifier(), spec.term_class),
        format!("{} {}", spec.label_property, string_literal(term.label())),
        format!(
            "{} {}",
            spec.description_property,
            string_literal(term.description())
        ),
    ];
    for rel in term.sorted_relations() {
        let object = match &rel.object {
            Some(obj) => object_term(obj),
            None => "[]".to_string(),
        };
        parts.push(format!("{} {}", rel.predicate, object));
    }
    parts.join(";\n  ") + "."
}

/// A relation object: IRI, prefixed name, or string literal.
pub fn object_term(object: &str) -> String {
    match ObjectRef::classify(object) {
        ObjectRef::Anchor(fragment) => format!("<#{fragment}>"),
        ObjectRef::External(uri) => format!("<{uri}>"),
        ObjectRef::Plain(s) if is_curie(s) => s.to_string(),
        ObjectRef::Plain(s) => string_literal(s),
    }
}

/// A double-quoted Turtle string with escapes.
pub fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

// --- tests -------------------------------------------------------------------
