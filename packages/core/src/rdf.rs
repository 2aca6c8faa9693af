//! Reading RDF sources into triples.
//!
//! Parsing goes through `oxrdfio`, so any of N-Triples, Turtle and RDF/XML
//! can feed the SKOS ingestion path. The format is chosen from the source
//! file's extension.

use std::path::Path;

use oxrdf::Triple;
use oxrdfio::RdfParser;

pub use oxrdfio::RdfFormat;

use crate::error::VocabError;

/// The RDF syntax of a source file, from its extension. `None` means the
/// record format.
///
/// | Extension | Format |
/// |-----------|--------|
/// | `nt` | N-Triples |
/// | `ttl` | Turtle |
/// | `rdf`, `owl`, `xml` | RDF/XML |
pub fn format_for_path(path: &Path) -> Option<RdfFormat> {
    match path.extension()?.to_str()? {
        "nt" => Some(RdfFormat::NTriples),
        "ttl" => Some(RdfFormat::Turtle),
        "rdf" | "owl" | "xml" => Some(RdfFormat::RdfXml),
        _ => None,
    }
}

/// Parse a whole document. Relative IRIs resolve against `base_iri`;
/// named graphs are flattened into the default graph.
pub fn parse_rdf(
    source_name: &str,
    text: &str,
    format: RdfFormat,
    base_iri: Option<&str>,
) -> Result<Vec<Triple>, VocabError> {
    let malformed = |reason: String| VocabError::MalformedRdf {
        source_name: source_name.to_string(),
        format: format.name().to_string(),
        reason,
    };

    let mut parser = RdfParser::from_format(format);
    if let Some(base) = base_iri {
        parser = parser
            .with_base_iri(base)
            .map_err(|e| malformed(format!("bad base IRI {base}: {e}")))?;
    }

    let mut triples = Vec::new();
    for quad in parser.for_reader(text.as_bytes()) {
        let quad = quad.map_err(|e| malformed(e.to_string()))?;
        triples.push(Triple {
            subject: quad.subject,
            predicate: quad.predicate,
            object: quad.object,
        });
    }
    tracing::debug!(source = source_name, format = format.name(), triples = triples.len(), "parsed RDF");
    Ok(triples)
}

/// Serialise triples as N-Triples, one statement per line.
pub fn write_ntriples(triples: &[Triple]) -> String {
    triples.iter().map(|t| format!("{t} .\n")).collect()
}

// --- tests -------------------------------------------------------------------
