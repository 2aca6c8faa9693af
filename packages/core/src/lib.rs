//! Controlled vocabularies: from term lists to published RDF documents.
//!
//! This crate reads a vocabulary from its compact record format (or from
//! SKOS in N-Triples, Turtle or RDF/XML), resolves the indentation-style hierarchy into wider
//! relations, computes the narrower lookup, and renders the result as
//! Turtle, XHTML and JSON together with the index files a web server needs.
//! It is the library behind the `vweft` CLI.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`types`] | Core data types: [`Term`], [`Predicate`], [`Relation`], [`Flavour`], [`ObjectRef`] |
//! | [`validation`] | Identifier, URI and timestamp checks |
//! | [`record`] | Tokenising the record format into [`TermRecord`]s |
//! | [`relations`] | The `pred(obj)` annotation grammar |
//! | [`hierarchy`] | Depth numbers to parent identifiers |
//! | [`closure`] | Narrower lookup from wider relations |
//! | [`vocabulary`] | [`Vocabulary`], [`VocabularyMeta`] and [`TermGraphBuilder`] |
//! | [`rdf`], [`skos`] | Ingesting externally sourced SKOS |
//! | [`render`] | Turtle, HTML, JSON, `META.INF` and `.htaccess` |
//! | [`config`] | The JSON vocabulary definitions file |
//! | [`publish`] | Writing a vocabulary's files to disk |
//! | [`index`] | The index page of a published tree |
//! | [`external`] | External programs (RDF/XML conversion) |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use vocabweft::{Flavour, Vocabulary, VocabularyMeta};
//!
//! let meta = VocabularyMeta::new("demo", "Demo", "Demo terms.", "Ann", "2024-05-01")?;
//! let vocab = Vocabulary::from_records(
//!     meta,
//!     Flavour::RdfClass,
//!     "terms.csv",
//!     "star;1;Star;A ball of gas.\ndwarf;2;Dwarf;A small star.\n",
//! )?;
//! assert_eq!(vocab.narrower("star"), ["dwarf".to_string()]);
//! print!("{}", vocabweft::render::turtle::render_turtle(&vocab));
//! ```

pub mod closure;
pub mod config;
pub mod error;
pub mod external;
pub mod hierarchy;
pub mod index;
pub mod publish;
pub mod rdf;
pub mod record;
pub mod relations;
pub mod render;
pub mod skos;
pub mod types;
pub mod validation;
pub mod vocabulary;

pub use config::{Config, VocabularyConfig, VocabularyDefinition};
pub use error::VocabError;
pub use external::{RdfXmlConverter, Rapper};
pub use publish::{Artifact, BatchReport, Publisher};
pub use rdf::RdfFormat;
pub use record::{parse_records, TermRecord};
pub use skos::{CommandNormalizer, PassThrough, SkosNormalizer};
pub use types::{Flavour, FlavourSpec, ObjectRef, Predicate, Relation, Term};
pub use vocabulary::{TermGraphBuilder, Vocabulary, VocabularyMeta, DEFAULT_ROOT_URI};
