//! The error type shared by every stage of a vocabulary build.
//!
//! Variants fall into two classes. *Reportable* errors describe problems in
//! the vocabulary sources or configuration that an author is expected to fix;
//! they abort the current vocabulary with a one-line message. Everything else
//! (I/O on output, failing external tools, serialisation) is *unexpected* and
//! is surfaced with full diagnostic detail.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VocabError {
    #[error("vocabulary definition for {name} incomplete: {} missing", .missing.join(", "))]
    MissingMetadata { name: String, missing: Vec<String> },

    #[error("vocabulary {name} has unknown flavour {flavour:?}")]
    UnknownFlavour { name: String, flavour: String },

    #[error("vocabulary {0} is not defined in the configuration")]
    UndefinedVocabulary(String),

    #[error("timestamp of vocabulary {name} must be an ISO date (YYYY-MM-DD), got {value:?}")]
    InvalidTimestamp { name: String, value: String },

    #[error("unknown predicate in ({term}, {predicate}, {})", .object.as_deref().unwrap_or("<blank>"))]
    UnknownPredicate {
        term: String,
        predicate: String,
        object: Option<String>,
    },

    #[error("term fragment {0:?} does not match the identifier constraints")]
    MalformedIdentifier(String),

    #[error("invalid extra relationship on term {term}: '{token}'")]
    MalformedRelation { term: String, token: String },

    #[error("{source_name}, rec {index} (line {line}): incomplete record {record:?}")]
    IncompleteRecord {
        source_name: String,
        index: usize,
        line: usize,
        record: Vec<Option<String>>,
    },

    #[error("{source_name}, rec {index} (line {line}): hierarchy level must be a positive integer, got {value:?}")]
    InvalidDepth {
        source_name: String,
        index: usize,
        line: usize,
        value: String,
    },

    #[error(
        "{source_name}, rec {index} (line {line}): hierarchy level jumps from {previous} to {depth}; \
         levels may only increase by one"
    )]
    DepthJump {
        source_name: String,
        index: usize,
        line: usize,
        previous: usize,
        depth: usize,
    },

    #[error("{source_name}: unterminated quoted field starting on line {line}")]
    UnterminatedQuote { source_name: String, line: usize },

    #[error("duplicate term {0:?}")]
    DuplicateTerm(String),

    #[error("term {term} has {count} wider terms, but {flavour} vocabularies allow only one")]
    MultipleParents {
        term: String,
        count: usize,
        flavour: String,
    },

    #[error("expected terms file {path} cannot be read: {reason}")]
    UnreadableSource { path: PathBuf, reason: String },

    #[error("expected exactly one {what} but got {count}")]
    NotExactlyOne { what: String, count: usize },

    #[error("{source_name}: malformed {format}: {reason}")]
    MalformedRdf {
        source_name: String,
        format: String,
        reason: String,
    },

    #[error("vocabulary {name} has unusable base URI {value:?}; expected an absolute URI without fragment")]
    InvalidBaseUri { name: String, value: String },

    #[error("vocabulary {name}: {path:?} must be a relative path that stays inside the output tree")]
    UnsafePath { name: String, path: String },

    #[error("syntax error in {source_name}, line {line}: {reason}")]
    MalformedMetaInf {
        source_name: String,
        line: usize,
        reason: String,
    },

    #[error("{path} does not define a last change date and no local vocabulary versions were found")]
    NoVersions { path: PathBuf },

    #[error("cannot read index template {path}: {reason}")]
    UnreadableTemplate { path: PathBuf, reason: String },

    #[error("wider relation contains a cycle through term {0:?}")]
    CyclicHierarchy(String),

    #[error("cannot read vocabulary configuration {path}: {reason}")]
    UnreadableConfig { path: PathBuf, reason: String },

    #[error("{tool} failed: {message}")]
    Collaborator { tool: String, message: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl VocabError {
    /// `true` for errors caused by the vocabulary sources or configuration.
    pub fn is_reportable(&self) -> bool {
        !matches!(
            self,
            VocabError::Collaborator { .. } | VocabError::Io { .. } | VocabError::Json(_)
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VocabError::Io {
            path: path.into(),
            source,
        }
    }
}
