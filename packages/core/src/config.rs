//! Vocabulary definitions, read from a JSON file.
//!
//! The file maps each vocabulary name to its metadata:
//!
//! ```json
//! {
//!   "object_type": {
//!     "flavour": "RDF Class",
//!     "title": "Object Types",
//!     "description": "Types of astronomical objects.",
//!     "authors": "Ann Author; Bob Builder",
//!     "timestamp": "2020-01-31",
//!     "draft": true
//!   }
//! }
//! ```
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `flavour` | required | `RDF Class`, `RDF Property` or `SKOS` |
//! | `title`, `description`, `authors`, `timestamp` | required | Vocabulary metadata |
//! | `draft` | `false` | Mark every term preliminary |
//! | `path` | name | Path segments below the root URI and the output directory; relative, no `..` |
//! | `baseuri` | root URI + path | Vocabulary URI |
//! | `filename` | `<path>/terms.csv` | Source file, relative to the config file; `.nt`, `.ttl` and `.rdf` select RDF |

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::VocabError;
use crate::rdf::{format_for_path, RdfFormat};
use crate::skos::SkosNormalizer;
use crate::types::Flavour;
use crate::vocabulary::{Vocabulary, VocabularyMeta, DEFAULT_ROOT_URI};

/// One entry of the configuration file, as written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VocabularyDefinition {
    pub flavour: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub authors: Option<String>,
    pub timestamp: Option<String>,
    #[serde(default)]
    pub draft: bool,
    pub path: Option<String>,
    pub baseuri: Option<String>,
    pub filename: Option<String>,
}

/// All vocabulary definitions plus the settings used to resolve them.
#[derive(Debug, Clone)]
pub struct Config {
    root_uri: String,
    base_dir: PathBuf,
    definitions: BTreeMap<String, VocabularyDefinition>,
}

impl Config {
    /// Read the configuration file at `path`. Source files are looked up
    /// relative to its directory.
    pub fn from_file(path: &Path, root_uri: Option<&str>) -> Result<Self, VocabError> {
        let unreadable = |reason: String| VocabError::UnreadableConfig {
            path: path.to_path_buf(),
            reason,
        };
        let text = fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::parse(&text, root_uri, base_dir).map_err(|e| match e {
            VocabError::Json(e) => unreadable(e.to_string()),
            other => other,
        })
    }

    /// Parse configuration text.
    pub fn parse(
        text: &str,
        root_uri: Option<&str>,
        base_dir: impl Into<PathBuf>,
    ) -> Result<Self, VocabError> {
        let definitions: BTreeMap<String, VocabularyDefinition> = serde_json::from_str(text)?;
        let mut root_uri = root_uri.unwrap_or(DEFAULT_ROOT_URI).to_string();
        if !root_uri.ends_with('/') {
            root_uri.push('/');
        }
        tracing::debug!(vocabularies = definitions.len(), root_uri = %root_uri, "read configuration");
        Ok(Self {
            root_uri,
            base_dir: base_dir.into(),
            definitions,
        })
    }

    pub fn root_uri(&self) -> &str {
        &self.root_uri
    }

    /// Defined vocabulary names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Apply defaults to the definition of `name` and validate it.
    pub fn resolve(&self, name: &str) -> Result<VocabularyConfig, VocabError> {
        let def = self
            .definitions
            .get(name)
            .ok_or_else(|| VocabError::UndefinedVocabulary(name.to_string()))?;

        let missing: Vec<String> = [
            ("authors", &def.authors),
            ("description", &def.description),
            ("flavour", &def.flavour),
            ("timestamp", &def.timestamp),
            ("title", &def.title),
        ]
        .into_iter()
        .filter(|(_, v)| v.as_deref().map_or(true, |v| v.trim().is_empty()))
        .map(|(k, _)| k.to_string())
        .collect();
        if !missing.is_empty() {
            return Err(VocabError::MissingMetadata {
                name: name.to_string(),
                missing,
            });
        }

        let field = |v: &Option<String>| v.clone().unwrap_or_default();
        let flavour_tag = field(&def.flavour);
        let flavour: Flavour = flavour_tag.parse().map_err(|_| VocabError::UnknownFlavour {
            name: name.to_string(),
            flavour: flavour_tag.clone(),
        })?;

        let path = def.path.clone().unwrap_or_else(|| name.to_string());
        let mut meta = VocabularyMeta::new(
            name,
            field(&def.title),
            field(&def.description),
            field(&def.authors),
            field(&def.timestamp),
        )?
        .with_location(&self.root_uri, path.clone())?
        .with_draft(def.draft);
        if let Some(baseuri) = &def.baseuri {
            meta = meta.with_baseuri(baseuri.clone())?;
        }

        let filename = def
            .filename
            .clone()
            .unwrap_or_else(|| format!("{path}/terms.csv"));

        Ok(VocabularyConfig {
            meta,
            flavour,
            source: self.base_dir.join(filename),
        })
    }
}

/// A validated vocabulary definition, ready to load.
#[derive(Debug, Clone)]
pub struct VocabularyConfig {
    pub meta: VocabularyMeta,
    pub flavour: Flavour,
    pub source: PathBuf,
}

impl VocabularyConfig {
    /// The RDF syntax of the source, or `None` for the record format.
    pub fn source_format(&self) -> Option<RdfFormat> {
        format_for_path(&self.source)
    }

    /// Read the source file and build the vocabulary.
    pub fn load(&self, normalizer: &dyn SkosNormalizer) -> Result<Vocabulary, VocabError> {
        let text = fs::read_to_string(&self.source).map_err(|e| VocabError::UnreadableSource {
            path: self.source.clone(),
            reason: e.to_string(),
        })?;
        let source_name = self.source.display().to_string();
        tracing::debug!(source = %source_name, "reading vocabulary source");
        match self.source_format() {
            Some(format) => Vocabulary::from_rdf(
                self.meta.clone(),
                self.flavour,
                &source_name,
                &text,
                format,
                normalizer,
            ),
            None => Vocabulary::from_records(self.meta.clone(), self.flavour, &source_name, &text),
        }
    }
}

// --- tests -------------------------------------------------------------------
