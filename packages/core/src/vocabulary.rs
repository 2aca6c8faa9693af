//! The term graph: vocabulary metadata, terms, and the narrower lookup.
//!
//! A [`Vocabulary`] is built in one go, either from the record format
//! ([`Vocabulary::from_records`]) or from triples
//! ([`Vocabulary::from_triples`](crate::skos)), and is read-only afterwards.
//! Both paths funnel every term through [`TermGraphBuilder::add_term`], so a
//! term looks the same whatever its source.

use std::collections::HashMap;

use crate::closure::{invert_wider, NarrowerMap};
use crate::error::VocabError;
use crate::hierarchy::HierarchyResolver;
use crate::record::parse_records;
use crate::relations::apply_annotation;
use crate::types::{Flavour, FlavourSpec, Predicate, Term};
use crate::validation::{localize, validate_baseuri, validate_output_path, validate_timestamp};

/// The default root under which vocabulary URIs are formed.
pub const DEFAULT_ROOT_URI: &str = "http://www.ivoa.net/rdf/";

/// Descriptive metadata of a vocabulary.
///
/// Construction fails if any descriptive field is empty, the timestamp is
/// not an ISO date, the base URI is not absolute, or the path would leave
/// the output tree.
#[derive(Debug, Clone, PartialEq)]
pub struct VocabularyMeta {
    name: String,
    title: String,
    description: String,
    authors: String,
    timestamp: String,
    draft: bool,
    path: String,
    baseuri: String,
}

impl VocabularyMeta {
    /// Create metadata with `path = name` and `baseuri` under
    /// [`DEFAULT_ROOT_URI`].
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        authors: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Result<Self, VocabError> {
        let meta = Self {
            name: name.into(),
            title: title.into(),
            description: description.into(),
            authors: authors.into(),
            timestamp: timestamp.into(),
            draft: false,
            path: String::new(),
            baseuri: String::new(),
        };
        let path = meta.name.clone();
        meta.with_location(DEFAULT_ROOT_URI, path)
    }

    /// Move the vocabulary to `root_uri` + `path`.
    pub fn with_location(
        mut self,
        root_uri: &str,
        path: impl Into<String>,
    ) -> Result<Self, VocabError> {
        self.path = path.into();
        let root = root_uri.trim_end_matches('/');
        self.baseuri = format!("{root}/{}", self.path);
        self.check()?;
        Ok(self)
    }

    /// Override the vocabulary URI while keeping the output path.
    pub fn with_baseuri(mut self, baseuri: impl Into<String>) -> Result<Self, VocabError> {
        self.baseuri = baseuri.into();
        self.check()?;
        Ok(self)
    }

    pub fn with_draft(mut self, draft: bool) -> Self {
        self.draft = draft;
        self
    }

    fn check(&self) -> Result<(), VocabError> {
        let missing: Vec<String> = [
            ("authors", &self.authors),
            ("description", &self.description),
            ("name", &self.name),
            ("timestamp", &self.timestamp),
            ("title", &self.title),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k.to_string())
        .collect();
        if !missing.is_empty() {
            return Err(VocabError::MissingMetadata {
                name: if self.name.is_empty() {
                    "<unnamed>".into()
                } else {
                    self.name.clone()
                },
                missing,
            });
        }
        validate_timestamp(&self.name, &self.timestamp)?;
        validate_output_path(&self.name, &self.path)?;
        if self.name.contains(['/', '\\']) {
            return Err(VocabError::UnsafePath {
                name: self.name.clone(),
                path: self.name.clone(),
            });
        }
        validate_baseuri(&self.name, &self.baseuri)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Semicolon-separated author names.
    pub fn authors(&self) -> &str {
        &self.authors
    }

    /// ISO date of this version.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Every term is preliminary.
    pub fn draft(&self) -> bool {
        self.draft
    }

    /// Path segments below the root URI and below the output directory.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Vocabulary URI; term URIs are `baseuri#identifier`.
    pub fn baseuri(&self) -> &str {
        &self.baseuri
    }

    /// Author names, trimmed.
    pub fn author_list(&self) -> Vec<&str> {
        self.authors
            .split(';')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .collect()
    }
}

/// Accumulates terms for one vocabulary.
#[derive(Debug)]
pub struct TermGraphBuilder {
    flavour: Flavour,
    draft: bool,
    terms: HashMap<String, Term>,
}

impl TermGraphBuilder {
    pub fn new(flavour: Flavour, draft: bool) -> Self {
        Self {
            flavour,
            draft,
            terms: HashMap::new(),
        }
    }

    /// Create one term.
    ///
    /// Relations are added in a fixed order: the draft flag, then one wider
    /// relation per parent, then the annotation relations. Parents that are
    /// bare identifiers are turned into fragment references.
    pub fn add_term(
        &mut self,
        identifier: &str,
        label: &str,
        description: &str,
        parents: &[String],
        annotation: Option<&str>,
    ) -> Result<&Term, VocabError> {
        let mut term = Term::new(identifier, label, description)?;

        if self.draft {
            term.add_relation(Predicate::Preliminary.as_curie(), None)?;
        }

        if parents.len() > 1 && !self.flavour.allows_multiple_parents() {
            return Err(VocabError::MultipleParents {
                term: identifier.to_string(),
                count: parents.len(),
                flavour: self.flavour.to_string(),
            });
        }
        let wider = self.flavour.spec().wider_predicate.as_curie();
        for parent in parents {
            term.add_relation(wider, Some(localize(parent)))?;
        }

        if let Some(annotation) = annotation {
            apply_annotation(&mut term, annotation)?;
        }

        if self.terms.contains_key(identifier) {
            return Err(VocabError::DuplicateTerm(identifier.to_string()));
        }
        tracing::debug!(term = identifier, relations = term.relations().count(), "parsed term");
        Ok(self.terms.entry(identifier.to_string()).or_insert(term))
    }

    /// Close the graph and attach metadata.
    pub fn finish(self, meta: VocabularyMeta) -> Result<Vocabulary, VocabError> {
        let narrower = invert_wider(&self.terms, self.flavour)?;
        Ok(Vocabulary {
            meta,
            flavour: self.flavour,
            terms: self.terms,
            narrower,
        })
    }
}

/// A fully loaded and closed vocabulary.
#[derive(Debug)]
pub struct Vocabulary {
    meta: VocabularyMeta,
    flavour: Flavour,
    terms: HashMap<String, Term>,
    narrower: NarrowerMap,
}

impl Vocabulary {
    /// Build a vocabulary from the text of a record source.
    ///
    /// `source_name` is used in error messages only.
    pub fn from_records(
        meta: VocabularyMeta,
        flavour: Flavour,
        source_name: &str,
        text: &str,
    ) -> Result<Self, VocabError> {
        let mut builder = TermGraphBuilder::new(flavour, meta.draft());
        let mut resolver = HierarchyResolver::new();

        for record in parse_records(source_name, text)? {
            let parent = resolver.resolve(source_name, &record)?;
            let parents: Vec<String> = parent.into_iter().collect();
            builder.add_term(
                &record.identifier,
                record.label.as_deref().unwrap_or_default(),
                record.description.as_deref().unwrap_or_default(),
                &parents,
                record.relations.as_deref(),
            )?;
        }

        let vocab = builder.finish(meta)?;
        tracing::info!(
            vocabulary = %vocab.meta.name(),
            flavour = %flavour,
            terms = vocab.len(),
            "loaded vocabulary"
        );
        Ok(vocab)
    }

    pub fn meta(&self) -> &VocabularyMeta {
        &self.meta
    }

    pub fn flavour(&self) -> Flavour {
        self.flavour
    }

    pub fn spec(&self) -> &'static FlavourSpec {
        self.flavour.spec()
    }

    pub fn get(&self, identifier: &str) -> Option<&Term> {
        self.terms.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.terms.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// All terms ordered by identifier.
    pub fn sorted_terms(&self) -> Vec<&Term> {
        let mut terms: Vec<&Term> = self.terms.values().collect();
        terms.sort_by(|a, b| a.identifier().cmp(b.identifier()));
        terms
    }

    /// The wider objects of `term` under this vocabulary's flavour, sorted.
    pub fn wider<'a>(&self, term: &'a Term) -> Vec<&'a str> {
        term.objects_for(self.spec().wider_predicate)
    }

    /// Narrower terms of `identifier`: transitive for tree flavours, direct
    /// for SKOS. Empty for unknown identifiers.
    pub fn narrower(&self, identifier: &str) -> &[String] {
        self.narrower
            .get(identifier)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> VocabularyMeta {
        VocabularyMeta::new("demo", "Demo", "A demo vocabulary.", "A. Author; B. Author", "2024-05-01")
            .unwrap()
    }

    #[test]
    fn meta_defaults() {
        let m = meta();
        assert_eq!(m.path(), "demo");
        assert_eq!(m.baseuri(), "http://www.ivoa.net/rdf/demo");
        assert_eq!(m.author_list(), vec!["A. Author", "B. Author"]);
        let moved = m.with_location("http://localhost/voc/", "legacy/demo").unwrap();
        assert_eq!(moved.baseuri(), "http://localhost/voc/legacy/demo");
    }

    #[test]
    fn baseuri_override_is_checked() {
        let m = meta().with_baseuri("https://example.org/demo").unwrap();
        assert_eq!(m.baseuri(), "https://example.org/demo");
        assert_eq!(m.path(), "demo");
        for bad in ["", "demo", "#demo", "http://example.org/demo#"] {
            assert!(
                matches!(meta().with_baseuri(bad), Err(VocabError::InvalidBaseUri { .. })),
                "{bad:?} accepted"
            );
        }
    }

    #[test]
    fn paths_stay_below_output_tree() {
        for bad in ["/etc", "../up", "a/../../b", ""] {
            assert!(
                matches!(
                    meta().with_location("http://localhost/voc", bad),
                    Err(VocabError::UnsafePath { .. })
                ),
                "{bad:?} accepted"
            );
        }
        assert!(meta().with_location("http://localhost/voc", "a/b/c").is_ok());
        assert!(matches!(
            VocabularyMeta::new("../demo", "t", "d", "a", "2024-05-01"),
            Err(VocabError::UnsafePath { .. })
        ));
    }

    #[test]
    fn meta_requires_every_field() {
        let err = VocabularyMeta::new("demo", "", "d", "", "2024-05-01").unwrap_err();
        match err {
            VocabError::MissingMetadata { name, missing } => {
                assert_eq!(name, "demo");
                assert_eq!(missing, vec!["authors", "title"]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            VocabularyMeta::new("demo", "t", "d", "a", "May 2024"),
            Err(VocabError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn two_record_roundtrip() {
        let v = Vocabulary::from_records(
            meta(),
            Flavour::RdfClass,
            "terms.csv",
            "A;1;Label A;Desc A;\nB;2;Label B;Desc B;skos:exactMatch(https://example.org/x)\n",
        )
        .unwrap();
        assert_eq!(v.len(), 2);
        let b = v.get("B").unwrap();
        assert_eq!(v.wider(b), vec!["#A"]);
        assert_eq!(v.narrower("A"), ["B".to_string()]);
        assert_eq!(b.objects_for(Predicate::ExactMatch), vec!["https://example.org/x"]);
        assert_eq!(b.label(), "Label B");
    }

    #[test]
    fn draft_marks_every_term() {
        let v = Vocabulary::from_records(
            meta().with_draft(true),
            Flavour::RdfProperty,
            "terms.csv",
            "a;1;A;x\nb;2;B;y;ivoasem:deprecated\n",
        )
        .unwrap();
        for t in v.sorted_terms() {
            assert!(t.has_flag(Predicate::Preliminary), "{} not preliminary", t.identifier());
        }
        let b = v.get("b").unwrap();
        assert!(b.has_flag(Predicate::Deprecated));
    }

    #[test]
    fn final_root_has_no_parent() {
        let v = Vocabulary::from_records(
            meta(),
            Flavour::RdfClass,
            "terms.csv",
            "a;1;A;\nb;2;B;\nc;3;C;\nd;2;D;\ne;1;E;\n",
        )
        .unwrap();
        assert!(v.wider(v.get("e").unwrap()).is_empty());
        assert_eq!(v.wider(v.get("d").unwrap()), vec!["#a"]);
        assert_eq!(v.narrower("a"), ["b", "c", "d"].map(String::from));
    }

    #[test]
    fn duplicate_identifier_rejected() {
        let err = Vocabulary::from_records(meta(), Flavour::RdfClass, "t.csv", "a;1;A;\na;1;A;\n")
            .unwrap_err();
        assert!(matches!(err, VocabError::DuplicateTerm(ref id) if id == "a"));
    }

    #[test]
    fn malformed_identifier_rejected() {
        assert!(matches!(
            Vocabulary::from_records(meta(), Flavour::RdfClass, "t.csv", "a b;1;A;\n"),
            Err(VocabError::MalformedIdentifier(_))
        ));
    }

    #[test]
    fn unknown_predicate_in_annotation_rejected() {
        assert!(matches!(
            Vocabulary::from_records(meta(), Flavour::RdfClass, "t.csv", "a;1;A;D;dc:source(x)\n"),
            Err(VocabError::UnknownPredicate { .. })
        ));
    }

    #[test]
    fn multiple_parents_only_for_skos() {
        let mut b = TermGraphBuilder::new(Flavour::RdfClass, false);
        let parents = vec!["x".to_string(), "y".to_string()];
        assert!(matches!(
            b.add_term("t", "T", "", &parents, None),
            Err(VocabError::MultipleParents { count: 2, .. })
        ));

        let mut b = TermGraphBuilder::new(Flavour::Skos, false);
        let t = b.add_term("t", "T", "", &parents, None).unwrap();
        assert_eq!(t.objects_for(Predicate::Broader), vec!["#x", "#y"]);
    }

    #[test]
    fn construction_order_keeps_both_flags() {
        let mut b = TermGraphBuilder::new(Flavour::Skos, true);
        let t = b
            .add_term("t", "T", "", &[], Some("ivoasem:deprecated ivoasem:preliminary"))
            .unwrap();
        assert!(t.has_flag(Predicate::Preliminary));
        assert!(t.has_flag(Predicate::Deprecated));
        assert_eq!(t.relations().count(), 2);
    }
}
