//! Core data types of the term graph.
//!
//! This module defines [`Predicate`] (the closed predicate vocabulary),
//! [`Flavour`] with its static [`FlavourSpec`] table, [`Relation`],
//! [`ObjectRef`] (the shared URI-shape classification), and [`Term`].

use std::collections::HashSet;

use crate::error::VocabError;
use crate::validation::{is_uri, validate_identifier};

/// The closed set of predicates a term may carry.
///
/// Anything outside this set is rejected when a relation is added, so a
/// [`Term`] can never hold an unknown predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Predicate {
    /// Flag: the term may still change or disappear.
    Preliminary,
    /// Flag: the term should no longer be used.
    Deprecated,
    /// Points to the term that replaces this one.
    UseInstead,
    SubClassOf,
    SubPropertyOf,
    Broader,
    ExactMatch,
    Related,
}

impl Predicate {
    pub const ALL: [Predicate; 8] = [
        Predicate::Preliminary,
        Predicate::Deprecated,
        Predicate::UseInstead,
        Predicate::SubClassOf,
        Predicate::SubPropertyOf,
        Predicate::Broader,
        Predicate::ExactMatch,
        Predicate::Related,
    ];

    /// The prefixed name used in sources and in Turtle output.
    pub fn as_curie(&self) -> &'static str {
        match self {
            Predicate::Preliminary => "ivoasem:preliminary",
            Predicate::Deprecated => "ivoasem:deprecated",
            Predicate::UseInstead => "ivoasem:useInstead",
            Predicate::SubClassOf => "rdfs:subClassOf",
            Predicate::SubPropertyOf => "rdfs:subPropertyOf",
            Predicate::Broader => "skos:broader",
            Predicate::ExactMatch => "skos:exactMatch",
            Predicate::Related => "skos:related",
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_curie())
    }
}

/// Parses a [`Predicate`] from its prefixed name (e.g. `"skos:broader"`).
impl std::str::FromStr for Predicate {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Predicate::ALL
            .into_iter()
            .find(|p| p.as_curie() == s)
            .ok_or_else(|| format!("unknown predicate {:?}", s))
    }
}

/// The kind of vocabulary, selecting the predicates that govern it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavour {
    RdfClass,
    RdfProperty,
    Skos,
}

/// The four ontology constants of a flavour plus its closure behaviour.
#[derive(Debug, PartialEq, Eq)]
pub struct FlavourSpec {
    /// Tag as written in configuration and in `ivoasem:vocflavour`.
    pub name: &'static str,
    pub term_class: &'static str,
    pub wider_predicate: Predicate,
    pub label_property: &'static str,
    pub description_property: &'static str,
    /// Whether the narrower lookup is closed transitively. Only forest-shaped
    /// flavours are; SKOS allows several parents per term.
    pub transitive_narrower: bool,
}

static RDF_CLASS: FlavourSpec = FlavourSpec {
    name: "RDF Class",
    term_class: "rdfs:Class",
    wider_predicate: Predicate::SubClassOf,
    label_property: "rdfs:label",
    description_property: "rdfs:comment",
    transitive_narrower: true,
};

static RDF_PROPERTY: FlavourSpec = FlavourSpec {
    name: "RDF Property",
    term_class: "rdf:Property",
    wider_predicate: Predicate::SubPropertyOf,
    label_property: "rdfs:label",
    description_property: "rdfs:comment",
    transitive_narrower: true,
};

static SKOS: FlavourSpec = FlavourSpec {
    name: "SKOS",
    term_class: "skos:Concept",
    wider_predicate: Predicate::Broader,
    label_property: "skos:prefLabel",
    description_property: "skos:definition",
    transitive_narrower: false,
};

impl Flavour {
    pub const ALL: [Flavour; 3] = [Flavour::RdfClass, Flavour::RdfProperty, Flavour::Skos];

    pub fn spec(&self) -> &'static FlavourSpec {
        match self {
            Flavour::RdfClass => &RDF_CLASS,
            Flavour::RdfProperty => &RDF_PROPERTY,
            Flavour::Skos => &SKOS,
        }
    }

    /// `true` when a term may have several wider terms.
    pub fn allows_multiple_parents(&self) -> bool {
        self.spec().wider_predicate == Predicate::Broader
    }
}

impl std::fmt::Display for Flavour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.spec().name)
    }
}

/// Parses a [`Flavour`] from its configuration tag (e.g. `"RDF Class"`).
impl std::str::FromStr for Flavour {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Flavour::ALL
            .into_iter()
            .find(|f| f.spec().name == s)
            .ok_or_else(|| {
                format!(
                    "unknown flavour {:?}; expected one of: RDF Class, RDF Property, SKOS",
                    s
                )
            })
    }
}

/// One `(predicate, object)` pair. A `None` object is a blank node, used for
/// flag-like predicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Relation {
    pub predicate: Predicate,
    pub object: Option<String>,
}

/// How a relation object is to be linked.
///
/// Every renderer goes through [`ObjectRef::classify`] so that cross-links
/// come out the same in all output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectRef<'a> {
    /// `#fragment`: a term of the same vocabulary (fragment without `#`).
    Anchor(&'a str),
    /// `scheme://...`: a term somewhere else.
    External(&'a str),
    /// Anything else (prefixed names, plain text).
    Plain(&'a str),
}

impl<'a> ObjectRef<'a> {
    pub fn classify(object: &'a str) -> Self {
        if let Some(fragment) = object.strip_prefix('#') {
            ObjectRef::Anchor(fragment)
        } else if is_uri(object) {
            ObjectRef::External(object)
        } else {
            ObjectRef::Plain(object)
        }
    }

    /// The text shown to readers: the bare fragment for local terms, the
    /// object itself otherwise.
    pub fn display_text(&self) -> &'a str {
        match self {
            ObjectRef::Anchor(s) | ObjectRef::External(s) | ObjectRef::Plain(s) => s,
        }
    }
}

/// A named concept of a vocabulary.
///
/// A term does not know which vocabulary owns it; anything needing the
/// flavour or the other terms is handed the [`Vocabulary`](crate::Vocabulary)
/// explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    identifier: String,
    label: String,
    description: String,
    relations: HashSet<Relation>,
}

impl Term {
    /// Create a term with no relations. Fails if `identifier` contains
    /// anything but letters, digits, `_` and `-`.
    pub fn new(
        identifier: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, VocabError> {
        let identifier = identifier.into();
        validate_identifier(&identifier)?;
        Ok(Self {
            identifier,
            label: label.into(),
            description: description.into(),
            relations: HashSet::new(),
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Add `(predicate, object)` after checking the predicate against the
    /// known set. This is the only way relations get onto a term.
    pub(crate) fn add_relation(
        &mut self,
        predicate: &str,
        object: Option<String>,
    ) -> Result<(), VocabError> {
        let predicate = predicate
            .parse::<Predicate>()
            .map_err(|_| VocabError::UnknownPredicate {
                term: self.identifier.clone(),
                predicate: predicate.to_string(),
                object: object.clone(),
            })?;
        self.relations.insert(Relation { predicate, object });
        Ok(())
    }

    /// Relations in unspecified order.
    pub fn relations(&self) -> impl Iterator<Item = &Relation> {
        self.relations.iter()
    }

    /// Relations ordered by predicate, then object.
    pub fn sorted_relations(&self) -> Vec<&Relation> {
        let mut rels: Vec<&Relation> = self.relations.iter().collect();
        rels.sort();
        rels
    }

    /// All non-blank objects of `predicate`, sorted.
    pub fn objects_for(&self, predicate: Predicate) -> Vec<&str> {
        let mut objs: Vec<&str> = self
            .relations
            .iter()
            .filter(|r| r.predicate == predicate)
            .filter_map(|r| r.object.as_deref())
            .collect();
        objs.sort_unstable();
        objs
    }

    /// Whether `(predicate, blank)` is present.
    pub fn has_flag(&self, predicate: Predicate) -> bool {
        self.relations.contains(&Relation {
            predicate,
            object: None,
        })
    }

    pub fn has_predicate(&self, predicate: Predicate) -> bool {
        self.relations.iter().any(|r| r.predicate == predicate)
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicate_roundtrip() {
        for p in Predicate::ALL {
            assert_eq!(p.as_curie().parse::<Predicate>(), Ok(p));
        }
        assert!("skos:narrower".parse::<Predicate>().is_err());
    }

    #[test]
    fn flavour_table() {
        let spec = Flavour::RdfProperty.spec();
        assert_eq!(spec.term_class, "rdf:Property");
        assert_eq!(spec.wider_predicate, Predicate::SubPropertyOf);
        assert!(spec.transitive_narrower);
        assert!(!Flavour::Skos.spec().transitive_narrower);
        assert!(Flavour::Skos.allows_multiple_parents());
        assert!(!Flavour::RdfClass.allows_multiple_parents());
        assert_eq!("SKOS".parse::<Flavour>(), Ok(Flavour::Skos));
        assert_eq!(Flavour::RdfClass.to_string(), "RDF Class");
        assert!("OWL".parse::<Flavour>().is_err());
    }

    #[test]
    fn classify_objects() {
        assert_eq!(ObjectRef::classify("#foo"), ObjectRef::Anchor("foo"));
        assert_eq!(
            ObjectRef::classify("https://example.org/x"),
            ObjectRef::External("https://example.org/x")
        );
        assert_eq!(ObjectRef::classify("rdfs:Class"), ObjectRef::Plain("rdfs:Class"));
    }

    #[test]
    fn relations_are_a_set() {
        let mut t = Term::new("a", "A", "").unwrap();
        t.add_relation("ivoasem:deprecated", None).unwrap();
        t.add_relation("ivoasem:deprecated", None).unwrap();
        t.add_relation("skos:exactMatch", Some("#b".into())).unwrap();
        assert_eq!(t.relations().count(), 2);
        assert!(t.has_flag(Predicate::Deprecated));
        assert!(!t.has_flag(Predicate::ExactMatch));
        assert_eq!(t.objects_for(Predicate::ExactMatch), vec!["#b"]);
    }

    #[test]
    fn unknown_predicate_rejected() {
        let mut t = Term::new("a", "A", "").unwrap();
        let err = t.add_relation("owl:sameAs", Some("#b".into())).unwrap_err();
        assert!(matches!(err, VocabError::UnknownPredicate { .. }));
        assert_eq!(t.relations().count(), 0);
    }

    #[test]
    fn identifier_checked_on_construction() {
        assert!(Term::new("good_term-1", "", "").is_ok());
        assert!(matches!(
            Term::new("bad term", "", ""),
            Err(VocabError::MalformedIdentifier(_))
        ));
        assert!(Term::new("", "", "").is_err());
    }

    #[test]
    fn objects_sorted() {
        let mut t = Term::new("a", "A", "").unwrap();
        t.add_relation("skos:broader", Some("#z".into())).unwrap();
        t.add_relation("skos:broader", Some("#m".into())).unwrap();
        t.add_relation("skos:broader", Some("#b".into())).unwrap();
        assert_eq!(t.objects_for(Predicate::Broader), vec!["#b", "#m", "#z"]);
    }
}
