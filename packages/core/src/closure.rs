//! The narrower lookup: for each term, the terms naming it as wider.
//!
//! Tree-shaped flavours get the full transitive descendant set, computed
//! post-order so that a child's list is complete before its parent absorbs
//! it. Graph-shaped flavours (SKOS) only record direct children, since
//! `skos:narrower` is not transitive.

use std::collections::HashMap;

use crate::error::VocabError;
use crate::types::{Flavour, ObjectRef, Term};

/// Term identifier to sorted narrower identifiers. Every term has an entry.
pub type NarrowerMap = HashMap<String, Vec<String>>;

/// Compute the narrower lookup for `terms`.
///
/// Wider objects pointing outside the vocabulary are not part of the map.
/// A cycle in the wider relation of a tree flavour is a
/// [`VocabError::CyclicHierarchy`].
pub fn invert_wider(
    terms: &HashMap<String, Term>,
    flavour: Flavour,
) -> Result<NarrowerMap, VocabError> {
    let spec = flavour.spec();
    let direct = direct_children(terms, flavour);

    let mut result = if spec.transitive_narrower {
        transitive_closure(&direct)?
    } else {
        direct
    };

    for id in terms.keys() {
        result.entry(id.clone()).or_default();
    }
    for children in result.values_mut() {
        children.sort();
        children.dedup();
    }

    tracing::debug!(
        flavour = %flavour,
        terms = terms.len(),
        edges = result.values().map(Vec::len).sum::<usize>(),
        "computed narrower lookup"
    );
    Ok(result)
}

/// One scan over all wider relations.
fn direct_children(terms: &HashMap<String, Term>, flavour: Flavour) -> NarrowerMap {
    let wider = flavour.spec().wider_predicate;
    let mut direct: NarrowerMap = HashMap::new();

    let mut ids: Vec<&String> = terms.keys().collect();
    ids.sort();
    for id in ids {
        for object in terms[id].objects_for(wider) {
            match ObjectRef::classify(object) {
                ObjectRef::Anchor(parent) if terms.contains_key(parent) => {
                    direct.entry(parent.to_string()).or_default().push(id.clone());
                }
                ObjectRef::Anchor(parent) => {
                    tracing::warn!(term = %id, parent, "wider term is not defined in this vocabulary");
                }
                ObjectRef::External(_) | ObjectRef::Plain(_) => {}
            }
        }
    }
    direct
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Open,
    Closed,
}

/// Expand `direct` into full descendant lists with an explicit stack.
fn transitive_closure(direct: &NarrowerMap) -> Result<NarrowerMap, VocabError> {
    let mut closed: NarrowerMap = HashMap::new();
    let mut visits: HashMap<&str, Visit> = HashMap::new();

    let mut roots: Vec<&String> = direct.keys().collect();
    roots.sort();

    for root in roots {
        if visits.contains_key(root.as_str()) {
            continue;
        }
        visits.insert(root.as_str(), Visit::Open);
        // (term, index of the next child to look at)
        let mut stack: Vec<(&str, usize)> = vec![(root.as_str(), 0)];

        while let Some(&(node, next)) = stack.last() {
            let children = direct.get(node).map(Vec::as_slice).unwrap_or(&[]);

            if let Some(child) = children.get(next) {
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }
                match visits.get(child.as_str()) {
                    Some(Visit::Open) => return Err(VocabError::CyclicHierarchy(child.clone())),
                    Some(Visit::Closed) => {}
                    None => {
                        visits.insert(child.as_str(), Visit::Open);
                        stack.push((child.as_str(), 0));
                    }
                }
                continue;
            }

            // every child is closed: absorb their lists
            let mut descendants = Vec::new();
            for child in children {
                descendants.push(child.clone());
                if let Some(below) = closed.get(child) {
                    descendants.extend(below.iter().cloned());
                }
            }
            descendants.sort();
            descendants.dedup();
            closed.insert(node.to_string(), descendants);
            visits.insert(node, Visit::Closed);
            stack.pop();
        }
    }

    Ok(closed)
}

// --- tests -------------------------------------------------------------------
