//! Reconstructs wider-term assignments from hierarchy levels.
//!
//! Records come in file order, and each record's level is interpreted
//! relative to the record before it: one level deeper makes the previous
//! term the parent, the same level keeps the current parent, and a shallower
//! level closes out ancestors until the stack matches.

use crate::error::VocabError;
use crate::record::TermRecord;
use crate::validation::is_uri;

#[derive(Debug, Default)]
pub struct HierarchyResolver {
    /// `ancestors[d]` is the current ancestor at level `d + 1`.
    ancestors: Vec<String>,
    last_term: Option<String>,
    last_depth: usize,
}

impl HierarchyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the parent reference for `record`, in fragment form (`#id`) for
    /// local terms.
    ///
    /// A level more than one deeper than the previous record's is rejected;
    /// the first record must be at level 1.
    pub fn resolve(
        &mut self,
        source_name: &str,
        record: &TermRecord,
    ) -> Result<Option<String>, VocabError> {
        let depth = record.depth;
        if depth > self.last_depth + 1 {
            return Err(VocabError::DepthJump {
                source_name: source_name.to_string(),
                index: record.index,
                line: record.line,
                previous: self.last_depth,
                depth,
            });
        }

        if depth - 1 > self.ancestors.len() {
            if let Some(last) = self.last_term.take() {
                self.ancestors.push(last);
            }
        }
        while depth - 1 < self.ancestors.len() {
            self.ancestors.pop();
        }

        let parent = self.ancestors.last().cloned();

        self.last_term = Some(if is_uri(&record.identifier) {
            record.identifier.clone()
        } else {
            format!("#{}", record.identifier)
        });
        self.last_depth = depth;

        Ok(parent)
    }

    /// Number of open ancestors.
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }
}

// --- tests -------------------------------------------------------------------
