//! In-memory service implementations.
//!
//! [`StaticTaxonomy`] is what the grammar runs on by default: a snapshot of
//! the class and relation hierarchy shipped with the crate. The normalizer
//! and search tables are mostly useful for tests and offline tooling.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Deserialize;

use super::{EntitySearch, Normalizer, Taxonomy};
use crate::error::{GrammarError, ServiceKind};

const BUNDLED_TAXONOMY: &str = include_str!("../../data/taxonomy.json");

/// A taxonomy document: every term mapped to its parent, in display order.
#[derive(Debug, Clone, Deserialize)]
struct TaxonomyDocument {
    classes: IndexMap<String, Option<String>>,
    relations: IndexMap<String, Option<String>>,
}

/// A taxonomy held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticTaxonomy {
    children: IndexMap<String, Vec<String>>,
}

impl StaticTaxonomy {
    /// The taxonomy snapshot shipped with this crate.
    pub fn bundled() -> Result<Self, GrammarError> {
        Self::from_json(BUNDLED_TAXONOMY)
    }

    pub fn from_json(json: &str) -> Result<Self, GrammarError> {
        let document: TaxonomyDocument = serde_json::from_str(json)
            .map_err(|e| GrammarError::Config(format!("invalid taxonomy document: {e}")))?;
        let mut taxonomy = StaticTaxonomy::default();
        for (term, parent) in document.classes.into_iter().chain(document.relations) {
            taxonomy.insert(term, parent);
        }
        Ok(taxonomy)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| GrammarError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Add a term below `parent` (or as a root).
    pub fn insert(&mut self, term: impl Into<String>, parent: Option<String>) -> &mut Self {
        let term = term.into();
        self.children.entry(term.clone()).or_default();
        if let Some(parent) = parent {
            self.children.entry(parent).or_default().push(term);
        }
        self
    }

    fn collect_descendants(&self, term: &str, into: &mut Vec<String>) {
        if into.iter().any(|seen| seen == term) {
            return;
        }
        into.push(term.to_string());
        if let Some(children) = self.children.get(term) {
            for child in children {
                self.collect_descendants(child, into);
            }
        }
    }
}

#[async_trait]
impl Taxonomy for StaticTaxonomy {
    async fn descendants(&self, root: &str) -> Result<Vec<String>, GrammarError> {
        if !self.children.contains_key(root) {
            return Err(GrammarError::external(
                ServiceKind::Taxonomy,
                format!("unknown term {root:?}"),
            ));
        }
        let mut descendants = Vec::new();
        self.collect_descendants(root, &mut descendants);
        Ok(descendants)
    }
}

/// Identifier → label lookups from a fixed table.
#[derive(Debug, Clone, Default)]
pub struct StaticNormalizer {
    labels: HashMap<String, String>,
}

impl StaticNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, identifier: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(identifier.into(), label.into());
        self
    }
}

#[async_trait]
impl Normalizer for StaticNormalizer {
    async fn label(&self, identifier: &str) -> Result<String, GrammarError> {
        self.labels
            .get(identifier)
            .cloned()
            .ok_or_else(|| GrammarError::UnrecognizedEntity {
                text: identifier.to_string(),
            })
    }
}

/// Free text → identifier lookups from a fixed table. Text is matched
/// case-insensitively and in full.
#[derive(Debug, Clone, Default)]
pub struct StaticSearch {
    results: HashMap<String, Vec<String>>,
}

impl StaticSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<I, S>(mut self, text: &str, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.results.insert(
            text.to_lowercase(),
            identifiers.into_iter().map(Into::into).collect(),
        );
        self
    }
}

#[async_trait]
impl EntitySearch for StaticSearch {
    async fn search(&self, text: &str, limit: usize) -> Result<Vec<String>, GrammarError> {
        Ok(self
            .results
            .get(&text.to_lowercase())
            .map(|identifiers| identifiers.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}
