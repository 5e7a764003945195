//! Natural-language terms to identifiers, and back.
//!
//! Categories and predicates are taxonomy terms and format locally
//! (`chemical substance` → `biolink:ChemicalSubstance`). Entity names go to
//! the search service and take its top-ranked candidate. In the other
//! direction, class and relation identifiers are split back into phrases
//! and entity identifiers are labelled by the normalization service.

use std::sync::Arc;

use crate::error::GrammarError;
use crate::service::{
    EntitySearch, Normalizer, Taxonomy, TermKind, class_phrase, relation_phrase,
};
use crate::triple::{Category, CurieTriple, Name, Triple};

#[derive(Clone)]
pub struct IdentifierResolver {
    taxonomy: Arc<dyn Taxonomy>,
    search: Arc<dyn EntitySearch>,
    normalizer: Arc<dyn Normalizer>,
    search_limit: usize,
}

impl IdentifierResolver {
    pub fn new(
        taxonomy: Arc<dyn Taxonomy>,
        search: Arc<dyn EntitySearch>,
        normalizer: Arc<dyn Normalizer>,
    ) -> Self {
        IdentifierResolver {
            taxonomy,
            search,
            normalizer,
            search_limit: 10,
        }
    }

    pub fn search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    pub fn category_identifier(&self, category: &Category) -> Result<Category, GrammarError> {
        self.taxonomy
            .format_identifier(category.as_str(), TermKind::Class)
            .map(Category)
    }

    pub fn predicate_identifier(&self, predicate: &str) -> Result<String, GrammarError> {
        self.taxonomy.format_identifier(predicate, TermKind::Relation)
    }

    /// The top-ranked identifier for an entity name.
    pub async fn name_identifier(&self, name: &Name) -> Result<Name, GrammarError> {
        let candidates = self.search.search(name.as_str(), self.search_limit).await?;
        tracing::debug!(
            name = name.as_str(),
            candidates = candidates.len(),
            "searched for entity"
        );
        candidates
            .into_iter()
            .next()
            .map(Name)
            .ok_or_else(|| GrammarError::UnrecognizedEntity {
                text: name.to_string(),
            })
    }

    pub async fn resolve(&self, triple: &Triple) -> Result<CurieTriple, GrammarError> {
        let category = self.category_identifier(triple.category())?;
        let predicate = self.predicate_identifier(triple.predicate())?;
        let name = self.name_identifier(triple.name()).await?;
        Ok(CurieTriple::new(
            category,
            predicate,
            name,
            triple.direction(),
        ))
    }

    /// The preferred label of an entity identifier.
    pub async fn name_label(&self, identifier: &Name) -> Result<Name, GrammarError> {
        let label = self.normalizer.label(identifier.as_str()).await?;
        tracing::debug!(
            identifier = identifier.as_str(),
            label = label.as_str(),
            "labelled entity"
        );
        Ok(Name(label))
    }

    /// Replace every identifier in a triple with a readable phrase.
    ///
    /// The triple comes from a caller's graph, so a category or predicate
    /// that is not an identifier is a [`GrammarError::Validation`].
    pub async fn label(&self, triple: &CurieTriple) -> Result<Triple, GrammarError> {
        let category = class_phrase(triple.category().as_str()).map_err(invalid_graph)?;
        let predicate = relation_phrase(triple.predicate()).map_err(invalid_graph)?;
        let name = self.name_label(triple.name()).await?;
        Ok(Triple::new(
            Category(category),
            predicate,
            name,
            triple.direction(),
        ))
    }
}

fn invalid_graph(error: GrammarError) -> GrammarError {
    match error {
        GrammarError::Identifier(message) => GrammarError::Validation(message),
        other => other,
    }
}
