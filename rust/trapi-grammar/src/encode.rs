//! Query graphs back to English.
//!
//! The graph is read as a [`CurieTriple`], its identifiers are labelled, and
//! the labelled triple is rendered with one of two sentence shapes:
//!
//! ```text
//! What <category> <predicate> <name>?     category is the subject
//! <name> <predicate> what <category>?     name is the subject
//! ```

use std::sync::Arc;

use crate::error::GrammarError;
use crate::graph::QueryGraph;
use crate::triple::{Category, CurieTriple, Direction, Triple};
use crate::vocabulary::Vocabulary;

pub struct Encoder {
    vocabulary: Arc<Vocabulary>,
    default_category: String,
    default_predicate: String,
}

impl Encoder {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Encoder {
            vocabulary,
            default_category: "biolink:NamedThing".into(),
            default_predicate: "biolink:related_to".into(),
        }
    }

    /// Class identifier for a category node that carries none.
    pub fn default_category(mut self, identifier: impl Into<String>) -> Self {
        self.default_category = identifier.into();
        self
    }

    /// Relation identifier for an edge that carries no predicate.
    pub fn default_predicate(mut self, identifier: impl Into<String>) -> Self {
        self.default_predicate = identifier.into();
        self
    }

    pub fn curie_triple(&self, graph: &QueryGraph) -> Result<CurieTriple, GrammarError> {
        graph.to_curie_triple(&self.default_category, &self.default_predicate)
    }

    /// Render a labelled triple, with the relation read as a verb phrase.
    pub fn sentence(&self, labelled: &Triple) -> String {
        let category = self
            .vocabulary
            .inflections()
            .singular_noun(labelled.category().as_str());
        let predicate = self.vocabulary.verb_phrase(labelled.predicate());
        render_sentence(&Triple::new(
            Category::from(category),
            predicate,
            labelled.name().clone(),
            labelled.direction(),
        ))
    }
}

pub fn render_sentence(triple: &Triple) -> String {
    let (category, predicate, name) = (triple.category(), triple.predicate(), triple.name());
    match triple.direction() {
        Direction::CategoryFirst => format!("What {category} {predicate} {name}?"),
        Direction::NameFirst => format!("{name} {predicate} what {category}?"),
    }
}
