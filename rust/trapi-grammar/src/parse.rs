//! Questions to triples.
//!
//! Parsing runs in three steps:
//!
//! 1. the question is normalized into words ([`crate::token`]);
//! 2. the words are matched against the question templates
//!    ([`crate::template`]), first match wins;
//! 3. the captured category and predicate are mapped back to their
//!    canonical forms through the vocabulary: plurals to singulars, informal
//!    category terms to taxonomy classes, verb phrases to relations.
//!
//! The captured entity text is kept verbatim. It becomes a [`Name`] that
//! still has to be resolved to an identifier.

use std::sync::Arc;

use crate::error::GrammarError;
use crate::template::{CompiledTemplates, Role, Template};
use crate::token::tokenize;
use crate::triple::{Category, Name, Triple};
use crate::vocabulary::Vocabulary;

pub struct QuestionParser {
    vocabulary: Arc<Vocabulary>,
    templates: CompiledTemplates,
    default_category: String,
    default_predicate: String,
}

impl QuestionParser {
    /// A parser over the standard question templates.
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self::with_templates(vocabulary, &Template::questions())
    }

    pub fn with_templates(vocabulary: Arc<Vocabulary>, templates: &[Template]) -> Self {
        let templates = CompiledTemplates::compile(templates, &vocabulary);
        QuestionParser {
            vocabulary,
            templates,
            default_category: "named thing".into(),
            default_predicate: "related to".into(),
        }
    }

    /// Category used when a question names none.
    pub fn default_category(mut self, category: impl Into<String>) -> Self {
        self.default_category = category.into();
        self
    }

    /// Relation used when a template captures no predicate.
    pub fn default_predicate(mut self, predicate: impl Into<String>) -> Self {
        self.default_predicate = predicate.into();
        self
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn parse(&self, question: &str) -> Result<Triple, GrammarError> {
        let words = tokenize(question);
        let parse_error = || GrammarError::Parse {
            question: words.join(" "),
        };

        let found = self.templates.find(&words).ok_or_else(parse_error)?;
        tracing::debug!(
            question = %words.join(" "),
            template = found.template,
            "matched question template"
        );

        let predicate = found
            .get(Role::Predicate)
            .map(|phrase| self.vocabulary.canonical_predicate(&phrase))
            .unwrap_or_else(|| self.default_predicate.clone());
        let category = |role: Role| {
            let phrase = found
                .get(role)
                .unwrap_or_else(|| self.default_category.clone());
            Category(self.vocabulary.canonical_category(&phrase))
        };

        if let Some(object) = found.get(Role::ObjectName) {
            Ok(Triple::category_first(
                category(Role::SubjectCategory),
                predicate,
                Name(object),
            ))
        } else if let Some(subject) = found.get(Role::SubjectName) {
            Ok(Triple::name_first(
                Name(subject),
                predicate,
                category(Role::ObjectCategory),
            ))
        } else {
            // A template without a name slot cannot produce a triple.
            Err(parse_error())
        }
    }
}
