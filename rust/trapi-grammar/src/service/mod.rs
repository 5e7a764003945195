//! Contracts for the external collaborators the grammar depends on.
//!
//! - [`Taxonomy`] enumerates the category and relation hierarchy and formats
//!   phrases as identifiers. It is consulted once, at startup.
//! - [`EntitySearch`] maps free text to ranked entity identifiers.
//! - [`Normalizer`] maps an entity identifier back to its preferred label.
//!
//! Each contract has an in-memory implementation in [`memory`] and an HTTP
//! implementation in [`remote`]. No implementation retries: a failed call
//! surfaces as [`GrammarError::ExternalService`].

use async_trait::async_trait;

use crate::error::GrammarError;

pub mod memory;
pub mod remote;

pub use memory::{StaticNormalizer, StaticSearch, StaticTaxonomy};
pub use remote::{RemoteNormalizer, RemoteSearch, RemoteTaxonomy};

/// Namespace prefix of every class and relation identifier.
pub const BIOLINK_PREFIX: &str = "biolink";

/// Whether a taxonomy term names a class or a relation. The two are
/// formatted differently as identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    Class,
    Relation,
}

#[async_trait]
pub trait Taxonomy: Send + Sync {
    /// The named term and every term below it, in taxonomy order.
    async fn descendants(&self, root: &str) -> Result<Vec<String>, GrammarError>;

    /// Format a term phrase as its canonical identifier.
    fn format_identifier(&self, phrase: &str, kind: TermKind) -> Result<String, GrammarError> {
        format_identifier(phrase, kind)
    }
}

#[async_trait]
pub trait Normalizer: Send + Sync {
    /// The preferred label of an entity identifier.
    async fn label(&self, identifier: &str) -> Result<String, GrammarError>;
}

#[async_trait]
pub trait EntitySearch: Send + Sync {
    /// Candidate identifiers for free text, best first. Empty when nothing
    /// matched.
    async fn search(&self, text: &str, limit: usize) -> Result<Vec<String>, GrammarError>;
}

/// Format a term phrase as a `biolink:` identifier.
///
/// Classes become PascalCase (`chemical substance` → `biolink:ChemicalSubstance`)
/// and relations snake_case (`treated by` → `biolink:treated_by`).
pub fn format_identifier(phrase: &str, kind: TermKind) -> Result<String, GrammarError> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    if words.is_empty() {
        return Err(GrammarError::Identifier(format!(
            "cannot format empty phrase {phrase:?}"
        )));
    }
    let local: String = match kind {
        TermKind::Class => words.iter().map(|word| capitalize(word)).collect(),
        TermKind::Relation => words.join("_"),
    };
    Ok(format!("{BIOLINK_PREFIX}:{local}"))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split an identifier into its prefix and local name.
pub fn split_identifier(identifier: &str) -> Result<(&str, &str), GrammarError> {
    identifier
        .split_once(':')
        .filter(|(prefix, local)| !prefix.is_empty() && !local.is_empty())
        .ok_or_else(|| GrammarError::Identifier(format!("{identifier:?} has no prefix")))
}

/// Turn a class identifier back into a phrase without a service call.
///
/// A capital letter that does not follow another capital starts a new word:
/// `biolink:ChemicalSubstance` → `chemical substance`.
pub fn class_phrase(identifier: &str) -> Result<String, GrammarError> {
    let (_, local) = split_identifier(identifier)?;
    Ok(pascal_case_to_phrase(local))
}

/// Turn a relation identifier back into a phrase:
/// `biolink:treated_by` → `treated by`.
pub fn relation_phrase(identifier: &str) -> Result<String, GrammarError> {
    let (_, local) = split_identifier(identifier)?;
    Ok(snake_case_to_phrase(local))
}

pub fn pascal_case_to_phrase(name: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut previous_upper = false;
    for c in name.chars() {
        let upper = c.is_uppercase();
        if (upper && !previous_upper) || words.is_empty() {
            words.push(String::new());
        }
        if let Some(word) = words.last_mut() {
            word.extend(c.to_lowercase());
        }
        previous_upper = upper;
    }
    words
        .iter()
        .map(|word| word.trim())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn snake_case_to_phrase(name: &str) -> String {
    name.replace('_', " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_classes_and_relations() {
        assert_eq!(
            format_identifier("chemical substance", TermKind::Class).unwrap(),
            "biolink:ChemicalSubstance"
        );
        assert_eq!(
            format_identifier("treats", TermKind::Relation).unwrap(),
            "biolink:treats"
        );
        assert_eq!(
            format_identifier("treated by", TermKind::Relation).unwrap(),
            "biolink:treated_by"
        );
        assert!(format_identifier("  ", TermKind::Class).is_err());
    }

    #[test]
    fn converts_casing_back_to_phrases() {
        assert_eq!(pascal_case_to_phrase("ChemicalSubstance"), "chemical substance");
        assert_eq!(pascal_case_to_phrase("Drug"), "drug");
        assert_eq!(pascal_case_to_phrase("RNAProduct"), "rnaproduct");
        assert_eq!(snake_case_to_phrase("chemical_substance"), "chemical substance");
    }

    #[test]
    fn identifiers_need_a_prefix() {
        assert_eq!(class_phrase("biolink:GeneOrGeneProduct").unwrap(), "gene or gene product");
        assert_eq!(relation_phrase("biolink:exact_match").unwrap(), "exact match");
        assert!(matches!(
            class_phrase("Drug"),
            Err(GrammarError::Identifier(_))
        ));
    }
}
