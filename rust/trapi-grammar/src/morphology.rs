//! English inflection of category nouns and predicate verb phrases.
//!
//! The vocabulary holds every category and predicate in two forms: the
//! canonical singular ("chemical substance", "is exact match to") and its
//! plural ("chemical substances", "are exact matches to"). Pluralizing is
//! rule-based; singularizing is not. The only way back from a plural is the
//! [`Inflections`] table recorded while the vocabulary was built, so a plural
//! the grammar never produced singularizes to itself.
//!
//! ```text
//! plural_noun_phrase("gene or gene product")  → "genes or gene products"
//! plural_noun_phrase("location of disease")   → "locations of disease"
//! plural_verb_phrase("is exact match to")     → "are exact matches to"
//! plural_verb_phrase("physically interacts")  → "physically interact"
//! ```

use std::collections::HashMap;

use thiserror::Error;

/// Words that close the noun-phrase complement of an `is ...` predicate.
const PREPOSITIONS: &[&str] = &["to", "of", "with", "in", "for", "as", "by"];

/// Complements of `is` that read as nouns by shape but must stay singular.
const FIXED_COMPLEMENTS: &[&str] = &["same", "in linkage disequilibrium"];

/// Complements ending like this are adjectives ("is correlated with",
/// "is capable of", "is homologous to", "is similar to").
const ADJECTIVE_SUFFIXES: &[&str] = &["ed", "able", "ous", "ilar"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MorphologyError {
    #[error("What kind of verb is '{verb}'?")]
    UnrecognizedVerb { verb: String },
}

/// Pluralize a noun phrase.
///
/// Only the head of an `X of Y` phrase is inflected, and each side of an
/// `X or Y` disjunction is inflected independently.
pub fn plural_noun_phrase(phrase: &str) -> String {
    if let Some((head, rest)) = phrase.split_once(" of ") {
        return format!("{} of {rest}", plural_noun_phrase(head));
    }
    if phrase.contains(" or ") {
        return phrase
            .split(" or ")
            .map(plural_noun_phrase)
            .collect::<Vec<_>>()
            .join(" or ");
    }
    if ends_in_consonant_y(phrase) {
        return format!("{}ies", &phrase[..phrase.len() - 1]);
    }
    if phrase.ends_with(['x', 's']) || phrase.ends_with("ch") || phrase.ends_with("sh") {
        return format!("{phrase}es");
    }
    format!("{phrase}s")
}

fn ends_in_consonant_y(phrase: &str) -> bool {
    let mut chars = phrase.chars().rev();
    chars.next() == Some('y') && chars.next().is_some_and(|c| !"aeiou".contains(c))
}

/// Conjugate a third-person singular verb into its plural form.
fn plural_verb(verb: &str) -> Result<String, MorphologyError> {
    match verb {
        "is" => Ok("are".into()),
        "has" => Ok("have".into()),
        verb if verb.ends_with("sses") => Ok(verb[..verb.len() - 2].into()),
        verb if verb.ends_with('s') => Ok(verb[..verb.len() - 1].into()),
        verb => Err(MorphologyError::UnrecognizedVerb { verb: verb.into() }),
    }
}

/// Pluralize a predicate verb phrase.
///
/// Leading adverbs are kept as they are. When the verb is `is`, a noun
/// complement between the verb and its closing preposition is pluralized
/// too, so "is exact match to" agrees as "are exact matches to". The
/// closing preposition is the rightmost one because the complement may
/// itself contain a preposition.
pub fn plural_verb_phrase(phrase: &str) -> Result<String, MorphologyError> {
    let words: Vec<&str> = phrase.split(' ').collect();

    if words[0].ends_with("ly") {
        let rest = plural_verb_phrase(&words[1..].join(" "))?;
        return Ok(format!("{} {rest}", words[0]));
    }

    let verb = plural_verb(words[0])?;

    if verb == "are" {
        let closing = words
            .iter()
            .rposition(|word| PREPOSITIONS.contains(word))
            .filter(|&index| index > 0);
        if let Some(index) = closing {
            let complement = words[1..index].join(" ");
            if is_noun_complement(&complement) {
                return Ok(format!(
                    "{verb} {} {}",
                    plural_noun_phrase(&complement),
                    words[index..].join(" ")
                ));
            }
        }
    }

    Ok(std::iter::once(verb.as_str())
        .chain(words[1..].iter().copied())
        .collect::<Vec<_>>()
        .join(" "))
}

fn is_noun_complement(complement: &str) -> bool {
    !complement.is_empty()
        && !FIXED_COMPLEMENTS.contains(&complement)
        && !ADJECTIVE_SUFFIXES
            .iter()
            .any(|suffix| complement.ends_with(suffix))
}

/// The recorded plural ⇄ singular pairs for nouns and verb phrases.
///
/// Built once alongside the vocabulary through [`InflectionsBuilder`] and
/// read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Inflections {
    nouns: Pairs,
    verbs: Pairs,
}

#[derive(Debug, Clone, Default)]
struct Pairs {
    singular: HashMap<String, String>,
    plural: HashMap<String, String>,
}

impl Pairs {
    fn insert(&mut self, plural: &str, singular: &str) {
        if let Some(previous) = self.singular.get(plural) {
            if previous != singular {
                tracing::warn!(
                    plural,
                    previous = previous.as_str(),
                    singular,
                    "plural form is shared; the later singular wins"
                );
            }
        }
        self.singular.insert(plural.into(), singular.into());
        self.plural.insert(singular.into(), plural.into());
    }
}

impl Inflections {
    pub fn builder() -> InflectionsBuilder {
        InflectionsBuilder::default()
    }

    /// The singular a recorded plural noun phrase came from, or the phrase
    /// unchanged.
    pub fn singular_noun<'a>(&'a self, phrase: &'a str) -> &'a str {
        self.nouns
            .singular
            .get(phrase)
            .map(String::as_str)
            .unwrap_or(phrase)
    }

    /// The singular a recorded plural verb phrase came from, or the phrase
    /// unchanged.
    pub fn singular_verb<'a>(&'a self, phrase: &'a str) -> &'a str {
        self.verbs
            .singular
            .get(phrase)
            .map(String::as_str)
            .unwrap_or(phrase)
    }

    pub fn plural_noun(&self, phrase: &str) -> Option<&str> {
        self.nouns.plural.get(phrase).map(String::as_str)
    }

    pub fn plural_verb(&self, phrase: &str) -> Option<&str> {
        self.verbs.plural.get(phrase).map(String::as_str)
    }

    pub fn noun_count(&self) -> usize {
        self.nouns.singular.len()
    }

    pub fn verb_count(&self) -> usize {
        self.verbs.singular.len()
    }
}

#[derive(Debug, Default)]
pub struct InflectionsBuilder {
    inflections: Inflections,
}

impl InflectionsBuilder {
    pub fn register_noun(&mut self, plural: &str, singular: &str) -> &mut Self {
        self.inflections.nouns.insert(plural, singular);
        self
    }

    pub fn register_verb(&mut self, plural: &str, singular: &str) -> &mut Self {
        self.inflections.verbs.insert(plural, singular);
        self
    }

    pub fn build(self) -> Inflections {
        self.inflections
    }
}
