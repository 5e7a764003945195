//! The category and predicate vocabularies that questions are matched against.
//!
//! Both vocabularies start from a taxonomy: every class below the category
//! root and every relation below the relation root. Two static tables then
//! adjust them:
//!
//! - **grammar fixes** turn relation names that are not verb phrases into
//!   ones that are (`exact match` → `is exact match to`), in both directions;
//! - **category synonyms** add informal words for categories
//!   (`chemical` → `chemical substance`).
//!
//! Finally every entry gets its plural, which is how "What drugs treat
//! asthma?" and "What drug treats asthma?" both parse. The plural ⇄ singular
//! pairs recorded on the way are kept in [`Inflections`].

use std::collections::HashMap;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};

use crate::config::TableSources;
use crate::error::GrammarError;
use crate::morphology::{Inflections, plural_noun_phrase, plural_verb_phrase};
use crate::service::Taxonomy;

const BUNDLED_GRAMMAR_FIXES: &str = include_str!("../data/grammar_fixes.json");
const BUNDLED_CATEGORY_SYNONYMS: &str = include_str!("../data/category_synonyms.json");

/// The static grammar tables.
#[derive(Debug, Clone, Default)]
pub struct GrammarTables {
    /// canonical relation → verb phrase
    verb_phrases: IndexMap<String, String>,
    /// verb phrase → canonical relation
    relations: HashMap<String, String>,
    /// informal term → canonical category, in table order
    synonyms: IndexMap<String, String>,
}

impl GrammarTables {
    /// The tables shipped with this crate.
    pub fn bundled() -> Result<Self, GrammarError> {
        Self::from_json(BUNDLED_GRAMMAR_FIXES, BUNDLED_CATEGORY_SYNONYMS)
    }

    /// Bundled tables, with either one replaced by a file when given.
    pub fn load(sources: &TableSources) -> Result<Self, GrammarError> {
        let fixes = match &sources.grammar_fixes {
            Some(path) => read_table(path)?,
            None => BUNDLED_GRAMMAR_FIXES.to_string(),
        };
        let synonyms = match &sources.category_synonyms {
            Some(path) => read_table(path)?,
            None => BUNDLED_CATEGORY_SYNONYMS.to_string(),
        };
        Self::from_json(&fixes, &synonyms)
    }

    /// Decode a grammar-fix table (`{relation: verb phrase}`) and a synonym
    /// table (`{category: [informal term, ...]}`).
    pub fn from_json(grammar_fixes: &str, category_synonyms: &str) -> Result<Self, GrammarError> {
        let verb_phrases: IndexMap<String, String> = serde_json::from_str(grammar_fixes)
            .map_err(|e| GrammarError::Config(format!("invalid grammar fix table: {e}")))?;
        let by_category: IndexMap<String, Vec<String>> = serde_json::from_str(category_synonyms)
            .map_err(|e| GrammarError::Config(format!("invalid category synonym table: {e}")))?;

        let mut tables = GrammarTables::default();
        for (relation, phrase) in verb_phrases {
            tables.add_verb_phrase(relation, phrase);
        }
        for (category, synonyms) in by_category {
            for synonym in synonyms {
                tables.add_synonym(synonym, category.clone());
            }
        }
        Ok(tables)
    }

    pub fn add_verb_phrase(&mut self, relation: impl Into<String>, phrase: impl Into<String>) {
        let (relation, phrase) = (relation.into(), phrase.into());
        self.relations.insert(phrase.clone(), relation.clone());
        self.verb_phrases.insert(relation, phrase);
    }

    pub fn add_synonym(&mut self, synonym: impl Into<String>, category: impl Into<String>) {
        self.synonyms.insert(synonym.into(), category.into());
    }

    /// The verb phrase for a canonical relation.
    pub fn verb_phrase<'a>(&'a self, relation: &'a str) -> &'a str {
        self.verb_phrases
            .get(relation)
            .map(String::as_str)
            .unwrap_or(relation)
    }

    /// The canonical relation for a verb phrase.
    pub fn relation<'a>(&'a self, phrase: &'a str) -> &'a str {
        self.relations
            .get(phrase)
            .map(String::as_str)
            .unwrap_or(phrase)
    }

    /// The canonical category for an informal term.
    pub fn category<'a>(&'a self, term: &'a str) -> &'a str {
        self.synonyms.get(term).map(String::as_str).unwrap_or(term)
    }

    pub fn synonyms(&self) -> impl Iterator<Item = &str> {
        self.synonyms.keys().map(String::as_str)
    }
}

fn read_table(path: &Path) -> Result<String, GrammarError> {
    std::fs::read_to_string(path)
        .map_err(|e| GrammarError::Config(format!("cannot read {}: {e}", path.display())))
}

/// Category nouns and predicate verb phrases in singular and plural form,
/// plus everything needed to map a matched phrase back to its canonical form.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    categories: IndexSet<String>,
    predicates: IndexSet<String>,
    inflections: Inflections,
    tables: GrammarTables,
}

impl Vocabulary {
    /// Build a vocabulary from taxonomy terms.
    ///
    /// Fails if a relation, after grammar fixes, does not start with a verb
    /// the morphology rules can conjugate.
    pub fn from_terms<C, R>(
        categories: C,
        relations: R,
        tables: GrammarTables,
    ) -> Result<Self, GrammarError>
    where
        C: IntoIterator,
        C::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        let mut inflections = Inflections::builder();

        let mut category_set: IndexSet<String> = categories.into_iter().map(Into::into).collect();
        category_set.extend(tables.synonyms().map(str::to_string));
        let singular_categories: Vec<String> = category_set.iter().cloned().collect();
        for category in singular_categories {
            let plural = plural_noun_phrase(&category);
            inflections.register_noun(&plural, &category);
            category_set.insert(plural);
        }

        let mut predicate_set: IndexSet<String> = relations
            .into_iter()
            .map(|relation| {
                let relation: String = relation.into();
                tables.verb_phrase(&relation).to_string()
            })
            .collect();
        let singular_predicates: Vec<String> = predicate_set.iter().cloned().collect();
        for predicate in singular_predicates {
            let plural = plural_verb_phrase(&predicate)?;
            inflections.register_verb(&plural, &predicate);
            predicate_set.insert(plural);
        }

        Ok(Vocabulary {
            categories: category_set,
            predicates: predicate_set,
            inflections: inflections.build(),
            tables,
        })
    }

    /// Every category phrase, singular forms first.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    /// Every predicate verb phrase, singular forms first.
    pub fn predicates(&self) -> impl Iterator<Item = &str> {
        self.predicates.iter().map(String::as_str)
    }

    pub fn inflections(&self) -> &Inflections {
        &self.inflections
    }

    pub fn tables(&self) -> &GrammarTables {
        &self.tables
    }

    /// The canonical category for a matched category phrase:
    /// `chemicals` → `chemical` → `chemical substance`.
    pub fn canonical_category(&self, phrase: &str) -> String {
        let singular = self.inflections.singular_noun(phrase);
        self.tables.category(singular).to_string()
    }

    /// The canonical relation for a matched predicate phrase:
    /// `are exact matches to` → `is exact match to` → `exact match`.
    pub fn canonical_predicate(&self, phrase: &str) -> String {
        let singular = self.inflections.singular_verb(phrase);
        self.tables.relation(singular).to_string()
    }

    /// The verb phrase for a canonical relation.
    pub fn verb_phrase<'a>(&'a self, relation: &'a str) -> &'a str {
        self.tables.verb_phrase(relation)
    }
}

/// Fetches taxonomy terms and builds the [`Vocabulary`] from them.
pub struct VocabularyBuilder<'a> {
    taxonomy: &'a dyn Taxonomy,
    tables: GrammarTables,
    category_root: String,
    relation_root: String,
}

impl<'a> VocabularyBuilder<'a> {
    pub fn new(taxonomy: &'a dyn Taxonomy, tables: GrammarTables) -> Self {
        Self {
            taxonomy,
            tables,
            category_root: "biological entity".into(),
            relation_root: "related to".into(),
        }
    }

    pub fn category_root(mut self, root: impl Into<String>) -> Self {
        self.category_root = root.into();
        self
    }

    pub fn relation_root(mut self, root: impl Into<String>) -> Self {
        self.relation_root = root.into();
        self
    }

    pub async fn build(self) -> Result<Vocabulary, GrammarError> {
        let categories = self.taxonomy.descendants(&self.category_root).await?;
        let relations = self.taxonomy.descendants(&self.relation_root).await?;

        let vocabulary = Vocabulary::from_terms(categories, relations, self.tables)?;
        tracing::info!(
            categories = vocabulary.categories.len(),
            predicates = vocabulary.predicates.len(),
            plural_nouns = vocabulary.inflections.noun_count(),
            plural_verbs = vocabulary.inflections.verb_count(),
            "built vocabulary"
        );
        Ok(vocabulary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::StaticTaxonomy;
    use testresult::TestResult;

    fn tables() -> GrammarTables {
        GrammarTables::from_json(
            r#"{
                "related to": "is related to",
                "exact match": "is exact match to",
                "treated by": "is treated by"
            }"#,
            r#"{"chemical substance": ["chemical", "compound"]}"#,
        )
        .unwrap()
    }

    fn vocabulary() -> Vocabulary {
        Vocabulary::from_terms(
            ["chemical substance", "drug", "disease"],
            ["related to", "treats", "treated by", "exact match"],
            tables(),
        )
        .unwrap()
    }

    #[test]
    fn tables_map_both_ways() {
        let tables = tables();
        assert_eq!(tables.verb_phrase("exact match"), "is exact match to");
        assert_eq!(tables.relation("is exact match to"), "exact match");
        assert_eq!(tables.verb_phrase("treats"), "treats");
        assert_eq!(tables.category("compound"), "chemical substance");
        assert_eq!(tables.category("drug"), "drug");
    }

    #[test]
    fn vocabulary_holds_singulars_then_plurals() {
        let vocabulary = vocabulary();
        let categories: Vec<&str> = vocabulary.categories().collect();
        assert_eq!(categories, vec![
            "chemical substance",
            "drug",
            "disease",
            "chemical",
            "compound",
            "chemical substances",
            "drugs",
            "diseases",
            "chemicals",
            "compounds",
        ]);

        let predicates: Vec<&str> = vocabulary.predicates().collect();
        assert_eq!(predicates, vec![
            "is related to",
            "treats",
            "is treated by",
            "is exact match to",
            "are related to",
            "treat",
            "are treated by",
            "are exact matches to",
        ]);
    }

    #[test]
    fn canonical_forms() {
        let vocabulary = vocabulary();
        assert_eq!(vocabulary.canonical_category("chemicals"), "chemical substance");
        assert_eq!(vocabulary.canonical_category("diseases"), "disease");
        assert_eq!(vocabulary.canonical_predicate("are exact matches to"), "exact match");
        assert_eq!(vocabulary.canonical_predicate("treat"), "treats");
        assert_eq!(vocabulary.canonical_predicate("is treated by"), "treated by");
    }

    #[test]
    fn every_plural_singularizes_back() {
        let vocabulary = vocabulary();
        let inflections = vocabulary.inflections();
        assert_eq!(inflections.noun_count(), 5);
        assert_eq!(inflections.verb_count(), 4);
        for category in ["chemical substance", "drug", "disease", "chemical", "compound"] {
            let plural = inflections.plural_noun(category).unwrap();
            assert_eq!(inflections.singular_noun(plural), category);
        }
        for predicate in ["is related to", "treats", "is treated by", "is exact match to"] {
            let plural = inflections.plural_verb(predicate).unwrap();
            assert_eq!(inflections.singular_verb(plural), predicate);
        }
    }

    #[test]
    fn relation_without_verb_fails_the_build() {
        let result = Vocabulary::from_terms(["drug"], ["exact match"], GrammarTables::default());
        assert!(matches!(result, Err(GrammarError::Morphology(_))));
    }

    #[test]
    fn table_files_replace_bundled_tables() -> TestResult {
        let mut synonyms = tempfile::NamedTempFile::new()?;
        std::io::Write::write_all(&mut synonyms, br#"{"drug": ["pill"]}"#)?;

        let tables = GrammarTables::load(&TableSources {
            grammar_fixes: None,
            category_synonyms: Some(synonyms.path().to_path_buf()),
        })?;
        assert_eq!(tables.category("pill"), "drug");
        assert_eq!(tables.category("chemical"), "chemical");
        assert_eq!(tables.verb_phrase("exact match"), "is exact match to");

        let missing = TableSources {
            grammar_fixes: Some(synonyms.path().with_extension("missing")),
            category_synonyms: None,
        };
        assert!(matches!(GrammarTables::load(&missing), Err(GrammarError::Config(_))));
        Ok(())
    }

    #[tokio::test]
    async fn builds_from_bundled_taxonomy() -> TestResult {
        let taxonomy = StaticTaxonomy::bundled()?;
        let vocabulary = VocabularyBuilder::new(&taxonomy, GrammarTables::bundled()?)
            .build()
            .await?;

        let inflections = vocabulary.inflections();
        for category in vocabulary.categories() {
            if let Some(plural) = inflections.plural_noun(category) {
                assert_eq!(inflections.singular_noun(plural), category);
            }
        }
        for predicate in vocabulary.predicates() {
            if let Some(plural) = inflections.plural_verb(predicate) {
                assert_eq!(inflections.singular_verb(plural), predicate);
            }
        }
        assert!(vocabulary.predicates().any(|p| p == "are exact matches to"));
        assert!(vocabulary.categories().any(|c| c == "chemicals"));
        Ok(())
    }
}
