//! Configuration for building a [`Translator`](crate::Translator).
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! yields a translator over the bundled taxonomy snapshot and tables, with
//! the public node-normalization and name-lookup services for entity
//! resolution.
//!
//! ```json
//! {
//!     "category_root": "biological entity",
//!     "taxonomy": { "remote": { "endpoint": "https://bl-lookup-sri.renci.org" } },
//!     "search": { "endpoint": "http://localhost:2433", "timeout_seconds": 5 }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::GrammarError;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarConfig {
    /// Taxonomy term whose descendants form the category vocabulary.
    pub category_root: String,

    /// Taxonomy relation whose descendants form the predicate vocabulary.
    pub relation_root: String,

    /// Category used when a question does not name one ("What treats asthma?").
    pub default_category: String,

    /// Relation used when a query graph edge carries no predicate.
    pub default_predicate: String,

    /// How many candidates to request from entity search.
    pub search_limit: usize,

    pub taxonomy: TaxonomySource,

    pub tables: TableSources,

    pub normalizer: RemoteServiceConfig,

    pub search: RemoteServiceConfig,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            category_root: "biological entity".into(),
            relation_root: "related to".into(),
            default_category: "named thing".into(),
            default_predicate: "related to".into(),
            search_limit: 10,
            taxonomy: TaxonomySource::default(),
            tables: TableSources::default(),
            normalizer: RemoteServiceConfig::new("https://nodenormalization-sri.renci.org"),
            search: RemoteServiceConfig::new("https://name-resolution-sri.renci.org"),
        }
    }
}

impl GrammarConfig {
    pub fn from_json(json: &str) -> Result<Self, GrammarError> {
        serde_json::from_str(json)
            .map_err(|e| GrammarError::Config(format!("invalid configuration: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| GrammarError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&json)
    }
}

/// Where the category and relation hierarchy comes from.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxonomySource {
    /// The snapshot shipped with this crate.
    #[default]
    Bundled,
    /// A taxonomy document on disk, in the bundled snapshot's format.
    File(PathBuf),
    /// A biolink lookup service.
    Remote(RemoteServiceConfig),
}

/// Overrides for the bundled grammar tables.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSources {
    /// JSON object mapping canonical relation phrases to verb phrases.
    pub grammar_fixes: Option<PathBuf>,
    /// JSON object mapping canonical categories to lists of informal terms.
    pub category_synonyms: Option<PathBuf>,
}

/// Connection settings for an HTTP collaborator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RemoteServiceConfig {
    /// Base URL; service paths are appended to it.
    pub endpoint: String,

    /// Per-request timeout. Expiry fails the call; there is no retry.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: Option<u64>,
}

fn default_timeout_seconds() -> Option<u64> {
    Some(30)
}

impl RemoteServiceConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_seconds: default_timeout_seconds(),
        }
    }

    /// The endpoint as a validated absolute URL.
    pub fn endpoint_url(&self) -> Result<Url, GrammarError> {
        Url::parse(&self.endpoint).map_err(|e| {
            GrammarError::Config(format!("invalid endpoint {:?}: {e}", self.endpoint))
        })
    }

    /// Join a path onto the endpoint.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testresult::TestResult;

    #[test]
    fn empty_config_uses_defaults() -> TestResult {
        let config = GrammarConfig::from_json("{}")?;
        assert_eq!(config.category_root, "biological entity");
        assert_eq!(config.default_category, "named thing");
        assert_eq!(config.search_limit, 10);
        assert!(matches!(config.taxonomy, TaxonomySource::Bundled));
        assert_eq!(config.search.timeout_seconds, Some(30));
        Ok(())
    }

    #[test]
    fn remote_taxonomy_and_overrides() -> TestResult {
        let config = GrammarConfig::from_json(
            r#"{
                "search_limit": 3,
                "taxonomy": { "remote": { "endpoint": "http://localhost:8144" } },
                "tables": { "grammar_fixes": "fixes.json" },
                "search": { "endpoint": "http://localhost:2433", "timeout_seconds": 5 }
            }"#,
        )?;
        assert_eq!(config.search_limit, 3);
        match &config.taxonomy {
            TaxonomySource::Remote(remote) => {
                assert_eq!(remote.url("/bl/drug"), "http://localhost:8144/bl/drug");
                assert_eq!(remote.timeout_seconds, Some(30));
            }
            other => panic!("unexpected taxonomy source {other:?}"),
        }
        assert_eq!(config.tables.grammar_fixes, Some(PathBuf::from("fixes.json")));
        assert_eq!(config.search.timeout_seconds, Some(5));
        Ok(())
    }

    #[test]
    fn endpoints_are_validated() {
        assert!(RemoteServiceConfig::new("https://example.org/api").endpoint_url().is_ok());
        assert!(matches!(
            RemoteServiceConfig::new("not a url").endpoint_url(),
            Err(GrammarError::Config(_))
        ));
    }

    #[test]
    fn loads_from_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("grammar.json");
        std::fs::write(&path, r#"{ "taxonomy": { "file": "taxonomy.json" } }"#)?;
        let config = GrammarConfig::from_path(&path)?;
        assert!(matches!(config.taxonomy, TaxonomySource::File(ref file) if file == Path::new("taxonomy.json")));

        assert!(matches!(
            GrammarConfig::from_path(dir.path().join("absent.json")),
            Err(GrammarError::Config(_))
        ));
        Ok(())
    }

    #[test]
    fn invalid_config_is_reported() {
        assert!(matches!(
            GrammarConfig::from_json(r#"{ "search_limit": "ten" }"#),
            Err(GrammarError::Config(_))
        ));
    }
}
