//! The two operations callers use: question → query graph, and
//! query graph → question.

use std::sync::Arc;

use crate::config::{GrammarConfig, TaxonomySource};
use crate::encode::Encoder;
use crate::error::GrammarError;
use crate::graph::{GraphKeys, QueryGraph};
use crate::parse::QuestionParser;
use crate::resolve::IdentifierResolver;
use crate::service::{
    EntitySearch, Normalizer, RemoteNormalizer, RemoteSearch, RemoteTaxonomy, StaticTaxonomy,
    Taxonomy, TermKind,
};
use crate::triple::{CurieTriple, Triple};
use crate::vocabulary::{GrammarTables, Vocabulary, VocabularyBuilder};

/// The external collaborators a [`Translator`] talks to.
#[derive(Clone)]
pub struct Services {
    pub taxonomy: Arc<dyn Taxonomy>,
    pub search: Arc<dyn EntitySearch>,
    pub normalizer: Arc<dyn Normalizer>,
}

impl Services {
    pub fn from_config(config: &GrammarConfig) -> Result<Self, GrammarError> {
        let taxonomy: Arc<dyn Taxonomy> = match &config.taxonomy {
            TaxonomySource::Bundled => Arc::new(StaticTaxonomy::bundled()?),
            TaxonomySource::File(path) => Arc::new(StaticTaxonomy::from_path(path)?),
            TaxonomySource::Remote(remote) => Arc::new(RemoteTaxonomy::new(remote.clone())?),
        };
        Ok(Services {
            taxonomy,
            search: Arc::new(RemoteSearch::new(config.search.clone())?),
            normalizer: Arc::new(RemoteNormalizer::new(config.normalizer.clone())?),
        })
    }
}

/// Translates between questions and query graphs.
///
/// Construction fetches the taxonomy and builds the vocabulary; if either
/// fails there is no translator. Afterwards the translator is read-only and
/// can be shared freely between tasks.
pub struct Translator {
    parser: QuestionParser,
    resolver: IdentifierResolver,
    encoder: Encoder,
}

impl Translator {
    /// A translator over the services and tables named by `config`.
    pub async fn from_config(config: &GrammarConfig) -> Result<Self, GrammarError> {
        let services = Services::from_config(config)?;
        let tables = GrammarTables::load(&config.tables)?;
        Self::new(config, services, tables).await
    }

    pub async fn new(
        config: &GrammarConfig,
        services: Services,
        tables: GrammarTables,
    ) -> Result<Self, GrammarError> {
        let vocabulary = VocabularyBuilder::new(services.taxonomy.as_ref(), tables)
            .category_root(&config.category_root)
            .relation_root(&config.relation_root)
            .build()
            .await?;
        let vocabulary = Arc::new(vocabulary);

        let default_category = services
            .taxonomy
            .format_identifier(&config.default_category, TermKind::Class)?;
        let default_predicate = services
            .taxonomy
            .format_identifier(&config.default_predicate, TermKind::Relation)?;

        let parser = QuestionParser::new(vocabulary.clone())
            .default_category(&config.default_category)
            .default_predicate(&config.default_predicate);
        let encoder = Encoder::new(vocabulary)
            .default_category(default_category)
            .default_predicate(default_predicate);
        let resolver = IdentifierResolver::new(services.taxonomy, services.search, services.normalizer)
            .search_limit(config.search_limit);

        Ok(Translator {
            parser,
            resolver,
            encoder,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        self.parser.vocabulary()
    }

    /// Parse a question into natural-language terms, without resolving them.
    pub fn parse(&self, question: &str) -> Result<Triple, GrammarError> {
        self.parser.parse(question)
    }

    pub async fn resolve(&self, triple: &Triple) -> Result<CurieTriple, GrammarError> {
        self.resolver.resolve(triple).await
    }

    pub async fn parse_question(&self, question: &str) -> Result<QueryGraph, GrammarError> {
        let triple = self.parse(question)?;
        let curie = self.resolve(&triple).await?;
        Ok(QueryGraph::from_curie_triple(
            &curie,
            GraphKeys::from_triple(&triple),
        ))
    }

    pub async fn encode_graph(&self, graph: &QueryGraph) -> Result<String, GrammarError> {
        let curie = self.encoder.curie_triple(graph)?;
        let labelled = self.resolver.label(&curie).await?;
        Ok(self.encoder.sentence(&labelled))
    }
}
