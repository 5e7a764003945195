//! # TRAPI Grammar: questions ⇄ one-hop query graphs
//!
//! Translates short biomedical questions into query graphs of two typed
//! nodes joined by one relation edge, and renders such graphs back as
//! questions.
//!
//! ```text
//! "What drugs treat asthma?"
//!     → tokenize            ["what", "drugs", "treat", "asthma"]
//!     → match templates     category "drugs", predicate "treat", name "asthma"
//!     → canonicalize        (drug, treats, asthma)
//!     → resolve             (biolink:Drug, biolink:treats, MONDO:0004979)
//!     → query graph         {"nodes": {"drug": ..., "asthma": ...}, "edges": {"treats": ...}}
//! ```
//!
//! ## Core Ideas
//!
//! - **The vocabulary comes from a taxonomy**: every class below
//!   "biological entity" is a category and every relation below
//!   "related to" is a predicate, each in singular and plural form.
//! - **Plurals are recorded, not guessed**: singular forms are recovered from
//!   the plural ⇄ singular pairs recorded while the vocabulary was built.
//! - **Templates are ordered**: the first template that matches the whole
//!   question wins.
//! - **Entities are found by search**: free text resolves to the top-ranked
//!   candidate of an entity search service.
//!
//! The entry point is [`Translator`].

pub mod config;
pub mod encode;
pub mod error;
pub mod graph;
pub mod morphology;
pub mod parse;
pub mod resolve;
pub mod service;
pub mod template;
pub mod token;
pub mod translator;
pub mod triple;
pub mod vocabulary;

pub use config::{GrammarConfig, RemoteServiceConfig, TableSources, TaxonomySource};
pub use error::{GrammarError, ServiceKind};
pub use graph::{GraphKeys, QEdge, QNode, QueryGraph};
pub use translator::{Services, Translator};
pub use triple::{Category, CurieTriple, Direction, Name, Triple};
