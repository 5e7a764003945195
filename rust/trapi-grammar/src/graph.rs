//! One-hop query graphs and their conversion to and from [`CurieTriple`]s.
//!
//! ```json
//! {
//!     "nodes": {
//!         "drug": { "category": "biolink:Drug" },
//!         "type 2 diabetes": { "id": "HP:0005978" }
//!     },
//!     "edges": {
//!         "treats": { "subject": "drug", "predicate": "biolink:treats", "object": "type 2 diabetes" }
//!     }
//! }
//! ```
//!
//! A graph built from a question always has exactly two nodes (one carrying
//! a category, the other an id) and one edge between them. Graphs received
//! from callers are checked for the same shape before they are encoded.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::GrammarError;
use crate::triple::{Category, CurieTriple, Direction, Name, Triple};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryGraph {
    pub nodes: IndexMap<String, QNode>,
    pub edges: IndexMap<String, QEdge>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl QNode {
    pub fn with_category(category: impl Into<String>) -> Self {
        QNode {
            category: Some(category.into()),
            id: None,
        }
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        QNode {
            category: None,
            id: Some(id.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QEdge {
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<String>,
    pub object: String,
}

/// The keys a graph's two nodes and one edge are stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphKeys {
    pub subject: String,
    pub object: String,
    pub edge: String,
}

impl Default for GraphKeys {
    fn default() -> Self {
        GraphKeys {
            subject: "n0".into(),
            object: "n1".into(),
            edge: "e01".into(),
        }
    }
}

impl GraphKeys {
    /// Keys taken from a triple's natural-language terms. Falls back to the
    /// positional defaults when subject and object read the same.
    pub fn from_triple(triple: &Triple) -> Self {
        let subject = triple.subject().as_str();
        let object = triple.object().as_str();
        if subject == object {
            return GraphKeys::default();
        }
        GraphKeys {
            subject: subject.to_string(),
            object: object.to_string(),
            edge: triple.predicate().to_string(),
        }
    }
}

impl QueryGraph {
    pub fn from_curie_triple(triple: &CurieTriple, keys: GraphKeys) -> Self {
        let category = QNode::with_category(triple.category().as_str());
        let id = QNode::with_id(triple.name().as_str());
        let (subject, object) = match triple.direction() {
            Direction::CategoryFirst => (category, id),
            Direction::NameFirst => (id, category),
        };

        let mut graph = QueryGraph::default();
        graph.nodes.insert(keys.subject.clone(), subject);
        graph.nodes.insert(keys.object.clone(), object);
        graph.edges.insert(keys.edge, QEdge {
            subject: keys.subject,
            predicate: Some(triple.predicate().to_string()),
            object: keys.object,
        });
        graph
    }

    /// Read the graph back as a triple of identifiers.
    ///
    /// The node without an id is the category side; a missing category or
    /// predicate takes the given default identifier.
    pub fn to_curie_triple(
        &self,
        default_category: &str,
        default_predicate: &str,
    ) -> Result<CurieTriple, GrammarError> {
        if self.nodes.len() != 2 {
            return Err(GrammarError::Validation(format!(
                "expected 2 nodes, found {}",
                self.nodes.len()
            )));
        }
        let edge = match self.edges.values().collect::<Vec<_>>().as_slice() {
            [edge] => *edge,
            edges => {
                return Err(GrammarError::Validation(format!(
                    "expected 1 edge, found {}",
                    edges.len()
                )));
            }
        };
        if edge.subject == edge.object {
            return Err(GrammarError::Validation(format!(
                "edge connects node {:?} to itself",
                edge.subject
            )));
        }

        let subject = self.node(&edge.subject)?;
        let object = self.node(&edge.object)?;
        let predicate = edge.predicate.as_deref().unwrap_or(default_predicate);
        let category = |node: &QNode| {
            Category::from(node.category.as_deref().unwrap_or(default_category))
        };

        match (subject.id.as_deref(), object.id.as_deref()) {
            (None, Some(id)) => Ok(CurieTriple::category_first(
                category(subject),
                predicate,
                Name::from(id),
            )),
            (Some(id), None) => Ok(CurieTriple::name_first(
                Name::from(id),
                predicate,
                category(object),
            )),
            (Some(_), Some(_)) => Err(GrammarError::Validation(
                "both nodes have an id; one must be a category".into(),
            )),
            (None, None) => Err(GrammarError::Validation(
                "neither node has an id".into(),
            )),
        }
    }

    fn node(&self, key: &str) -> Result<&QNode, GrammarError> {
        let node = self.nodes.get(key).ok_or_else(|| {
            GrammarError::Validation(format!("edge refers to unknown node {key:?}"))
        })?;
        if node.category.is_some() && node.id.is_some() {
            return Err(GrammarError::Validation(format!(
                "node {key:?} has both a category and an id"
            )));
        }
        Ok(node)
    }
}
