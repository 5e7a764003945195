//! Error types for question parsing and query graph encoding.

use std::fmt;

use thiserror::Error;

use crate::morphology::MorphologyError;

/// The external collaborator a failed call was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Taxonomy,
    Normalization,
    Search,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Taxonomy => write!(f, "taxonomy"),
            Self::Normalization => write!(f, "normalization"),
            Self::Search => write!(f, "entity search"),
        }
    }
}

#[derive(Debug, Error)]
pub enum GrammarError {
    /// No question template matched the preprocessed text.
    #[error("Failed to parse")]
    Parse { question: String },

    /// Entity search returned no candidates for a free-text name, or the
    /// normalization service does not know an identifier.
    #[error("Unrecognized thing '{text}'")]
    UnrecognizedEntity { text: String },

    #[error("{service} service error: {message}")]
    ExternalService {
        service: ServiceKind,
        message: String,
    },

    /// The query graph is not a single edge between a typed node and an
    /// identified node.
    #[error("invalid query graph: {0}")]
    Validation(String),

    #[error(transparent)]
    Morphology(#[from] MorphologyError),

    #[error("cannot format identifier: {0}")]
    Identifier(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl GrammarError {
    pub fn external(service: ServiceKind, message: impl fmt::Display) -> Self {
        GrammarError::ExternalService {
            service,
            message: message.to_string(),
        }
    }

    /// Whether the caller's input caused the failure. Client errors are safe
    /// to report back verbatim; everything else is an upstream or setup fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GrammarError::Parse { .. }
                | GrammarError::UnrecognizedEntity { .. }
                | GrammarError::Validation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_message_is_user_facing() {
        let error = GrammarError::Parse {
            question: "what aaagggh".into(),
        };
        assert_eq!(error.to_string(), "Failed to parse");
        assert!(error.is_client_error());
    }

    #[test]
    fn service_errors_name_the_service() {
        let error = GrammarError::external(ServiceKind::Search, "connection refused");
        assert_eq!(
            error.to_string(),
            "entity search service error: connection refused"
        );
        assert!(!error.is_client_error());
    }
}
