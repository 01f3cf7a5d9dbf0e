//! Error types for the moviegraph-api crate.

use moviegraph_graph::GraphError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Invalid payload for {operation}: {source}")]
    InvalidPayload {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Graph(e) => e.kind(),
            Self::InvalidPayload { .. } => "invalid_payload",
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
        }
    }

    /// The error document the transport hands back to the caller.
    pub fn payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "kind": self.kind(),
                "message": self.to_string(),
            }
        })
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use moviegraph_core::ValidationError;

    #[test]
    fn graph_errors_keep_their_kind_and_message() {
        let err = ApiError::from(GraphError::from(ValidationError::missing("title")));
        assert_eq!(err.kind(), "validation");

        let payload = err.payload();
        assert_eq!(payload["error"]["kind"], "validation");
        assert!(payload["error"]["message"]
            .as_str()
            .unwrap()
            .contains("title"));
    }
}
