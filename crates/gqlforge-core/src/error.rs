//! Error types for type resolution and response extraction.

use serde::{Deserialize, Serialize};

/// A single GraphQL error from a response's `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default)]
    pub path: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub extensions: Option<serde_json::Value>,
}

/// Failure to turn a [`TypeReference`](crate::types::TypeReference) into a
/// [`TypeDescriptor`](crate::types::TypeDescriptor).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The name is neither a known scalar nor a registered schema type.
    #[error("unresolvable type `{0}`")]
    Unresolvable(String),
    /// A wrapper contains a shape that cannot occur in a well-formed schema.
    #[error("malformed type reference `{0}`")]
    MalformedTypeReference(String),
}

/// Failure to pull an operation's payload out of a response.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractError {
    /// The response carried an `errors` array.
    #[error("GraphQL errors in {operation}: {}", join_messages(.errors))]
    GraphQL {
        operation: String,
        errors: Vec<GraphQLError>,
    },
    /// Neither `data` nor `errors` was present.
    #[error("missing `data` in response to {0}")]
    MissingData(String),
    /// The payload did not have the shape of the return type.
    #[error("cannot convert `{path}`: {message}")]
    Conversion { path: String, message: String },
}

impl ExtractError {
    /// Messages of all GraphQL errors, empty for other variants.
    pub fn messages(&self) -> Vec<&str> {
        match self {
            ExtractError::GraphQL { errors, .. } => {
                errors.iter().map(|e| e.message.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

fn join_messages(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| match &e.path {
            Some(path) if !path.is_empty() => {
                let path: Vec<String> = path
                    .iter()
                    .map(|p| p.as_str().map(String::from).unwrap_or_else(|| p.to_string()))
                    .collect();
                format!("{} at {}", e.message, path.join("."))
            }
            _ => e.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gql_error(message: &str) -> GraphQLError {
        GraphQLError {
            message: message.to_string(),
            path: None,
            extensions: None,
        }
    }

    #[test]
    fn display_unresolvable() {
        let err = ResolveError::Unresolvable("Ghost".to_string());
        assert_eq!(err.to_string(), "unresolvable type `Ghost`");
    }

    #[test]
    fn display_graphql_errors_joined() {
        let err = ExtractError::GraphQL {
            operation: "driver".to_string(),
            errors: vec![gql_error("not found"), gql_error("denied")],
        };
        assert_eq!(err.to_string(), "GraphQL errors in driver: not found; denied");
        assert_eq!(err.messages(), vec!["not found", "denied"]);
    }

    #[test]
    fn display_graphql_error_with_path() {
        let err = ExtractError::GraphQL {
            operation: "driver".to_string(),
            errors: vec![GraphQLError {
                message: "boom".to_string(),
                path: Some(vec![serde_json::json!("driver"), serde_json::json!(0)]),
                extensions: None,
            }],
        };
        assert_eq!(err.to_string(), "GraphQL errors in driver: boom at driver.0");
    }

    #[test]
    fn graphql_error_deserializes_without_optional_parts() {
        let err: GraphQLError = serde_json::from_str(r#"{"message": "nope"}"#).unwrap();
        assert_eq!(err, gql_error("nope"));
    }

    #[test]
    fn messages_empty_for_other_variants() {
        assert!(ExtractError::MissingData("x".to_string()).messages().is_empty());
    }
}
