//! Error types for the runtime client.
//!
//! [`ClientError`] covers token configuration, HTTP transport failures and
//! everything that can go wrong while reading an operation's payload.

use gqlforge_core::{ExtractError, GraphQLError, ResolveError};

/// Errors returned by generated operations and [`Client`](crate::Client) calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Server rejected the token (HTTP 401).
    #[error("Authentication error: {0}")]
    Authentication(String),
    /// Server refused the request (HTTP 403).
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// Network or HTTP transport error.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-2xx HTTP response not covered by a more specific variant.
    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },
    /// An operation's types could not be resolved against the schema.
    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),
    /// The response carried GraphQL errors, lacked `data`, or had the wrong shape.
    #[error(transparent)]
    Operation(#[from] ExtractError),
    /// Token configuration error (no token found).
    #[error("Auth configuration error: {0}")]
    AuthConfig(String),
    /// Internal error (e.g. runtime creation failure).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClientError {
    /// The GraphQL errors carried by the response, if that is what failed.
    pub fn graphql_errors(&self) -> Option<&[GraphQLError]> {
        match self {
            ClientError::Operation(ExtractError::GraphQL { errors, .. }) => Some(errors),
            _ => None,
        }
    }
}
