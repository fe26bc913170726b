//! Async GraphQL client.
//!
//! The transport half of every generated operation: it posts a
//! [`QueryDocument`] to the configured endpoint with the token header and
//! hands the JSON body to the extractor. Construct a [`Client`] via
//! [`Client::new`], [`Client::from_env`], [`Client::from_file`] or
//! [`Client::auto`].

use crate::auth;
use crate::error::ClientError;
use gqlforge_core::extract;
use gqlforge_core::{
    BoundArgument, FieldSelectionBuilder, OperationSpec, QueryDocument, ResponseExtractor,
    SchemaTypeGraph, TypeDescriptor, TypeResolver, TypedValue,
};
use serde::de::DeserializeOwned;

/// A GraphQL API client bound to one endpoint and token.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    token: String,
    endpoint: String,
}

impl Client {
    /// Create a client with an explicit API token.
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Result<Self, ClientError> {
        let token = token.into();
        if token.is_empty() {
            return Err(ClientError::AuthConfig("Token cannot be empty".to_string()));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            token,
            endpoint: endpoint.into(),
        })
    }

    /// Create a client from the `GQLFORGE_TOKEN` environment variable.
    pub fn from_env(endpoint: impl Into<String>) -> Result<Self, ClientError> {
        Self::new(endpoint, auth::token_from_env()?)
    }

    /// Create a client from the `~/.gqlforge_token` file.
    pub fn from_file(endpoint: impl Into<String>) -> Result<Self, ClientError> {
        Self::new(endpoint, auth::token_from_file()?)
    }

    /// Create a client by auto-detecting the token (env -> file).
    pub fn auto(endpoint: impl Into<String>) -> Result<Self, ClientError> {
        Self::new(endpoint, auth::auto_token()?)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST a document and return the raw JSON response body.
    ///
    /// HTTP-level failures are mapped here; GraphQL-level errors are left in
    /// the body for the extractor.
    pub async fn send(&self, document: &QueryDocument) -> Result<serde_json::Value, ClientError> {
        tracing::debug!(query = %document.text, "sending GraphQL document");

        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", format!("Token {}", self.token))
            .header("Content-Type", "application/json")
            .header(
                "User-Agent",
                format!("gqlforge-sdk/{}", env!("CARGO_PKG_VERSION")),
            )
            .json(&document.payload())
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::Authentication(text));
        }
        if status == 403 {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::Forbidden(text));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// Send a document and deserialize `data.<operation>`.
    ///
    /// `Ok(None)` means the server returned no value for the operation.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        document: &QueryDocument,
        operation: &str,
    ) -> Result<Option<T>, ClientError> {
        let raw = self.send(document).await?;
        Ok(extract::extract(&raw, operation)?)
    }

    /// Send a document and convert `data.<operation>` structurally.
    pub async fn execute_typed(
        &self,
        document: &QueryDocument,
        operation: &str,
        extractor: &ResponseExtractor<'_>,
        return_type: &TypeDescriptor,
    ) -> Result<TypedValue, ClientError> {
        let raw = self.send(document).await?;
        Ok(extractor.extract(&raw, operation, return_type)?)
    }

    /// Run an operation straight from the schema, without generated code.
    ///
    /// Resolves the return type, builds its selection, synthesizes the
    /// document from `args` and converts the payload.
    pub async fn invoke(
        &self,
        graph: &SchemaTypeGraph,
        operation: &OperationSpec,
        args: &[BoundArgument],
    ) -> Result<TypedValue, ClientError> {
        let resolver = TypeResolver::new(graph);
        let return_type = resolver.resolve(&operation.return_type)?;
        let selection = FieldSelectionBuilder::new(resolver).selection_for(&return_type)?;
        let document = operation.synthesize(args, &selection);
        self.execute_typed(
            &document,
            &operation.name,
            &ResponseExtractor::new(resolver),
            &return_type,
        )
        .await
    }
}
