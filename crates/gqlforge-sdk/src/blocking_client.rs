//! Blocking (synchronous) client.
//!
//! A synchronous wrapper around the async [`Client`](crate::Client). Enable
//! it with the `blocking` feature flag:
//!
//! ```toml
//! [dependencies]
//! gqlforge-sdk = { version = "...", features = ["blocking"] }
//! ```
//!
//! The blocking client owns a current-thread tokio runtime and runs each
//! request to completion before returning.
//!
//! # Example
//!
//! ```no_run
//! use gqlforge_sdk::blocking_client::Client;
//! use gqlforge_sdk::operation::{synthesize, BoundArgument, OperationKind};
//!
//! let client = Client::auto("https://example.com/graphql").unwrap();
//! let document = synthesize(
//!     OperationKind::Query,
//!     "vehicle",
//!     &[BoundArgument::new("id", "v-1")],
//!     "id name",
//! );
//! let vehicle: Option<serde_json::Value> = client.execute(&document, "vehicle").unwrap();
//! println!("{:?}", vehicle);
//! ```

use crate::error::ClientError;
use gqlforge_core::{
    BoundArgument, OperationSpec, QueryDocument, ResponseExtractor, SchemaTypeGraph,
    TypeDescriptor, TypedValue,
};
use serde::de::DeserializeOwned;

/// A synchronous GraphQL client.
///
/// Every method blocks the calling thread until the request completes.
pub struct Client {
    inner: crate::Client,
    rt: tokio::runtime::Runtime,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("blocking_client::Client")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a blocking client with an explicit API token.
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Result<Self, ClientError> {
        Self::wrap(crate::Client::new(endpoint, token)?)
    }

    /// Create a blocking client from the `GQLFORGE_TOKEN` environment variable.
    pub fn from_env(endpoint: impl Into<String>) -> Result<Self, ClientError> {
        Self::wrap(crate::Client::from_env(endpoint)?)
    }

    /// Create a blocking client from the `~/.gqlforge_token` file.
    pub fn from_file(endpoint: impl Into<String>) -> Result<Self, ClientError> {
        Self::wrap(crate::Client::from_file(endpoint)?)
    }

    /// Create a blocking client by auto-detecting the token (env -> file).
    pub fn auto(endpoint: impl Into<String>) -> Result<Self, ClientError> {
        Self::wrap(crate::Client::auto(endpoint)?)
    }

    fn wrap(inner: crate::Client) -> Result<Self, ClientError> {
        Ok(Self {
            inner,
            rt: build_runtime()?,
        })
    }

    /// The async client this one drives.
    pub fn inner(&self) -> &crate::Client {
        &self.inner
    }

    /// Blocking equivalent of [`crate::Client::send`].
    pub fn send(&self, document: &QueryDocument) -> Result<serde_json::Value, ClientError> {
        self.rt.block_on(self.inner.send(document))
    }

    /// Blocking equivalent of [`crate::Client::execute`].
    pub fn execute<T: DeserializeOwned>(
        &self,
        document: &QueryDocument,
        operation: &str,
    ) -> Result<Option<T>, ClientError> {
        self.rt.block_on(self.inner.execute(document, operation))
    }

    /// Blocking equivalent of [`crate::Client::execute_typed`].
    pub fn execute_typed(
        &self,
        document: &QueryDocument,
        operation: &str,
        extractor: &ResponseExtractor<'_>,
        return_type: &TypeDescriptor,
    ) -> Result<TypedValue, ClientError> {
        self.rt.block_on(
            self.inner
                .execute_typed(document, operation, extractor, return_type),
        )
    }

    /// Blocking equivalent of [`crate::Client::invoke`].
    pub fn invoke(
        &self,
        graph: &SchemaTypeGraph,
        operation: &OperationSpec,
        args: &[BoundArgument],
    ) -> Result<TypedValue, ClientError> {
        self.rt.block_on(self.inner.invoke(graph, operation, args))
    }
}

fn build_runtime() -> Result<tokio::runtime::Runtime, ClientError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| ClientError::Internal(format!("Failed to create tokio runtime: {}", e)))
}
