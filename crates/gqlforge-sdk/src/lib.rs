//! Runtime for gqlforge-generated GraphQL clients.
//!
//! Generated operation methods synthesize a query document with
//! [`operation::synthesize`], send it through a [`Client`], and deserialize
//! the `data.<operation>` payload into generated types. The same pieces can
//! be driven without generated code through [`Client::invoke`].

pub mod auth;
#[cfg(feature = "blocking")]
pub mod blocking_client;
pub mod client;
pub mod error;

pub use gqlforge_core::{extract, graph, operation};

// Re-export key types at crate root for convenience.
pub use client::Client;
pub use error::ClientError;
pub use gqlforge_core::{
    ArgValue, BoundArgument, GraphQLError, IntoArgValue, OperationKind, SchemaTypeGraph,
    TypedValue,
};
