//! Typed Rust client generation from a GraphQL schema.
//!
//! [`emit::generate`] turns a parsed [`gqlforge_core::SchemaTypeGraph`] into
//! formatted module sources. The `gqlforge-codegen` binary writes them to
//! disk; build scripts can call it directly and `include!` the output.

pub mod emit;
pub mod naming;
pub mod report;

pub use emit::{generate, GenerateOptions, Generated};
pub use report::{GenerationError, GenerationReport};
