//! Type resolution and query synthesis for generated GraphQL clients.
//!
//! Data flows from a parsed [`SchemaTypeGraph`] through the [`TypeResolver`]
//! into [`TypeDescriptor`]s, from which the [`FieldSelectionBuilder`] derives
//! selection sets. At invocation time [`operation::synthesize`] builds the
//! query document and [`extract`] pulls the payload back out of the response.

pub mod error;
pub mod extract;
pub mod graph;
pub mod operation;
pub mod resolver;
pub mod selection;
pub mod types;

pub use error::{ExtractError, GraphQLError, ResolveError};
pub use extract::{ResponseExtractor, TypedValue};
pub use graph::{SchemaTypeGraph, TypeKind};
pub use operation::{
    ArgValue, BoundArgument, IntoArgValue, OperationKind, OperationSpec, QueryDocument,
};
pub use resolver::TypeResolver;
pub use selection::FieldSelectionBuilder;
pub use types::{FieldDescriptor, ScalarKind, TypeDescriptor, TypeReference};
