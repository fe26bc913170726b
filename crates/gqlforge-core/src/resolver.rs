//! Wrapper unwrapping: [`TypeReference`] → [`TypeDescriptor`].

use crate::error::ResolveError;
use crate::graph::{SchemaTypeGraph, TypeKind};
use crate::types::{ScalarKind, TypeDescriptor, TypeReference};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Built-in scalar names and the primitive each maps to.
static BUILTIN_SCALARS: LazyLock<HashMap<&'static str, ScalarKind>> = LazyLock::new(|| {
    HashMap::from([
        ("Int", ScalarKind::Int),
        ("Float", ScalarKind::Float),
        ("String", ScalarKind::String),
        ("ID", ScalarKind::String),
        ("Boolean", ScalarKind::Boolean),
    ])
});

/// Look up a built-in scalar by name.
pub fn builtin_scalar(name: &str) -> Option<ScalarKind> {
    BUILTIN_SCALARS.get(name).copied()
}

/// Resolves type references against a [`SchemaTypeGraph`].
///
/// Resolution is shallow: a composite type yields its declared fields without
/// resolving them, so self-referencing types resolve in one step.
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'g> {
    graph: &'g SchemaTypeGraph,
}

impl<'g> TypeResolver<'g> {
    pub fn new(graph: &'g SchemaTypeGraph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &'g SchemaTypeGraph {
        self.graph
    }

    pub fn resolve(&self, ty: &TypeReference) -> Result<TypeDescriptor, ResolveError> {
        match ty {
            TypeReference::Named(name) => self.resolve_named(name),
            TypeReference::List(inner) => Ok(TypeDescriptor::ListOf(Box::new(self.resolve(inner)?))),
            TypeReference::NonNull(inner) => match inner.as_ref() {
                TypeReference::NonNull(_) => {
                    Err(ResolveError::MalformedTypeReference(ty.to_string()))
                }
                inner => self.resolve(inner),
            },
        }
    }

    /// Resolve a bare type name, as found at the bottom of every reference.
    pub fn resolve_named(&self, name: &str) -> Result<TypeDescriptor, ResolveError> {
        if name.is_empty() {
            return Err(ResolveError::MalformedTypeReference(String::new()));
        }
        if let Some(kind) = builtin_scalar(name) {
            return Ok(TypeDescriptor::Scalar(kind));
        }

        let Some(def) = self.graph.get(name) else {
            return Err(ResolveError::Unresolvable(name.to_string()));
        };
        match def.kind {
            // Custom scalars travel as strings.
            TypeKind::Scalar => Ok(TypeDescriptor::Scalar(ScalarKind::String)),
            TypeKind::Enum => Ok(TypeDescriptor::Enum {
                name: def.name.clone(),
                values: def.values.iter().map(|v| v.name.clone()).collect(),
            }),
            TypeKind::Object | TypeKind::InputObject | TypeKind::Interface => {
                Ok(TypeDescriptor::Named {
                    name: def.name.clone(),
                    fields: def.fields.iter().map(|f| f.descriptor()).collect(),
                })
            }
            TypeKind::Union => Err(ResolveError::Unresolvable(name.to_string())),
        }
    }
}
