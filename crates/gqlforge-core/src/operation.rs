//! Query document synthesis.
//!
//! Argument values are inlined as GraphQL literals; the `variables` map of a
//! [`QueryDocument`] is always empty. Unbound arguments are left out of the
//! argument list entirely instead of being sent as `null`.

use crate::types::TypeReference;
use serde::Serialize;
use std::fmt;

/// Which root type an operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    pub fn keyword(self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
        }
    }
}

/// A field of a root operation type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSpec {
    pub kind: OperationKind,
    pub name: String,
    pub parameters: Vec<(String, TypeReference)>,
    pub return_type: TypeReference,
}

impl OperationSpec {
    /// Build the document for this operation.
    ///
    /// Arguments are emitted in parameter declaration order regardless of the
    /// order they were bound in. Bound names the operation does not declare
    /// are dropped.
    pub fn synthesize(&self, args: &[BoundArgument], selection: &str) -> QueryDocument {
        let mut ordered = Vec::with_capacity(self.parameters.len());
        for (name, _) in &self.parameters {
            if let Some(arg) = args.iter().find(|a| &a.name == name) {
                ordered.push(arg.clone());
            }
        }
        for arg in args {
            if !self.parameters.iter().any(|(name, _)| name == &arg.name) {
                tracing::debug!(
                    operation = %self.name,
                    argument = %arg.name,
                    "ignoring undeclared argument"
                );
            }
        }
        synthesize(self.kind, &self.name, &ordered, selection)
    }
}

/// A runtime argument value, rendered as a GraphQL literal.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    /// Enum values are written bare.
    Enum(String),
    List(Vec<ArgValue>),
    /// Input object fields in declaration order.
    Object(Vec<(String, ArgValue)>),
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Null => f.write_str("null"),
            ArgValue::Int(v) => write!(f, "{}", v),
            ArgValue::Float(v) => write!(f, "{}", v),
            // JSON string escaping is a valid GraphQL string literal.
            ArgValue::String(v) => {
                f.write_str(&serde_json::Value::String(v.clone()).to_string())
            }
            ArgValue::Boolean(v) => write!(f, "{}", v),
            ArgValue::Enum(v) => f.write_str(v),
            ArgValue::List(items) => {
                let items: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", items.join(", "))
            }
            ArgValue::Object(fields) => {
                let fields: Vec<String> = fields
                    .iter()
                    .map(|(name, value)| format!("{}:{}", name, value))
                    .collect();
                write!(f, "{{{}}}", fields.join(", "))
            }
        }
    }
}

/// Conversion of Rust values into argument literals.
///
/// `None` means the value is unbound and the argument is omitted.
pub trait IntoArgValue {
    fn into_arg_value(self) -> Option<ArgValue>;
}

impl IntoArgValue for ArgValue {
    fn into_arg_value(self) -> Option<ArgValue> {
        Some(self)
    }
}

impl IntoArgValue for String {
    fn into_arg_value(self) -> Option<ArgValue> {
        Some(ArgValue::String(self))
    }
}

impl IntoArgValue for &str {
    fn into_arg_value(self) -> Option<ArgValue> {
        Some(ArgValue::String(self.to_string()))
    }
}

impl IntoArgValue for i32 {
    fn into_arg_value(self) -> Option<ArgValue> {
        Some(ArgValue::Int(self.into()))
    }
}

impl IntoArgValue for i64 {
    fn into_arg_value(self) -> Option<ArgValue> {
        Some(ArgValue::Int(self))
    }
}

impl IntoArgValue for f64 {
    fn into_arg_value(self) -> Option<ArgValue> {
        Some(ArgValue::Float(self))
    }
}

impl IntoArgValue for bool {
    fn into_arg_value(self) -> Option<ArgValue> {
        Some(ArgValue::Boolean(self))
    }
}

impl<T: IntoArgValue> IntoArgValue for Option<T> {
    fn into_arg_value(self) -> Option<ArgValue> {
        self.and_then(IntoArgValue::into_arg_value)
    }
}

impl<T: IntoArgValue> IntoArgValue for Box<T> {
    fn into_arg_value(self) -> Option<ArgValue> {
        (*self).into_arg_value()
    }
}

impl<T: IntoArgValue> IntoArgValue for Vec<T> {
    fn into_arg_value(self) -> Option<ArgValue> {
        Some(ArgValue::List(
            self.into_iter()
                .map(|item| item.into_arg_value().unwrap_or(ArgValue::Null))
                .collect(),
        ))
    }
}

/// An argument as supplied at invocation time.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArgument {
    pub name: String,
    pub value: Option<ArgValue>,
}

impl BoundArgument {
    pub fn new(name: impl Into<String>, value: impl IntoArgValue) -> Self {
        Self {
            name: name.into(),
            value: value.into_arg_value(),
        }
    }

    pub fn unbound(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    pub fn is_bound(&self) -> bool {
        !matches!(self.value, None | Some(ArgValue::Null))
    }
}

/// The text sent to the server plus its (always empty) variables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryDocument {
    #[serde(rename = "query")]
    pub text: String,
    pub variables: serde_json::Map<String, serde_json::Value>,
}

impl QueryDocument {
    /// Wire body: `{"query": "...", "variables": {}}`.
    pub fn payload(&self) -> serde_json::Value {
        serde_json::json!({
            "query": self.text,
            "variables": self.variables,
        })
    }
}

/// Assemble `"<keyword> { <name> ( <args> ) { <selection> } }"`.
///
/// Only bound, non-null arguments are written. An empty selection (leaf
/// return type) drops the selection group.
pub fn synthesize(
    kind: OperationKind,
    name: &str,
    args: &[BoundArgument],
    selection: &str,
) -> QueryDocument {
    let rendered: Vec<String> = args
        .iter()
        .filter(|arg| arg.is_bound())
        .filter_map(|arg| {
            arg.value
                .as_ref()
                .map(|value| format!("{}:{}", arg.name, value))
        })
        .collect();

    let mut text = format!("{} {{ {} ( {} ) ", kind.keyword(), name, rendered.join(", "));
    if !selection.is_empty() {
        text.push_str(&format!("{{ {} }} ", selection));
    }
    text.push('}');

    QueryDocument {
        text,
        variables: serde_json::Map::new(),
    }
}
