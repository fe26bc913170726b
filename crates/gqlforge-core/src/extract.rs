//! Pulling an operation's payload out of a GraphQL response.
//!
//! `errors` wins over `data`; a missing `data` is a malformed response; a
//! missing or `null` operation key is a legitimate "no value".

use crate::error::{ExtractError, GraphQLError};
use crate::resolver::TypeResolver;
use crate::types::{ScalarKind, TypeDescriptor};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A payload converted into the shape of a [`TypeDescriptor`].
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Null,
    Int(i32),
    Float(f64),
    String(String),
    Boolean(bool),
    Enum(String),
    List(Vec<TypedValue>),
    /// Fields in declaration order.
    Record(Vec<(String, TypedValue)>),
}

impl TypedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, TypedValue::Null)
    }

    /// Field of a record, `None` for other shapes or unknown names.
    pub fn get(&self, field: &str) -> Option<&TypedValue> {
        match self {
            TypedValue::Record(fields) => fields
                .iter()
                .find(|(name, _)| name == field)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) | TypedValue::Enum(s) => Some(s),
            _ => None,
        }
    }
}

/// Navigate to `data.<operation>`.
///
/// Returns `Ok(None)` when the operation key is absent or `null`.
pub fn extract_payload(raw: &Value, operation: &str) -> Result<Option<Value>, ExtractError> {
    if let Some(errors) = raw.get("errors").filter(|e| !e.is_null()) {
        let errors = collect_errors(errors);
        if !errors.is_empty() {
            return Err(ExtractError::GraphQL {
                operation: operation.to_string(),
                errors,
            });
        }
    }

    let data = raw
        .get("data")
        .filter(|d| !d.is_null())
        .ok_or_else(|| ExtractError::MissingData(operation.to_string()))?;

    match data.get(operation) {
        None | Some(Value::Null) => {
            tracing::debug!(operation, "no payload for operation");
            Ok(None)
        }
        Some(value) => Ok(Some(value.clone())),
    }
}

/// Extract and deserialize into a generated Rust type.
pub fn extract<T: DeserializeOwned>(raw: &Value, operation: &str) -> Result<Option<T>, ExtractError> {
    let Some(payload) = extract_payload(raw, operation)? else {
        return Ok(None);
    };
    serde_json::from_value(payload)
        .map(Some)
        .map_err(|e| ExtractError::Conversion {
            path: operation.to_string(),
            message: e.to_string(),
        })
}

/// An `errors` entry that is not a list of error objects still has to
/// surface as a failure.
fn collect_errors(errors: &Value) -> Vec<GraphQLError> {
    match errors {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                serde_json::from_value(item.clone()).unwrap_or_else(|_| GraphQLError {
                    message: item.to_string(),
                    path: None,
                    extensions: None,
                })
            })
            .collect(),
        other => vec![GraphQLError {
            message: other.to_string(),
            path: None,
            extensions: None,
        }],
    }
}

/// Structural conversion of payloads driven by resolved type descriptors.
#[derive(Debug, Clone, Copy)]
pub struct ResponseExtractor<'g> {
    resolver: TypeResolver<'g>,
}

impl<'g> ResponseExtractor<'g> {
    pub fn new(resolver: TypeResolver<'g>) -> Self {
        Self { resolver }
    }

    /// Extract `data.<operation>` from `raw` and convert it to `return_type`.
    pub fn extract(
        &self,
        raw: &Value,
        operation: &str,
        return_type: &TypeDescriptor,
    ) -> Result<TypedValue, ExtractError> {
        match extract_payload(raw, operation)? {
            None => Ok(TypedValue::Null),
            Some(payload) => self.convert(&payload, return_type, operation),
        }
    }

    /// Convert a JSON value into `ty`'s shape. `path` locates the value in
    /// error messages.
    pub fn convert(
        &self,
        value: &Value,
        ty: &TypeDescriptor,
        path: &str,
    ) -> Result<TypedValue, ExtractError> {
        if value.is_null() {
            return Ok(TypedValue::Null);
        }
        match ty {
            TypeDescriptor::Scalar(kind) => convert_scalar(value, *kind, path),
            TypeDescriptor::Enum { values, .. } => match value.as_str() {
                Some(s) if values.iter().any(|v| v == s) => Ok(TypedValue::Enum(s.to_string())),
                Some(s) => Err(mismatch(path, &format!("a known enum value, got `{}`", s))),
                None => Err(mismatch(path, "an enum value string")),
            },
            TypeDescriptor::ListOf(element) => {
                let items = value
                    .as_array()
                    .ok_or_else(|| mismatch(path, "a list"))?;
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.convert(item, element, &format!("{}.{}", path, i)))
                    .collect::<Result<Vec<_>, _>>()
                    .map(TypedValue::List)
            }
            TypeDescriptor::Named { name, fields } => {
                let object = value
                    .as_object()
                    .ok_or_else(|| mismatch(path, &format!("an object of type {}", name)))?;
                let mut record = Vec::with_capacity(fields.len());
                for field in fields {
                    let field_path = format!("{}.{}", path, field.name);
                    let converted = match object.get(&field.name) {
                        None | Some(Value::Null) => TypedValue::Null,
                        Some(field_value) => {
                            let field_ty = self.resolver.resolve(&field.ty).map_err(|e| {
                                ExtractError::Conversion {
                                    path: field_path.clone(),
                                    message: e.to_string(),
                                }
                            })?;
                            self.convert(field_value, &field_ty, &field_path)?
                        }
                    };
                    record.push((field.name.clone(), converted));
                }
                Ok(TypedValue::Record(record))
            }
        }
    }
}

fn convert_scalar(value: &Value, kind: ScalarKind, path: &str) -> Result<TypedValue, ExtractError> {
    match kind {
        ScalarKind::Int => value
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(TypedValue::Int)
            .ok_or_else(|| mismatch(path, "a 32-bit integer")),
        ScalarKind::Float => value
            .as_f64()
            .map(TypedValue::Float)
            .ok_or_else(|| mismatch(path, "a float")),
        ScalarKind::Boolean => value
            .as_bool()
            .map(TypedValue::Boolean)
            .ok_or_else(|| mismatch(path, "a boolean")),
        // Custom scalars map to strings; non-string JSON is kept as its text.
        ScalarKind::String => Ok(TypedValue::String(match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })),
    }
}

fn mismatch(path: &str, expected: &str) -> ExtractError {
    ExtractError::Conversion {
        path: path.to_string(),
        message: format!("expected {}", expected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SchemaTypeGraph;
    use crate::types::TypeReference;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const SCHEMA: &str = r#"
        enum Role { ADMIN MEMBER }
        type User { id: ID! name: String age: Int role: Role friends: [User!] }
    "#;

    fn user_type(graph: &SchemaTypeGraph) -> TypeDescriptor {
        TypeResolver::new(graph)
            .resolve(&TypeReference::named("User"))
            .unwrap()
    }

    fn s(v: &str) -> TypedValue {
        TypedValue::String(v.to_string())
    }

    #[test]
    fn success_converts_record() {
        let graph = SchemaTypeGraph::parse(SCHEMA);
        let extractor = ResponseExtractor::new(TypeResolver::new(&graph));
        let raw = json!({"data": {"user": {"id": "u1", "name": "Ann"}}});
        let value = extractor.extract(&raw, "user", &user_type(&graph)).unwrap();
        assert_eq!(value.get("id"), Some(&s("u1")));
        assert_eq!(value.get("name"), Some(&s("Ann")));
        assert_eq!(
            value,
            TypedValue::Record(vec![
                ("id".to_string(), s("u1")),
                ("name".to_string(), s("Ann")),
                ("age".to_string(), TypedValue::Null),
                ("role".to_string(), TypedValue::Null),
                ("friends".to_string(), TypedValue::Null),
            ])
        );
    }

    #[test]
    fn errors_take_precedence_over_data() {
        let graph = SchemaTypeGraph::parse(SCHEMA);
        let extractor = ResponseExtractor::new(TypeResolver::new(&graph));
        let raw = json!({"errors": [{"message": "not found"}], "data": {"user": null}});
        let err = extractor
            .extract(&raw, "user", &user_type(&graph))
            .unwrap_err();
        assert!(matches!(err, ExtractError::GraphQL { .. }));
        assert_eq!(err.messages(), vec!["not found"]);
    }

    #[test]
    fn errors_without_data() {
        let raw = json!({"errors": [{"message": "not found"}]});
        let err = extract_payload(&raw, "user").unwrap_err();
        assert_eq!(err.messages(), vec!["not found"]);
    }

    #[test]
    fn malformed_errors_entry_still_fails() {
        let raw = json!({"errors": "kaput", "data": {"user": {}}});
        let err = extract_payload(&raw, "user").unwrap_err();
        assert_eq!(err.messages(), vec!["\"kaput\""]);
    }

    #[test]
    fn empty_errors_array_is_ignored() {
        let raw = json!({"errors": [], "data": {"user": {"id": "u1"}}});
        assert_eq!(
            extract_payload(&raw, "user").unwrap(),
            Some(json!({"id": "u1"}))
        );
    }

    #[test]
    fn missing_data_is_an_error() {
        let err = extract_payload(&json!({}), "user").unwrap_err();
        assert_eq!(err, ExtractError::MissingData("user".to_string()));
    }

    #[test]
    fn missing_operation_key_is_no_value() {
        let graph = SchemaTypeGraph::parse(SCHEMA);
        let extractor = ResponseExtractor::new(TypeResolver::new(&graph));
        let raw = json!({"data": {}});
        assert_eq!(
            extractor.extract(&raw, "user", &user_type(&graph)).unwrap(),
            TypedValue::Null
        );
        assert_eq!(extract::<String>(&raw, "user").unwrap(), None);
        assert_eq!(
            extract::<String>(&json!({"data": {"user": null}}), "user").unwrap(),
            None
        );
    }

    #[test]
    fn nested_lists_and_enums() {
        let graph = SchemaTypeGraph::parse(SCHEMA);
        let extractor = ResponseExtractor::new(TypeResolver::new(&graph));
        let raw = json!({"data": {"user": {
            "id": "u1",
            "role": "ADMIN",
            "friends": [{"id": "u2", "age": 31}]
        }}});
        let value = extractor.extract(&raw, "user", &user_type(&graph)).unwrap();
        assert_eq!(value.get("role"), Some(&TypedValue::Enum("ADMIN".to_string())));
        let Some(TypedValue::List(friends)) = value.get("friends") else {
            panic!("expected friends list");
        };
        assert_eq!(friends[0].get("age"), Some(&TypedValue::Int(31)));
    }

    #[test]
    fn shape_mismatch_reports_path() {
        let graph = SchemaTypeGraph::parse(SCHEMA);
        let extractor = ResponseExtractor::new(TypeResolver::new(&graph));
        let raw = json!({"data": {"user": {"id": "u1", "friends": [{"age": "old"}]}}});
        let err = extractor
            .extract(&raw, "user", &user_type(&graph))
            .unwrap_err();
        assert_eq!(
            err,
            ExtractError::Conversion {
                path: "user.friends.0.age".to_string(),
                message: "expected a 32-bit integer".to_string(),
            }
        );
    }

    #[test]
    fn int_out_of_range_is_rejected() {
        let graph = SchemaTypeGraph::parse(SCHEMA);
        let extractor = ResponseExtractor::new(TypeResolver::new(&graph));
        let err = extractor
            .convert(&json!(4_000_000_000i64), &TypeDescriptor::Scalar(ScalarKind::Int), "n")
            .unwrap_err();
        assert!(matches!(err, ExtractError::Conversion { .. }));
    }

    #[test]
    fn unknown_enum_value_is_rejected() {
        let graph = SchemaTypeGraph::parse(SCHEMA);
        let extractor = ResponseExtractor::new(TypeResolver::new(&graph));
        let raw = json!({"data": {"user": {"role": "OWNER"}}});
        assert!(extractor.extract(&raw, "user", &user_type(&graph)).is_err());
    }

    #[test]
    fn typed_extract_deserializes() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct User {
            id: String,
            name: Option<String>,
        }
        let raw = json!({"data": {"user": {"id": "u1", "name": "Ann"}}});
        assert_eq!(
            extract::<User>(&raw, "user").unwrap(),
            Some(User {
                id: "u1".to_string(),
                name: Some("Ann".to_string()),
            })
        );
        let err = extract::<User>(&json!({"data": {"user": {"name": 3}}}), "user").unwrap_err();
        assert!(matches!(err, ExtractError::Conversion { .. }));
    }
}
