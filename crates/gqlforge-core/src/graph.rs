//! The schema registry: every named type of a parsed SDL document.
//!
//! [`SchemaTypeGraph::parse`] walks the `apollo-parser` CST once and keeps a
//! simplified, name-sorted view of it. The graph is immutable afterwards and
//! is shared read-only by resolution, selection building and generation.

use crate::operation::{OperationKind, OperationSpec};
use crate::types::{FieldDescriptor, TypeReference};
use apollo_parser::cst;
use apollo_parser::Parser;
use std::collections::BTreeMap;

/// What kind of GraphQL type a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Scalar,
    Enum,
    Object,
    InputObject,
    Interface,
    Union,
}

impl TypeKind {
    /// Object, input and interface types have fields of their own.
    pub fn is_composite(self) -> bool {
        matches!(
            self,
            TypeKind::Object | TypeKind::InputObject | TypeKind::Interface
        )
    }
}

/// A field of an object/interface type, or an input value of an input type.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeReference,
    pub arguments: Vec<ArgumentDef>,
    /// See [`FieldDescriptor::is_list_element_composite`].
    pub is_list_element_composite: bool,
}

impl FieldDef {
    pub fn descriptor(&self) -> FieldDescriptor {
        FieldDescriptor {
            name: self.name.clone(),
            ty: self.ty.clone(),
            is_list_element_composite: self.is_list_element_composite,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArgumentDef {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeReference,
}

#[derive(Debug, Clone)]
pub struct EnumValueDef {
    pub name: String,
    pub description: Option<String>,
}

/// A single named type definition.
#[derive(Debug, Clone)]
pub struct TypeDef {
    pub name: String,
    pub kind: TypeKind,
    pub description: Option<String>,
    /// Declared fields, empty for scalars, enums and unions.
    pub fields: Vec<FieldDef>,
    /// Enum values, empty for everything else.
    pub values: Vec<EnumValueDef>,
}

/// Name → definition registry built once per schema load.
#[derive(Debug, Clone)]
pub struct SchemaTypeGraph {
    types: BTreeMap<String, TypeDef>,
    query_type: Option<String>,
    mutation_type: Option<String>,
}

impl SchemaTypeGraph {
    /// Parse an SDL document into a registry.
    ///
    /// Parse errors are reported as warnings; `apollo-parser` is
    /// error-resilient so whatever it recovered is still registered.
    pub fn parse(schema_text: &str) -> Self {
        let tree = Parser::new(schema_text).parse();
        for err in tree.errors() {
            tracing::warn!("schema parse warning: {}", err.message());
        }

        let doc = tree.document();
        let mut types = BTreeMap::new();
        let mut extensions: Vec<(String, Vec<FieldDef>)> = Vec::new();
        let mut query_type = Some("Query".to_string());
        let mut mutation_type = Some("Mutation".to_string());

        for def in doc.definitions() {
            let parsed = match def {
                cst::Definition::SchemaDefinition(s) => {
                    // An explicit schema definition names every root it has.
                    query_type = None;
                    mutation_type = None;
                    for root in s.root_operation_type_definitions() {
                        let Some(named) = root.named_type() else {
                            continue;
                        };
                        let name = extract_name(&named.name());
                        match root.operation_type() {
                            Some(op) if op.query_token().is_some() => query_type = Some(name),
                            Some(op) if op.mutation_token().is_some() => {
                                mutation_type = Some(name)
                            }
                            _ => {}
                        }
                    }
                    None
                }
                cst::Definition::ScalarTypeDefinition(s) => Some(TypeDef {
                    name: extract_name(&s.name()),
                    kind: TypeKind::Scalar,
                    description: extract_description(&s.description()),
                    fields: Vec::new(),
                    values: Vec::new(),
                }),
                cst::Definition::EnumTypeDefinition(e) => Some(extract_enum(&e)),
                cst::Definition::ObjectTypeDefinition(o) => Some(TypeDef {
                    name: extract_name(&o.name()),
                    kind: TypeKind::Object,
                    description: extract_description(&o.description()),
                    fields: extract_fields(&o.fields_definition()),
                    values: Vec::new(),
                }),
                cst::Definition::InterfaceTypeDefinition(i) => Some(TypeDef {
                    name: extract_name(&i.name()),
                    kind: TypeKind::Interface,
                    description: extract_description(&i.description()),
                    fields: extract_fields(&i.fields_definition()),
                    values: Vec::new(),
                }),
                cst::Definition::InputObjectTypeDefinition(i) => Some(extract_input(&i)),
                cst::Definition::UnionTypeDefinition(u) => Some(TypeDef {
                    name: extract_name(&u.name()),
                    kind: TypeKind::Union,
                    description: extract_description(&u.description()),
                    fields: Vec::new(),
                    values: Vec::new(),
                }),
                cst::Definition::ObjectTypeExtension(x) => {
                    extensions.push((
                        extract_name(&x.name()),
                        extract_fields(&x.fields_definition()),
                    ));
                    None
                }
                _ => None,
            };
            if let Some(ty) = parsed {
                if ty.name.is_empty() {
                    continue;
                }
                if types.contains_key(&ty.name) {
                    tracing::warn!("duplicate definition of `{}`; keeping the first", ty.name);
                    continue;
                }
                types.insert(ty.name.clone(), ty);
            }
        }

        // `extend type` may precede the type it extends.
        for (name, fields) in extensions {
            match types.get_mut(&name) {
                Some(ty) => ty.fields.extend(fields),
                None => tracing::warn!("extension of unknown type `{}` ignored", name),
            }
        }

        let kinds: BTreeMap<String, TypeKind> = types
            .iter()
            .map(|(name, ty)| (name.clone(), ty.kind))
            .collect();
        for ty in types.values_mut() {
            for field in &mut ty.fields {
                field.is_list_element_composite = field.ty.is_list()
                    && kinds
                        .get(field.ty.base_name())
                        .is_some_and(|kind| kind.is_composite());
            }
        }

        tracing::debug!(types = types.len(), "schema loaded");

        Self {
            types,
            query_type,
            mutation_type,
        }
    }

    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    pub fn kind(&self, name: &str) -> Option<TypeKind> {
        self.types.get(name).map(|ty| ty.kind)
    }

    /// All registered types, sorted by name.
    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    /// Name of the root type for `kind`, `None` when a `schema` definition
    /// leaves that root out.
    pub fn root_name(&self, kind: OperationKind) -> Option<&str> {
        match kind {
            OperationKind::Query => self.query_type.as_deref(),
            OperationKind::Mutation => self.mutation_type.as_deref(),
        }
    }

    pub fn is_root(&self, name: &str) -> bool {
        self.query_type.as_deref() == Some(name) || self.mutation_type.as_deref() == Some(name)
    }

    /// Object, interface and input types that become records, sorted by name.
    /// Root operation types are excluded.
    pub fn records(&self) -> impl Iterator<Item = &TypeDef> {
        self.types
            .values()
            .filter(|ty| ty.kind.is_composite() && !self.is_root(&ty.name))
    }

    /// Enum types, sorted by name.
    pub fn enums(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values().filter(|ty| ty.kind == TypeKind::Enum)
    }

    /// Fields of the `kind` root type as operations, in declaration order.
    pub fn operations(&self, kind: OperationKind) -> Vec<OperationSpec> {
        let Some(root) = self.root_name(kind).and_then(|name| self.types.get(name)) else {
            return Vec::new();
        };
        root.fields
            .iter()
            .map(|field| OperationSpec {
                kind,
                name: field.name.clone(),
                parameters: field
                    .arguments
                    .iter()
                    .map(|arg| (arg.name.clone(), arg.ty.clone()))
                    .collect(),
                return_type: field.ty.clone(),
            })
            .collect()
    }
}

fn extract_name(name: &Option<cst::Name>) -> String {
    name.as_ref()
        .map(|n| n.text().to_string())
        .unwrap_or_default()
}

fn extract_description(desc: &Option<cst::Description>) -> Option<String> {
    desc.as_ref()
        .and_then(|d| d.string_value())
        .map(String::from)
        .filter(|s| !s.is_empty())
}

/// Missing pieces in a recovered CST become an empty name, which the resolver
/// reports as a malformed reference.
fn extract_type(ty: &Option<cst::Type>) -> TypeReference {
    match ty {
        None => TypeReference::Named(String::new()),
        Some(cst::Type::NamedType(nt)) => TypeReference::Named(extract_name(&nt.name())),
        Some(cst::Type::ListType(lt)) => TypeReference::list(extract_type(&lt.ty())),
        Some(cst::Type::NonNullType(nnt)) => {
            if let Some(named) = nnt.named_type() {
                TypeReference::non_null(TypeReference::Named(extract_name(&named.name())))
            } else if let Some(list) = nnt.list_type() {
                TypeReference::non_null(TypeReference::list(extract_type(&list.ty())))
            } else {
                TypeReference::non_null(TypeReference::Named(String::new()))
            }
        }
    }
}

fn extract_fields(fields_def: &Option<cst::FieldsDefinition>) -> Vec<FieldDef> {
    let Some(fd) = fields_def else {
        return Vec::new();
    };
    fd.field_definitions()
        .map(|f| FieldDef {
            name: extract_name(&f.name()),
            description: extract_description(&f.description()),
            ty: extract_type(&f.ty()),
            arguments: extract_arguments(&f.arguments_definition()),
            is_list_element_composite: false,
        })
        .collect()
}

fn extract_arguments(args_def: &Option<cst::ArgumentsDefinition>) -> Vec<ArgumentDef> {
    let Some(ad) = args_def else {
        return Vec::new();
    };
    ad.input_value_definitions()
        .map(|iv| ArgumentDef {
            name: extract_name(&iv.name()),
            description: extract_description(&iv.description()),
            ty: extract_type(&iv.ty()),
        })
        .collect()
}

fn extract_enum(e: &cst::EnumTypeDefinition) -> TypeDef {
    let values = e
        .enum_values_definition()
        .map(|evd| {
            evd.enum_value_definitions()
                .map(|ev| EnumValueDef {
                    name: ev
                        .enum_value()
                        .map(|v| v.text().to_string())
                        .unwrap_or_default(),
                    description: extract_description(&ev.description()),
                })
                .collect()
        })
        .unwrap_or_default();

    TypeDef {
        name: extract_name(&e.name()),
        kind: TypeKind::Enum,
        description: extract_description(&e.description()),
        fields: Vec::new(),
        values,
    }
}

fn extract_input(i: &cst::InputObjectTypeDefinition) -> TypeDef {
    let fields = i
        .input_fields_definition()
        .map(|ifd| {
            ifd.input_value_definitions()
                .map(|iv| FieldDef {
                    name: extract_name(&iv.name()),
                    description: extract_description(&iv.description()),
                    ty: extract_type(&iv.ty()),
                    arguments: Vec::new(),
                    is_list_element_composite: false,
                })
                .collect()
        })
        .unwrap_or_default();

    TypeDef {
        name: extract_name(&i.name()),
        kind: TypeKind::InputObject,
        description: extract_description(&i.description()),
        fields,
        values: Vec::new(),
    }
}
