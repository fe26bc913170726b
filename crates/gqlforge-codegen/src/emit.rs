//! Rust source generation from a [`SchemaTypeGraph`].
//!
//! Output is a small module tree (`mod.rs`, `types.rs`, `enums.rs`,
//! `operations.rs`) that depends only on `gqlforge-sdk` and `serde`. The
//! three item files are siblings and refer to each other through
//! `super::types` and `super::enums`. Types and operations are emitted sorted
//! by name so an unchanged schema always produces byte-identical files.

use crate::naming::{doc_comment_tokens, field_ident, serde_rename, type_ident, variant_ident};
use crate::report::GenerationReport;
use gqlforge_core::graph::{FieldDef, TypeDef, TypeKind};
use gqlforge_core::{
    FieldSelectionBuilder, OperationKind, ResolveError, ScalarKind, SchemaTypeGraph,
    TypeDescriptor, TypeReference, TypeResolver,
};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use std::collections::BTreeMap;

const HEADER: &str = "// @generated by gqlforge-codegen. Do not edit.\n\n";

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Name of the generated operations struct.
    pub client_name: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            client_name: "Api".to_string(),
        }
    }
}

/// Formatted sources keyed by file name, plus the members that were skipped.
#[derive(Debug)]
pub struct Generated {
    pub files: BTreeMap<String, String>,
    pub report: GenerationReport,
}

pub fn generate(graph: &SchemaTypeGraph, options: &GenerateOptions) -> syn::Result<Generated> {
    let mut emitter = Emitter::new(graph);

    let types = emitter.emit_types();
    let enums = emitter.emit_enums();
    let operations = emitter.emit_operations(&options.client_name);
    let client_ident = type_ident(&options.client_name);
    let module = quote! {
        pub mod enums;
        pub mod operations;
        pub mod types;

        pub use operations::#client_ident;
    };

    let mut files = BTreeMap::new();
    files.insert("mod.rs".to_string(), format_file(module)?);
    files.insert("types.rs".to_string(), format_file(types)?);
    files.insert("enums.rs".to_string(), format_file(enums)?);
    files.insert("operations.rs".to_string(), format_file(operations)?);

    tracing::info!(
        files = files.len(),
        skipped = emitter.report.errors().len(),
        "generation finished"
    );

    Ok(Generated {
        files,
        report: emitter.report,
    })
}

fn format_file(tokens: TokenStream) -> syn::Result<String> {
    let file: syn::File = syn::parse2(tokens)?;
    Ok(format!("{}{}", HEADER, prettyplease::unparse(&file)))
}

struct Emitter<'g> {
    graph: &'g SchemaTypeGraph,
    resolver: TypeResolver<'g>,
    report: GenerationReport,
}

impl<'g> Emitter<'g> {
    fn new(graph: &'g SchemaTypeGraph) -> Self {
        Self {
            graph,
            resolver: TypeResolver::new(graph),
            report: GenerationReport::default(),
        }
    }

    // ── types.rs ────────────────────────────────────────────────────────────

    fn emit_types(&mut self) -> TokenStream {
        let records: Vec<TokenStream> = self
            .graph
            .records()
            .map(|ty| self.emit_record(ty))
            .collect();
        quote! {
            #(#records)*
        }
    }

    fn emit_record(&mut self, ty: &TypeDef) -> TokenStream {
        let ident = type_ident(&ty.name);
        let doc = doc_comment_tokens(&ty.description);

        let mut fields = Vec::new();
        let mut kept: Vec<&FieldDef> = Vec::new();
        for field in &ty.fields {
            let resolved = match self.resolver.resolve(&field.ty) {
                Ok(resolved) => resolved,
                Err(e) => {
                    self.report.record(&ty.name, &field.name, e);
                    continue;
                }
            };
            let field_ident = field_ident(&field.name);
            let rename = serde_rename(&field_ident, &field.name);
            let field_doc = doc_comment_tokens(&field.description);
            let rust_ty = rust_type(&field.ty, &resolved, true);
            fields.push(quote! {
                #field_doc
                #rename
                #[serde(default, skip_serializing_if = "::std::option::Option::is_none")]
                pub #field_ident: ::std::option::Option<#rust_ty>,
            });
            kept.push(field);
        }

        let arg_impl = if ty.kind == TypeKind::InputObject {
            emit_input_arg_impl(&ident, &kept)
        } else {
            TokenStream::new()
        };

        quote! {
            #doc
            #[derive(
                ::std::fmt::Debug,
                ::std::clone::Clone,
                ::std::default::Default,
                ::std::cmp::PartialEq,
                ::serde::Serialize,
                ::serde::Deserialize,
            )]
            pub struct #ident {
                #(#fields)*
            }

            #arg_impl
        }
    }

    // ── enums.rs ────────────────────────────────────────────────────────────

    fn emit_enums(&self) -> TokenStream {
        let enums: Vec<TokenStream> = self.graph.enums().map(emit_enum).collect();
        quote! {
            #(#enums)*
        }
    }

    // ── operations.rs ───────────────────────────────────────────────────────

    fn emit_operations(&mut self, client_name: &str) -> TokenStream {
        let client_ident = type_ident(client_name);
        let mut methods = Vec::new();
        for kind in [OperationKind::Query, OperationKind::Mutation] {
            let Some(root) = self.graph.root_name(kind).map(str::to_string) else {
                continue;
            };
            let Some(root_def) = self.graph.get(&root) else {
                continue;
            };
            let mut fields: Vec<&FieldDef> = root_def.fields.iter().collect();
            fields.sort_by(|a, b| a.name.cmp(&b.name));
            for field in fields {
                match self.emit_operation(kind, field) {
                    Ok(method) => methods.push(method),
                    Err((member, e)) => self.report.record(&root, &member, e),
                }
            }
        }

        quote! {
            /// Typed operations of the schema's root Query and Mutation types.
            #[derive(::std::fmt::Debug, ::std::clone::Clone)]
            pub struct #client_ident {
                client: ::gqlforge_sdk::Client,
            }

            impl #client_ident {
                pub fn new(client: ::gqlforge_sdk::Client) -> Self {
                    Self { client }
                }

                /// The underlying transport client.
                pub fn client(&self) -> &::gqlforge_sdk::Client {
                    &self.client
                }

                #(#methods)*
            }
        }
    }

    /// One `async fn` per root field. On failure returns the member name to
    /// report (the operation, or `operation(argument)`).
    fn emit_operation(
        &self,
        kind: OperationKind,
        field: &FieldDef,
    ) -> Result<TokenStream, (String, ResolveError)> {
        let mut params = Vec::new();
        let mut bindings = Vec::new();
        for arg in &field.arguments {
            let resolved = self
                .resolver
                .resolve(&arg.ty)
                .map_err(|e| (format!("{}({})", field.name, arg.name), e))?;
            let ident = field_ident(&arg.name);
            let rust_ty = rust_type(&arg.ty, &resolved, false);
            let param_ty = if arg.ty.is_non_null() {
                rust_ty
            } else {
                quote! { ::std::option::Option<#rust_ty> }
            };
            let wire_name = &arg.name;
            params.push(quote! { #ident: #param_ty });
            bindings.push(quote! { ::gqlforge_sdk::BoundArgument::new(#wire_name, #ident) });
        }

        let return_type = self
            .resolver
            .resolve(&field.ty)
            .map_err(|e| (field.name.clone(), e))?;
        let selection = FieldSelectionBuilder::new(self.resolver)
            .selection_for(&return_type)
            .map_err(|e| (field.name.clone(), e))?;
        tracing::debug!(operation = %field.name, %selection, "operation selection");

        let method = method_ident(&field.name);
        let doc = doc_comment_tokens(&field.description);
        let rust_return = rust_type(&field.ty, &return_type, false);
        let op_name = &field.name;
        let kind_tokens = match kind {
            OperationKind::Query => quote! { ::gqlforge_sdk::OperationKind::Query },
            OperationKind::Mutation => quote! { ::gqlforge_sdk::OperationKind::Mutation },
        };

        Ok(quote! {
            #doc
            pub async fn #method(
                &self,
                #(#params),*
            ) -> ::std::result::Result<
                ::std::option::Option<#rust_return>,
                ::gqlforge_sdk::ClientError,
            > {
                let document = ::gqlforge_sdk::operation::synthesize(
                    #kind_tokens,
                    #op_name,
                    &[#(#bindings),*],
                    #selection,
                );
                self.client.execute(&document, #op_name).await
            }
        })
    }
}

/// Operation methods share an impl block with `new` and `client`.
fn method_ident(name: &str) -> Ident {
    let ident = field_ident(name);
    if ident == "new" || ident == "client" {
        format_ident!("{}_", ident)
    } else {
        ident
    }
}

/// Rust type for a declared field or argument type. The declared reference
/// is walked next to its resolution so each list level keeps the
/// nullability of its elements: `[T]` is `Vec<Option<T>>`, `[T!]` is
/// `Vec<T>`. Composite types are boxed in record fields so cyclic types have
/// a finite size.
///
/// Every path is absolute. Generated files import nothing, so schema types
/// named `Result`, `Option` or `Client` cannot shadow what the code uses.
fn rust_type(reference: &TypeReference, resolved: &TypeDescriptor, boxed: bool) -> TokenStream {
    match (reference, resolved) {
        (TypeReference::NonNull(inner), _) => rust_type(inner, resolved, boxed),
        (TypeReference::List(element), TypeDescriptor::ListOf(resolved_element)) => {
            let inner = rust_type(element, resolved_element, false);
            if element.is_non_null() {
                quote! { ::std::vec::Vec<#inner> }
            } else {
                quote! { ::std::vec::Vec<::std::option::Option<#inner>> }
            }
        }
        _ => descriptor_type(resolved, boxed),
    }
}

fn descriptor_type(ty: &TypeDescriptor, boxed: bool) -> TokenStream {
    match ty {
        TypeDescriptor::Scalar(ScalarKind::Int) => quote! { i32 },
        TypeDescriptor::Scalar(ScalarKind::Float) => quote! { f64 },
        TypeDescriptor::Scalar(ScalarKind::String) => quote! { ::std::string::String },
        TypeDescriptor::Scalar(ScalarKind::Boolean) => quote! { bool },
        TypeDescriptor::Enum { name, .. } => {
            let ident = type_ident(name);
            quote! { super::enums::#ident }
        }
        // Without the declared reference nothing says the elements are
        // non-null.
        TypeDescriptor::ListOf(inner) => {
            let inner = descriptor_type(inner, false);
            quote! { ::std::vec::Vec<::std::option::Option<#inner>> }
        }
        TypeDescriptor::Named { name, .. } => {
            let ident = type_ident(name);
            if boxed {
                quote! { ::std::boxed::Box<super::types::#ident> }
            } else {
                quote! { super::types::#ident }
            }
        }
    }
}

fn emit_input_arg_impl(ident: &Ident, fields: &[&FieldDef]) -> TokenStream {
    let pushes: Vec<TokenStream> = fields
        .iter()
        .map(|field| {
            let field_ident = field_ident(&field.name);
            let wire_name = &field.name;
            quote! {
                if let ::std::option::Option::Some(value) =
                    ::gqlforge_sdk::IntoArgValue::into_arg_value(self.#field_ident)
                {
                    fields.push((::std::string::String::from(#wire_name), value));
                }
            }
        })
        .collect();

    quote! {
        impl ::gqlforge_sdk::IntoArgValue for #ident {
            fn into_arg_value(self) -> ::std::option::Option<::gqlforge_sdk::ArgValue> {
                #[allow(unused_mut)]
                let mut fields = ::std::vec::Vec::new();
                #(#pushes)*
                ::std::option::Option::Some(::gqlforge_sdk::ArgValue::Object(fields))
            }
        }
    }
}

fn emit_enum(ty: &TypeDef) -> TokenStream {
    let ident = type_ident(&ty.name);
    let doc = doc_comment_tokens(&ty.description);

    let variants: Vec<TokenStream> = ty
        .values
        .iter()
        .map(|value| {
            let variant = variant_ident(&value.name);
            let rename = serde_rename(&variant, &value.name);
            let value_doc = doc_comment_tokens(&value.description);
            quote! {
                #value_doc
                #rename
                #variant,
            }
        })
        .collect();
    let arms: Vec<TokenStream> = ty
        .values
        .iter()
        .map(|value| {
            let variant = variant_ident(&value.name);
            let wire_name = &value.name;
            quote! { Self::#variant => #wire_name, }
        })
        .collect();

    quote! {
        #doc
        #[derive(
            ::std::fmt::Debug,
            ::std::clone::Clone,
            ::std::marker::Copy,
            ::std::cmp::PartialEq,
            ::std::cmp::Eq,
            ::std::hash::Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        pub enum #ident {
            #(#variants)*
        }

        impl #ident {
            /// The value as written in the schema.
            pub fn as_str(&self) -> &'static str {
                match *self {
                    #(#arms)*
                }
            }
        }

        impl ::gqlforge_sdk::IntoArgValue for #ident {
            fn into_arg_value(self) -> ::std::option::Option<::gqlforge_sdk::ArgValue> {
                ::std::option::Option::Some(::gqlforge_sdk::ArgValue::Enum(
                    ::std::string::String::from(self.as_str()),
                ))
            }
        }
    }
}
