//! Field selection sets for composite return types.
//!
//! The selection for `User` with `id name team { id }` is the text that goes
//! between the braces after the operation field. Cycles in the type graph are
//! cut by remembering which composite names are open on the current path: a
//! field whose type is already open is emitted as a bare name.

use crate::error::ResolveError;
use crate::resolver::TypeResolver;
use crate::types::TypeDescriptor;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy)]
pub struct FieldSelectionBuilder<'g> {
    resolver: TypeResolver<'g>,
}

impl<'g> FieldSelectionBuilder<'g> {
    pub fn new(resolver: TypeResolver<'g>) -> Self {
        Self { resolver }
    }

    /// Selection for a return type. The type itself counts as visited.
    ///
    /// Leaf types (scalars, enums and lists of them) have no selection and
    /// yield an empty string.
    pub fn selection_for(&self, ty: &TypeDescriptor) -> Result<String, ResolveError> {
        let mut visiting = BTreeSet::new();
        if let TypeDescriptor::Named { name, .. } = ty.element() {
            visiting.insert(name.clone());
        }
        self.build_selection(ty, &mut visiting)
    }

    /// Space-separated fields of `ty`, descending into composite fields whose
    /// type is not in `visiting`. `visiting` is restored before returning.
    pub fn build_selection(
        &self,
        ty: &TypeDescriptor,
        visiting: &mut BTreeSet<String>,
    ) -> Result<String, ResolveError> {
        let TypeDescriptor::Named { fields, .. } = ty.element() else {
            return Ok(String::new());
        };

        let mut parts = Vec::with_capacity(fields.len());
        for field in fields {
            let resolved = self.resolver.resolve(&field.ty)?;
            match resolved.element() {
                TypeDescriptor::Named { name, .. } if !visiting.contains(name) => {
                    visiting.insert(name.clone());
                    let nested = self.build_selection(&resolved, visiting);
                    visiting.remove(name);
                    parts.push(format!("{} {{ {} }}", field.name, nested?));
                }
                _ => parts.push(field.name.clone()),
            }
        }
        Ok(parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SchemaTypeGraph;
    use crate::types::TypeReference;
    use pretty_assertions::assert_eq;

    fn selection(schema: &str, root: &str) -> Result<String, ResolveError> {
        let graph = SchemaTypeGraph::parse(schema);
        let resolver = TypeResolver::new(&graph);
        let ty = resolver.resolve(&TypeReference::named(root))?;
        FieldSelectionBuilder::new(resolver).selection_for(&ty)
    }

    #[test]
    fn flat_scalars() {
        let text = selection("type User { id: ID! name: String age: Int }", "User").unwrap();
        assert_eq!(text, "id name age");
    }

    #[test]
    fn nested_composite_and_enum() {
        let text = selection(
            r#"
            enum Role { ADMIN MEMBER }
            type Team { id: ID! name: String }
            type User { id: ID! role: Role team: Team! }
            "#,
            "User",
        )
        .unwrap();
        assert_eq!(text, "id role team { id name }");
    }

    #[test]
    fn lists_add_no_nesting() {
        let text = selection(
            r#"
            type Tag { label: String }
            type Post { tags: [[Tag!]]! scores: [Int] }
            "#,
            "Post",
        )
        .unwrap();
        assert_eq!(text, "tags { label } scores");
    }

    #[test]
    fn three_type_cycle_terminates() {
        let text = selection(
            r#"
            type A { id: ID b: B }
            type B { c: C }
            type C { a: A }
            "#,
            "A",
        )
        .unwrap();
        assert_eq!(text, "id b { c { a } }");
    }

    #[test]
    fn self_reference_is_a_leaf() {
        let text = selection("type Node { id: ID! parent: Node children: [Node] }", "Node").unwrap();
        assert_eq!(text, "id parent children");
    }

    #[test]
    fn connection_edge_cycle() {
        let text = selection(
            r#"
            type PageInfo { hasNextPage: Boolean! }
            type Vehicle { id: ID! images: VehicleImageConnection }
            type VehicleImage { url: String vehicle: Vehicle }
            type VehicleImageEdge { node: VehicleImage cursor: String! }
            type VehicleImageConnection { pageInfo: PageInfo! edges: [VehicleImageEdge]! }
            "#,
            "Vehicle",
        )
        .unwrap();
        assert_eq!(
            text,
            "id images { pageInfo { hasNextPage } edges { node { url vehicle } cursor } }"
        );
    }

    #[test]
    fn siblings_may_revisit_the_same_type() {
        let text = selection(
            r#"
            type Money { amount: Float }
            type Order { subtotal: Money total: Money }
            "#,
            "Order",
        )
        .unwrap();
        assert_eq!(text, "subtotal { amount } total { amount }");
    }

    #[test]
    fn empty_composite_field_has_empty_body() {
        let text = selection("type Empty\ntype Holder { id: ID empty: Empty }", "Holder").unwrap();
        assert_eq!(text, "id empty {  }");
    }

    #[test]
    fn leaf_return_type_has_no_selection() {
        assert_eq!(selection("scalar X", "Boolean").unwrap(), "");
    }

    #[test]
    fn list_return_type_selects_element_fields() {
        let graph = SchemaTypeGraph::parse("type User { id: ID! }");
        let resolver = TypeResolver::new(&graph);
        let ty = resolver
            .resolve(&TypeReference::list(TypeReference::named("User")))
            .unwrap();
        let text = FieldSelectionBuilder::new(resolver).selection_for(&ty).unwrap();
        assert_eq!(text, "id");
    }

    #[test]
    fn unresolvable_field_fails_the_selection() {
        let err = selection("type User { id: ID! ghost: Ghost }", "User").unwrap_err();
        assert_eq!(err, ResolveError::Unresolvable("Ghost".to_string()));
    }

    #[test]
    fn visiting_is_restored() {
        let graph = SchemaTypeGraph::parse("type A { b: B } type B { x: Int }");
        let resolver = TypeResolver::new(&graph);
        let ty = resolver.resolve(&TypeReference::named("A")).unwrap();
        let mut visiting = BTreeSet::from(["A".to_string()]);
        FieldSelectionBuilder::new(resolver)
            .build_selection(&ty, &mut visiting)
            .unwrap();
        assert_eq!(visiting, BTreeSet::from(["A".to_string()]));
    }
}
