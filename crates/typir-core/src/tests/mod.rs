//! In-crate coverage of the type graph, the seven kinds and the four
//! relation services, independent of any inference layer.

use crate::graph::TypeGraph;
use crate::ids::TypeId;
use crate::kinds::PrimitiveKind;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(super) enum Node {
    Opaque,
}

pub(super) fn new_graph() -> TypeGraph<Node> {
    TypeGraph::new()
}

pub(super) fn int_type(graph: &TypeGraph<Node>) -> TypeId {
    PrimitiveKind.get_or_create(graph, "int")
}

pub(super) fn string_type(graph: &TypeGraph<Node>) -> TypeId {
    PrimitiveKind.get_or_create(graph, "string")
}

mod class_tests;
mod equality_tests;
mod fixed_parameter_tests;
mod graph_tests;
mod subtype_tests;
