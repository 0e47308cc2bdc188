mod collector_tests;
mod operator_tests;

use std::rc::Rc;
use typir_core::kinds::PrimitiveKind;
use typir_core::TypeGraph;

/// A minimal host AST for these tests. Recursive value types are unusual
/// as hash-map keys, but this port's `InferenceCollector` is generic over
/// whatever cheap, comparable handle a real host hands it (an arena index
/// in practice); a small value enum is the simplest stand-in here.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Expr {
    Int(i64),
    Str(String),
    Add(Rc<Expr>, Rc<Expr>),
    Paren(Rc<Expr>),
}

pub(crate) fn new_graph() -> Rc<TypeGraph<Expr>> {
    Rc::new(TypeGraph::new())
}

pub(crate) fn int_type(graph: &TypeGraph<Expr>) -> typir_core::TypeId {
    PrimitiveKind.get_or_create(graph, "int")
}

pub(crate) fn string_type(graph: &TypeGraph<Expr>) -> typir_core::TypeId {
    PrimitiveKind.get_or_create(graph, "string")
}
