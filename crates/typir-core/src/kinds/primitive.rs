//! The `Primitive` kind (spec §4.4.1): a bare name, equal and sub-type
//! iff the names match.

use crate::graph::{Preconditions, TypeGraph};
use crate::ids::TypeId;
use crate::kind::KindTag;
use crate::node::{KindData, PrimitiveData};

/// Stateless factory for primitive types (`int`, `string`, `boolean`, ...).
#[derive(Default, Clone, Copy)]
pub struct PrimitiveKind;

impl PrimitiveKind {
    pub fn new() -> Self {
        Self
    }

    pub fn identifier_of(&self, name: &str) -> String {
        name.to_string()
    }

    /// Idempotent in identifier: a second `create` with the same name
    /// returns the already-registered type rather than a new node, since
    /// primitive identity is purely structural (unlike `Class`, where a
    /// same-name re-declaration is a user error to be diagnosed).
    pub fn create<N: Clone>(&self, graph: &TypeGraph<N>, name: &str) -> TypeId {
        self.get_or_create(graph, name)
    }

    pub fn get_or_create<N: Clone>(&self, graph: &TypeGraph<N>, name: &str) -> TypeId {
        let identifier = self.identifier_of(name);
        if let Some(existing) = graph.get_by_identifier(&identifier) {
            return existing;
        }
        let id = graph.register_node(KindTag::Primitive, name.to_string(), name.to_string());
        graph.set_kind_data(
            id,
            KindData::Primitive(PrimitiveData {
                name: name.to_string(),
            }),
        );
        graph
            .set_identifier(id, &identifier)
            .expect("fresh primitive node cannot collide, checked above");
        graph.define_initialization_process(id, Preconditions::default());
        graph.advance_pending(None);
        id
    }
}

/// Structural equality/sub-typing analyzer used by the equality/sub-type
/// services (spec §4.4.1 "Equality and sub-typing are by name").
pub fn names_equal<N>(graph: &TypeGraph<N>, a: TypeId, b: TypeId) -> bool {
    let data_a = graph.kind_data(a);
    let data_b = graph.kind_data(b);
    match (
        data_a.as_deref().and_then(KindData::as_primitive),
        data_b.as_deref().and_then(KindData::as_primitive),
    ) {
        (Some(pa), Some(pb)) => pa.name == pb.name,
        _ => false,
    }
}
