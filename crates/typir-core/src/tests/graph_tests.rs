use std::cell::RefCell;
use std::rc::Rc;

use crate::edge::RelationTag;
use crate::graph::{GraphListener, Preconditions};
use crate::ids::TypeId;
use crate::kinds::PrimitiveKind;
use crate::reference::TypeReference;
use crate::state::InitializationState;

use super::new_graph;

#[test]
fn duplicate_identifier_for_a_distinct_object_is_an_error() {
    let graph = new_graph();
    let int_ty = PrimitiveKind.get_or_create(&graph, "int");
    let other = graph.register_node(crate::kind::KindTag::Primitive, "int".to_string(), "int".to_string());
    assert!(graph.set_identifier(other, "int").is_err());
    // re-registering the same object under its own identifier is a no-op
    assert!(graph.set_identifier(int_ty, "int").is_ok());
}

#[test]
fn duplicate_edge_between_the_same_pair_is_an_error() {
    let graph = new_graph();
    let int_ty = PrimitiveKind.get_or_create(&graph, "int");
    let string_ty = PrimitiveKind.get_or_create(&graph, "string");
    graph.add_edge(int_ty, string_ty, RelationTag::SubType).unwrap();
    assert!(graph.add_edge(int_ty, string_ty, RelationTag::SubType).is_err());
}

#[test]
fn removing_an_absent_node_or_edge_is_an_error() {
    let graph = new_graph();
    assert!(graph.remove_node(TypeId(999)).is_err());
}

#[test]
fn removing_a_node_removes_its_incident_edges() {
    let graph = new_graph();
    let int_ty = PrimitiveKind.get_or_create(&graph, "int");
    let string_ty = PrimitiveKind.get_or_create(&graph, "string");
    let edge = graph.add_edge(int_ty, string_ty, RelationTag::SubType).unwrap();
    graph.remove_node(int_ty).unwrap();
    assert!(graph.with_edge(edge, |_| ()).is_none());
    assert_eq!(graph.outgoing(string_ty, RelationTag::SubType), Vec::new());
}

struct RecordingListener {
    added: RefCell<Vec<TypeId>>,
    removed: RefCell<Vec<TypeId>>,
}

impl GraphListener<super::Node> for RecordingListener {
    fn on_added_type(&self, _graph: &crate::graph::TypeGraph<super::Node>, id: TypeId) {
        self.added.borrow_mut().push(id);
    }
    fn on_removed_type(&self, _graph: &crate::graph::TypeGraph<super::Node>, id: TypeId) {
        self.removed.borrow_mut().push(id);
    }
}

#[test]
fn a_replaying_listener_sees_pre_existing_nodes_synchronously() {
    let graph = new_graph();
    let int_ty = PrimitiveKind.get_or_create(&graph, "int");

    let listener = Rc::new(RecordingListener {
        added: RefCell::new(Vec::new()),
        removed: RefCell::new(Vec::new()),
    });
    graph.add_listener(listener.clone(), true);
    assert_eq!(*listener.added.borrow(), vec![int_ty]);

    let string_ty = PrimitiveKind.get_or_create(&graph, "string");
    assert_eq!(*listener.added.borrow(), vec![int_ty, string_ty]);
}

#[test]
fn invalidating_a_type_cascades_to_dependents_watching_it() {
    let graph = new_graph();
    let base = PrimitiveKind.get_or_create(&graph, "int");
    let dependent = graph.register_node(crate::kind::KindTag::Primitive, "wrapper".to_string(), "wrapper".to_string());
    graph.define_initialization_process(
        dependent,
        Preconditions {
            refs_relevant_for_invalidation: vec![TypeReference::resolved(base)],
            ..Preconditions::default()
        },
    );
    graph.advance_pending(None);
    assert_eq!(graph.state(dependent), Some(InitializationState::Completed));

    graph.invalidate(base);
    graph.advance_pending(None);
    assert_eq!(graph.state(dependent), Some(InitializationState::Invalid));
}

#[test]
fn removing_a_listener_id_twice_is_a_no_op() {
    let graph = new_graph();
    let listener = Rc::new(RecordingListener {
        added: RefCell::new(Vec::new()),
        removed: RefCell::new(Vec::new()),
    });
    let id = graph.add_listener(listener, false);
    graph.remove_listener(id);
    graph.remove_listener(id);
}
