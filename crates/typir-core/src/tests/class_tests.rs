use crate::kind::KindTag;
use crate::kinds::{class, ClassDetails, ClassKind};
use crate::selector::TypeSelector;
use crate::state::InitializationState;

use super::{new_graph, Node};

fn empty(name: &str) -> ClassDetails<Node> {
    ClassDetails {
        class_name: name.to_string(),
        fields: Vec::new(),
        methods: Vec::new(),
        super_classes: Vec::new(),
    }
}

#[test]
fn self_recursive_field_still_completes() {
    let graph = new_graph();
    let kind = ClassKind::new();
    let result = kind.create(
        &graph,
        ClassDetails {
            class_name: "Node".to_string(),
            fields: vec![("children".to_string(), TypeSelector::Identifier("Node".to_string()))],
            methods: Vec::new(),
            super_classes: Vec::new(),
        },
    );
    assert!(result.duplicate.is_none());
    assert_eq!(graph.state(result.type_id), Some(InitializationState::Completed));
}

#[test]
fn mutually_recursive_fields_both_complete() {
    let graph = new_graph();
    let kind = ClassKind::new();
    let a = kind.create(
        &graph,
        ClassDetails {
            class_name: "A".to_string(),
            fields: vec![("p".to_string(), TypeSelector::Identifier("B".to_string()))],
            methods: Vec::new(),
            super_classes: Vec::new(),
        },
    );
    let b = kind.create(
        &graph,
        ClassDetails {
            class_name: "B".to_string(),
            fields: vec![("p".to_string(), TypeSelector::Identifier("A".to_string()))],
            methods: Vec::new(),
            super_classes: Vec::new(),
        },
    );
    assert_eq!(graph.state(a.type_id), Some(InitializationState::Completed));
    assert_eq!(graph.state(b.type_id), Some(InitializationState::Completed));
}

#[test]
fn redeclaring_a_class_name_keeps_one_type_and_flags_the_second() {
    let graph = new_graph();
    let kind = ClassKind::new();
    let first = kind.create(&graph, empty("A"));
    let second = kind.create(&graph, empty("A"));

    assert_eq!(first.type_id, second.type_id);
    assert!(first.duplicate.is_none());
    assert!(second.duplicate.is_some());
    assert_eq!(graph.all_registered_types().iter().filter(|id| graph.kind_tag(**id) == Some(KindTag::Class)).count(), 1);
}

#[test]
fn a_two_class_inheritance_cycle_flags_both_participants() {
    let graph = new_graph();
    let kind = ClassKind::new();
    let a = kind.create(
        &graph,
        ClassDetails {
            class_name: "A".to_string(),
            fields: Vec::new(),
            methods: Vec::new(),
            super_classes: vec![TypeSelector::Identifier("B".to_string())],
        },
    );
    let b = kind.create(
        &graph,
        ClassDetails {
            class_name: "B".to_string(),
            fields: Vec::new(),
            methods: Vec::new(),
            super_classes: vec![TypeSelector::Identifier("A".to_string())],
        },
    );

    let cyclic = class::find_inheritance_cycles(&graph, &[a.type_id, b.type_id]);
    assert_eq!(cyclic.len(), 2);
    assert!(cyclic.contains(&a.type_id));
    assert!(cyclic.contains(&b.type_id));
}

#[test]
fn a_non_cyclic_hierarchy_reports_no_participants() {
    let graph = new_graph();
    let kind = ClassKind::new();
    let base = kind.create(&graph, empty("Base"));
    let derived = kind.create(
        &graph,
        ClassDetails {
            class_name: "Derived".to_string(),
            fields: Vec::new(),
            methods: Vec::new(),
            super_classes: vec![TypeSelector::Type(base.type_id)],
        },
    );

    let cyclic = class::find_inheritance_cycles(&graph, &[base.type_id, derived.type_id]);
    assert!(cyclic.is_empty());
}

#[test]
fn classes_are_equal_only_by_identity() {
    let graph = new_graph();
    let kind = ClassKind::new();
    let a = kind.create(&graph, empty("A"));
    let also_a = kind.create(&graph, empty("A"));
    assert!(class::analyze_equality(&graph, a.type_id, also_a.type_id).is_none());

    let b = kind.create(&graph, empty("B"));
    assert!(class::analyze_equality(&graph, a.type_id, b.type_id).is_some());
}
