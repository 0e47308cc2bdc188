use crate::kinds::{ClassDetails, ClassKind};
use crate::relations::EqualityService;
use crate::selector::TypeSelector;

use super::{int_type, new_graph, string_type};

#[test]
fn equality_is_reflexive_for_every_kind() {
    let graph = new_graph();
    let equality = EqualityService::new();
    let int_ty = int_type(&graph);
    assert!(equality.are_equal(&graph, int_ty, int_ty));

    let class = ClassKind::new();
    let a = class.create(
        &graph,
        ClassDetails {
            class_name: "A".to_string(),
            fields: Vec::new(),
            methods: Vec::new(),
            super_classes: Vec::new(),
        },
    );
    assert!(equality.are_equal(&graph, a.type_id, a.type_id));
}

#[test]
fn distinct_primitives_are_not_equal() {
    let graph = new_graph();
    let equality = EqualityService::new();
    let int_ty = int_type(&graph);
    let string_ty = string_type(&graph);
    assert!(!equality.are_equal(&graph, int_ty, string_ty));
    assert!(equality.get_problem(&graph, int_ty, string_ty).is_some());
}

#[test]
fn distinct_classes_are_never_equal_even_with_the_same_shape() {
    let graph = new_graph();
    let equality = EqualityService::new();
    let class = ClassKind::new();
    let a = class.create(
        &graph,
        ClassDetails {
            class_name: "A".to_string(),
            fields: Vec::new(),
            methods: Vec::new(),
            super_classes: Vec::new(),
        },
    );
    let b = class.create(
        &graph,
        ClassDetails {
            class_name: "B".to_string(),
            fields: Vec::new(),
            methods: Vec::new(),
            super_classes: Vec::new(),
        },
    );
    assert!(!equality.are_equal(&graph, a.type_id, b.type_id));
}

/// Mutually self-referential classes compare equal to themselves even
/// while the comparison that discovers this is still recursing through
/// their field types (spec §4.5 "PENDING behaves as equal for now").
#[test]
fn equality_terminates_through_self_referential_fields() {
    let graph = new_graph();
    let equality = EqualityService::new();
    let class = ClassKind::new();
    let node = class.create(
        &graph,
        ClassDetails {
            class_name: "Node".to_string(),
            fields: vec![("next".to_string(), TypeSelector::Identifier("Node".to_string()))],
            methods: Vec::new(),
            super_classes: Vec::new(),
        },
    );
    assert!(equality.are_equal(&graph, node.type_id, node.type_id));
}

#[test]
fn equality_cache_len_grows_with_distinct_comparisons() {
    let graph = new_graph();
    let equality = EqualityService::new();
    let int_ty = int_type(&graph);
    let string_ty = string_type(&graph);
    assert_eq!(equality.equality_cache_len(&graph), 0);
    equality.are_equal(&graph, int_ty, string_ty);
    assert_eq!(equality.equality_cache_len(&graph), 1);
    // re-asking the same pair must not grow the cache further
    equality.are_equal(&graph, int_ty, string_ty);
    assert_eq!(equality.equality_cache_len(&graph), 1);
}
