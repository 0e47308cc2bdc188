use crate::kinds::{FixedParameterDetails, FixedParameterKind};
use crate::node::FixedParameterStrategy;
use crate::relations::EqualityService;
use crate::selector::TypeSelector;

use super::{int_type, new_graph, string_type};

fn make_map(graph: &crate::graph::TypeGraph<super::Node>, kind: &FixedParameterKind, key: crate::ids::TypeId, value: crate::ids::TypeId) -> crate::ids::TypeId {
    kind.get_or_create(
        graph,
        FixedParameterDetails {
            base_name: "Map".to_string(),
            parameters: vec![TypeSelector::Type(key), TypeSelector::Type(value)],
        },
        &[key, value],
    )
}

/// Spec §8 scenario 7: `Map<string, Person>` built twice via
/// `getOrCreate` returns the same object.
#[test]
fn get_or_create_returns_the_same_type_for_the_same_parameters() {
    let graph = new_graph();
    let kind = FixedParameterKind::new("Map", FixedParameterStrategy::Equal);
    let string_ty = string_type(&graph);
    let int_ty = int_type(&graph);

    let m1 = make_map(&graph, &kind, string_ty, int_ty);
    let m2 = make_map(&graph, &kind, string_ty, int_ty);
    assert_eq!(m1, m2);
    assert_eq!(graph.all_registered_types().iter().filter(|id| graph.kind_tag(**id) == Some(crate::kind::KindTag::FixedParameter)).count(), 1);
}

/// `Map<string, Person>` vs `Map<string, Animal>` are distinct, and the
/// equality analyzer reports an `IndexedTypeConflict` at position 1.
#[test]
fn differing_type_parameter_is_reported_at_its_index() {
    let graph = new_graph();
    let equality = EqualityService::new();
    let kind = FixedParameterKind::new("Map", FixedParameterStrategy::Equal);
    let string_ty = string_type(&graph);
    let int_ty = int_type(&graph);

    let m1 = make_map(&graph, &kind, string_ty, string_ty);
    let m2 = make_map(&graph, &kind, string_ty, int_ty);

    assert_ne!(m1, m2);
    let problem = equality.get_problem(&graph, m1, m2).expect("expected a conflict");
    match problem {
        typir_common::Problem::TypeEqualityProblem { sub_problems, .. } => {
            assert_eq!(sub_problems.len(), 1);
            match &sub_problems[0] {
                typir_common::Problem::IndexedTypeConflict { property_index, .. } => {
                    assert_eq!(*property_index, Some(1));
                }
                other => panic!("expected an IndexedTypeConflict, got {other:?}"),
            }
        }
        other => panic!("expected a TypeEqualityProblem, got {other:?}"),
    }
}

#[test]
fn a_different_base_name_is_never_equal_even_with_the_same_parameters() {
    let graph = new_graph();
    let equality = EqualityService::new();
    let map_kind = FixedParameterKind::new("Map", FixedParameterStrategy::Equal);
    let list_kind = FixedParameterKind::new("List", FixedParameterStrategy::Equal);
    let int_ty = int_type(&graph);

    let map = map_kind.create(
        &graph,
        FixedParameterDetails { base_name: "Map".to_string(), parameters: vec![TypeSelector::Type(int_ty)] },
    );
    let list = list_kind.create(
        &graph,
        FixedParameterDetails { base_name: "List".to_string(), parameters: vec![TypeSelector::Type(int_ty)] },
    );

    assert!(!equality.are_equal(&graph, map, list));
}
