use crate::kinds::{ClassDetails, ClassKind};
use crate::relations::{EqualityService, SubTypeService};
use crate::selector::TypeSelector;

use super::{int_type, new_graph};

#[test]
fn subtype_is_reflexive() {
    let graph = new_graph();
    let equality = EqualityService::new();
    let subtype = SubTypeService::new();
    let int_ty = int_type(&graph);
    assert!(subtype.is_subtype(&graph, int_ty, int_ty, &equality));
}

#[test]
fn declared_inheritance_is_transitive() {
    let graph = new_graph();
    let equality = EqualityService::new();
    let subtype = SubTypeService::new();
    let class = ClassKind::new();

    let a = class.create(&graph, empty("A"));
    let b = class.create(
        &graph,
        ClassDetails {
            class_name: "B".to_string(),
            fields: Vec::new(),
            methods: Vec::new(),
            super_classes: vec![TypeSelector::Type(a.type_id)],
        },
    );
    let c = class.create(
        &graph,
        ClassDetails {
            class_name: "C".to_string(),
            fields: Vec::new(),
            methods: Vec::new(),
            super_classes: vec![TypeSelector::Type(b.type_id)],
        },
    );

    assert!(subtype.is_subtype(&graph, c.type_id, a.type_id, &equality));
}

#[test]
fn marking_a_cycle_with_cycle_checking_is_rejected() {
    let graph = new_graph();
    let subtype = SubTypeService::new();
    let class = ClassKind::new();
    let a = class.create(&graph, empty("A"));
    let b = class.create(&graph, empty("B"));

    subtype.mark_as_subtype(&graph, b.type_id, a.type_id, true).unwrap();
    assert!(subtype.mark_as_subtype(&graph, a.type_id, b.type_id, true).is_err());
}

#[test]
fn unchecked_marking_permits_what_checked_marking_would_reject() {
    let graph = new_graph();
    let subtype = SubTypeService::new();
    let class = ClassKind::new();
    let a = class.create(&graph, empty("A"));
    let b = class.create(&graph, empty("B"));

    subtype.mark_as_subtype_unchecked(&graph, b.type_id, a.type_id).unwrap();
    // The `Top`/`Bottom` bulk-marking path (spec §4.4.6) deliberately
    // skips the cycle search that `mark_as_subtype` runs.
    subtype.mark_as_subtype_unchecked(&graph, a.type_id, b.type_id).unwrap();
}

#[test]
fn subtype_cache_len_grows_with_distinct_queries() {
    let graph = new_graph();
    let equality = EqualityService::new();
    let subtype = SubTypeService::new();
    let class = ClassKind::new();
    let a = class.create(&graph, empty("A"));
    let b = class.create(&graph, empty("B"));

    assert_eq!(subtype.subtype_cache_len(&graph), 0);
    subtype.is_subtype(&graph, b.type_id, a.type_id, &equality);
    assert_eq!(subtype.subtype_cache_len(&graph), 1);
}

#[test]
fn a_cached_non_subtype_edge_is_not_walked_as_a_phantom_link() {
    let graph = new_graph();
    let equality = EqualityService::new();
    let subtype = SubTypeService::new();
    let class = ClassKind::new();

    let a = class.create(&graph, empty("A"));
    let b = class.create(
        &graph,
        ClassDetails {
            class_name: "B".to_string(),
            fields: Vec::new(),
            methods: Vec::new(),
            super_classes: vec![TypeSelector::Type(a.type_id)],
        },
    );
    let c = class.create(&graph, empty("C"));

    // Caches a `NoLink` `C -> B` edge.
    assert!(!subtype.is_subtype(&graph, c.type_id, b.type_id, &equality));
    // The cached `NoLink` edge must not be treated as a real `C -> B`
    // link when walking `B -> A` for reachability.
    assert!(!subtype.is_subtype(&graph, c.type_id, a.type_id, &equality));
}

#[test]
fn marking_upgrades_a_previously_cached_non_subtype_edge() {
    let graph = new_graph();
    let equality = EqualityService::new();
    let subtype = SubTypeService::new();
    let class = ClassKind::new();

    let c1 = class.create(&graph, empty("C1"));
    let c2 = class.create(&graph, empty("C2"));

    // Caches a `NoLink` `C2 -> C1` edge before the inheritance is declared.
    assert!(!subtype.is_subtype(&graph, c2.type_id, c1.type_id, &equality));
    subtype.mark_as_subtype(&graph, c2.type_id, c1.type_id, true).unwrap();
    assert!(subtype.is_subtype(&graph, c2.type_id, c1.type_id, &equality));
}

fn empty(name: &str) -> ClassDetails<super::Node> {
    ClassDetails {
        class_name: name.to_string(),
        fields: Vec::new(),
        methods: Vec::new(),
        super_classes: Vec::new(),
    }
}
