//! End-to-end coverage of spec §8's worked scenarios through the
//! assembled `Engine`, exercising cyclic class resolution, inheritance
//! cycle diagnostics, duplicate declarations, assignability via
//! sub-typing, operator overload dispatch and implicit conversion.

use std::rc::Rc;

use crate::engine::Engine;
use typir_core::kinds::ClassDetails;
use typir_core::node::FunctionOptions;
use typir_core::{ConversionMode, KindTag, TypeSelector};
use typir_inference::{build_overloads, FlatLanguageService, OperatorRule, OperatorSignature};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Node {
    Call(Rc<Node>, Rc<Node>),
    Leaf(u32),
}

fn flat_language() -> Rc<FlatLanguageService<fn(&Node) -> String>> {
    fn key(_: &Node) -> String {
        "node".to_string()
    }
    Rc::new(FlatLanguageService::new(key as fn(&Node) -> String))
}

fn new_engine() -> Engine<Node> {
    Engine::builder(flat_language()).build()
}

/// Scenario 1: `class Node { children: Node }` — self-recursive field,
/// one type, Completed, zero problems.
#[test]
fn self_recursive_class_completes() {
    let mut engine = new_engine();
    let class = engine.register_class();

    let node_id = engine.create_class(
        class,
        ClassDetails {
            class_name: "Node".to_string(),
            fields: vec![("children".to_string(), TypeSelector::Identifier("Node".to_string()))],
            methods: Vec::new(),
            super_classes: Vec::new(),
        },
    );
    assert!(node_id.duplicate.is_none());
    assert_eq!(engine.graph.all_registered_types().len(), 1);
    assert_eq!(engine.graph.state(node_id.type_id), Some(typir_core::InitializationState::Completed));
}

/// Scenario 2: `class A { p: B } class B { p: A }` — mutual recursion,
/// both Completed, no problems.
#[test]
fn mutually_recursive_classes_both_complete() {
    let mut engine = new_engine();
    let class = engine.register_class();

    let a = engine.create_class(
        class,
        ClassDetails {
            class_name: "A".to_string(),
            fields: vec![("p".to_string(), TypeSelector::Identifier("B".to_string()))],
            methods: Vec::new(),
            super_classes: Vec::new(),
        },
    );
    let b = engine.create_class(
        class,
        ClassDetails {
            class_name: "B".to_string(),
            fields: vec![("p".to_string(), TypeSelector::Identifier("A".to_string()))],
            methods: Vec::new(),
            super_classes: Vec::new(),
        },
    );

    assert!(a.duplicate.is_none());
    assert!(b.duplicate.is_none());
    assert_eq!(engine.graph.state(a.type_id), Some(typir_core::InitializationState::Completed));
    assert_eq!(engine.graph.state(b.type_id), Some(typir_core::InitializationState::Completed));
}

/// Scenario 3: `class A < B class B < A` — a two-cycle, one diagnostic
/// per participant.
#[test]
fn inheritance_cycle_is_diagnosed_for_every_participant() {
    let mut engine = new_engine();
    let class = engine.register_class();

    let a = engine.create_class(
        class,
        ClassDetails {
            class_name: "A".to_string(),
            fields: Vec::new(),
            methods: Vec::new(),
            super_classes: vec![TypeSelector::Identifier("B".to_string())],
        },
    );
    let b = engine.create_class(
        class,
        ClassDetails {
            class_name: "B".to_string(),
            fields: Vec::new(),
            methods: Vec::new(),
            super_classes: vec![TypeSelector::Identifier("A".to_string())],
        },
    );

    let cycle_participants = typir_core::kinds::class::find_inheritance_cycles(&engine.graph, &[a.type_id, b.type_id]);
    assert_eq!(cycle_participants.len(), 2);
    assert!(cycle_participants.contains(&a.type_id));
    assert!(cycle_participants.contains(&b.type_id));
}

/// Scenario 4: two identical declarations of `class A {}` — one type,
/// two duplicate diagnostics.
#[test]
fn duplicate_class_declarations_share_one_type_with_two_diagnostics() {
    let mut engine = new_engine();
    let class = engine.register_class();

    let details = || ClassDetails {
        class_name: "A".to_string(),
        fields: Vec::new(),
        methods: Vec::new(),
        super_classes: Vec::new(),
    };

    let first = engine.create_class(class, details());
    let second = engine.create_class(class, details());

    assert_eq!(first.type_id, second.type_id);
    assert!(first.duplicate.is_none());
    assert!(second.duplicate.is_some());
    assert_eq!(
        engine
            .graph
            .all_registered_types()
            .iter()
            .filter(|id| engine.graph.kind_tag(**id) == Some(KindTag::Class))
            .count(),
        1
    );
}

/// Scenario 5: `C2 < C1`, `v: C1 = C2()` — assignable via sub-typing.
#[test]
fn subclass_instance_is_assignable_to_superclass_variable() {
    let mut engine = new_engine();
    let class = engine.register_class();

    let c1 = engine.create_class(
        class,
        ClassDetails {
            class_name: "C1".to_string(),
            fields: Vec::new(),
            methods: Vec::new(),
            super_classes: Vec::new(),
        },
    );
    let c2 = engine.create_class(
        class,
        ClassDetails {
            class_name: "C2".to_string(),
            fields: Vec::new(),
            methods: Vec::new(),
            super_classes: vec![TypeSelector::Type(c1.type_id)],
        },
    );

    engine.subtype.mark_as_subtype(&engine.graph, c2.type_id, c1.type_id, true).unwrap();
    assert!(engine.is_assignable(c2.type_id, c1.type_id));
}

/// Scenario 6: overloaded `+`, `1+2 -> int`, `"a"+"b" -> string`,
/// `1+"a"` matches neither overload.
#[test]
fn operator_overload_dispatches_by_operand_types() {
    let mut engine = new_engine();
    let primitive = engine.register_primitive();
    let function = engine.register_function(FunctionOptions::default());

    let int_ty = primitive.get_or_create(&engine.graph, "int");
    let string_ty = primitive.get_or_create(&engine.graph, "string");

    let overloads = build_overloads(
        &engine.graph,
        &function,
        "+",
        &[
            OperatorSignature { operand_types: vec![int_ty, int_ty], return_type: int_ty },
            OperatorSignature { operand_types: vec![string_ty, string_ty], return_type: string_ty },
        ],
    );

    let plus_rule = OperatorRule::new(
        "+",
        overloads,
        Rc::new(|node: &Node| match node {
            Node::Call(l, r) => Some(vec![(**l).clone(), (**r).clone()]),
            Node::Leaf(_) => None,
        }),
        Rc::clone(&engine.graph),
        Rc::clone(&engine.assignability),
        Rc::clone(&engine.equality),
        Rc::clone(&engine.subtype),
        Rc::clone(&engine.conversion),
    );
    engine.inference.add_rule(Rc::new(IntOrStringLeaf { int: int_ty, string: string_ty }));
    engine.inference.add_rule(Rc::new(plus_rule));

    let one = Rc::new(Node::Leaf(1));
    let two = Rc::new(Node::Leaf(2));
    let a = Rc::new(Node::Leaf(100));
    let b = Rc::new(Node::Leaf(101));

    let int_call = Node::Call(one, two);
    assert_eq!(engine.infer_type(&int_call).unwrap().unwrap(), int_ty);

    let string_call = Node::Call(a, b);
    assert_eq!(engine.infer_type(&string_call).unwrap().unwrap(), string_ty);

    let mixed = Node::Call(Rc::new(Node::Leaf(1)), Rc::new(Node::Leaf(101)));
    assert!(engine.infer_type(&mixed).unwrap().is_err());

    // leaves 1,2 are treated as int and 100,101 as string by the fixture
    // rule below; the mixed case pairs an int leaf with a string leaf.
    struct IntOrStringLeaf {
        int: typir_core::TypeId,
        string: typir_core::TypeId,
    }
    impl typir_inference::InferenceRule<Node> for IntOrStringLeaf {
        fn infer_without_children(&self, node: &Node) -> typir_inference::StepResult<Node> {
            match node {
                Node::Leaf(n) if *n < 100 => typir_inference::StepResult::Type(self.int),
                Node::Leaf(_) => typir_inference::StepResult::Type(self.string),
                Node::Call(..) => typir_inference::StepResult::NotApplicable,
            }
        }
    }
}

/// Scenario 8: implicit `int -> string` conversion makes `assignable(int,
/// string)` true and `assignable(string, int)` stays false.
#[test]
fn implicit_conversion_is_one_directional() {
    let mut engine = new_engine();
    let primitive = engine.register_primitive();
    let int_ty = primitive.get_or_create(&engine.graph, "int");
    let string_ty = primitive.get_or_create(&engine.graph, "string");

    engine.conversion.mark_as_convertible(&engine.graph, int_ty, string_ty, ConversionMode::Implicit);

    assert!(engine.is_assignable(int_ty, string_ty));
    assert!(!engine.is_assignable(string_ty, int_ty));
}
