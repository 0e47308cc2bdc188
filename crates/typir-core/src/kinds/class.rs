//! The `Class` kind (spec §4.4.3): nominal classes with fields, methods
//! and (possibly cyclic) direct super-types.

use crate::error::TypirError;
use crate::graph::{Preconditions, TypeGraph};
use crate::ids::TypeId;
use crate::kind::{CoreProblem, KindTag, TypeSummary};
use crate::node::{ClassData, KindData};
use crate::reference::TypeReference;
use crate::selector::TypeSelector;
use std::rc::Rc;
use typir_common::{Problem, Severity};

pub struct ClassDetails<N> {
    pub class_name: String,
    pub fields: Vec<(String, TypeSelector<N>)>,
    pub methods: Vec<(String, TypeSelector<N>)>,
    pub super_classes: Vec<TypeSelector<N>>,
}

/// The outcome of declaring a class (spec §4.4.3 "Unique declared
/// names"): the canonical `TypeId` for this name, plus a validation
/// problem when this declaration was a duplicate.
pub struct ClassCreateResult {
    pub type_id: TypeId,
    pub duplicate: Option<CoreProblem>,
}

#[derive(Default, Clone, Copy)]
pub struct ClassKind;

impl ClassKind {
    pub fn new() -> Self {
        Self
    }

    pub fn identifier_of(&self, class_name: &str) -> String {
        class_name.to_string()
    }

    /// Looks up an already-registered class by name without creating a
    /// new one and without emitting a duplicate diagnostic; used to
    /// resolve forward references (`TypeSelector::Identifier`) rather than
    /// to declare a class.
    pub fn get_or_create<N: Clone>(&self, graph: &TypeGraph<N>, class_name: &str) -> Option<TypeId> {
        graph.get_by_identifier(&self.identifier_of(class_name))
    }

    /// Declares a class (spec §4.4.3). If `class_name` is already
    /// registered, no new type is created; the pre-existing `TypeId` is
    /// returned together with the "Declared classes need to be unique"
    /// diagnostic -- one diagnostic is produced per *redundant*
    /// declaration, while exactly one class type ever exists for that
    /// name (spec §8 scenario 4).
    pub fn create<N: Clone + 'static>(&self, graph: &TypeGraph<N>, details: ClassDetails<N>) -> ClassCreateResult {
        let identifier = self.identifier_of(&details.class_name);
        if let Some(existing) = graph.get_by_identifier(&identifier) {
            return ClassCreateResult {
                type_id: existing,
                duplicate: Some(Problem::ValidationProblem {
                    language_node: (),
                    severity: Severity::Error,
                    message: format!("Declared classes need to be unique ({}).", details.class_name),
                    sub_problems: Vec::new(),
                }),
            };
        }

        let id = graph.register_node(
            KindTag::Class,
            details.class_name.clone(),
            details.class_name.clone(),
        );
        graph
            .set_identifier(id, &identifier)
            .expect("fresh class node cannot collide, checked above");

        let fields: Vec<(String, Rc<TypeReference<N>>)> = details
            .fields
            .into_iter()
            .map(|(name, selector)| (name, TypeReference::new(selector)))
            .collect();
        let methods: Vec<(String, Rc<TypeReference<N>>)> = details
            .methods
            .into_iter()
            .map(|(name, selector)| (name, TypeReference::new(selector)))
            .collect();
        let super_types: Vec<Rc<TypeReference<N>>> = details
            .super_classes
            .into_iter()
            .map(TypeReference::new)
            .collect();

        let identifiable_refs = super_types.clone();
        let mut completed_refs = super_types.clone();
        completed_refs.extend(fields.iter().map(|(_, r)| Rc::clone(r)));
        completed_refs.extend(methods.iter().map(|(_, r)| Rc::clone(r)));

        graph.set_kind_data(
            id,
            KindData::Class(ClassData {
                class_name: details.class_name,
                fields,
                methods,
                super_types,
            }),
        );

        graph.define_initialization_process(
            id,
            Preconditions {
                refs_to_be_identifiable: identifiable_refs,
                refs_to_be_completed: completed_refs,
                refs_relevant_for_invalidation: Vec::new(),
                on_identification: None,
                on_completion: None,
                on_invalidation: None,
            },
        );
        graph.advance_pending(None);

        ClassCreateResult {
            type_id: id,
            duplicate: None,
        }
    }
}

fn summary<N>(graph: &TypeGraph<N>, id: TypeId) -> TypeSummary {
    TypeSummary {
        identifier: graph.identifier(id).unwrap_or_default(),
        user_representation: graph.user_representation(id).unwrap_or_default(),
    }
}

/// Classes are equal only by identity (spec §4.4.3 "Equality: by
/// identity").
pub fn analyze_equality<N>(graph: &TypeGraph<N>, a: TypeId, b: TypeId) -> Option<CoreProblem> {
    if a == b {
        None
    } else {
        Some(Problem::TypeEqualityProblem {
            type1: summary(graph, a),
            type2: summary(graph, b),
            sub_problems: Vec::new(),
        })
    }
}

/// Direct super-types declared for `id`, resolved where possible.
pub fn direct_super_types<N: Clone>(graph: &TypeGraph<N>, id: TypeId) -> Vec<TypeId> {
    let Some(data) = graph.kind_data(id) else { return Vec::new() };
    let Some(class) = data.as_class() else { return Vec::new() };
    class.super_types.iter().filter_map(|r| r.resolved_type()).collect()
}

/// Detects inheritance cycles over declared super-class edges (spec
/// §4.4.3 "No inheritance cycles"). Returns one participant list per
/// distinct cycle found by a DFS rooted at every class; callers report
/// one diagnostic per participating type (spec §8 scenario 3).
pub fn find_inheritance_cycles<N: Clone>(graph: &TypeGraph<N>, classes: &[TypeId]) -> Vec<TypeId> {
    use rustc_hash::FxHashSet;

    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        InProgress,
        Done,
    }

    let mut marks: rustc_hash::FxHashMap<TypeId, Mark> = Default::default();
    let mut cyclic: FxHashSet<TypeId> = Default::default();

    fn visit<N: Clone>(
        graph: &TypeGraph<N>,
        id: TypeId,
        marks: &mut rustc_hash::FxHashMap<TypeId, Mark>,
        stack: &mut Vec<TypeId>,
        cyclic: &mut FxHashSet<TypeId>,
    ) {
        match marks.get(&id) {
            Some(Mark::Done) => return,
            Some(Mark::InProgress) => {
                if let Some(pos) = stack.iter().position(|s| *s == id) {
                    for participant in &stack[pos..] {
                        cyclic.insert(*participant);
                    }
                }
                return;
            }
            None => {}
        }
        marks.insert(id, Mark::InProgress);
        stack.push(id);
        for sup in direct_super_types(graph, id) {
            visit(graph, sup, marks, stack, cyclic);
        }
        stack.pop();
        marks.insert(id, Mark::Done);
    }

    let mut stack = Vec::new();
    for &id in classes {
        visit(graph, id, &mut marks, &mut stack, &mut cyclic);
    }
    let mut result: Vec<TypeId> = cyclic.into_iter().collect();
    result.sort_by_key(|id| id.0);
    result
}

/// One "Cycles in super-sub-class-relationships are not allowed" problem
/// per cycle participant (spec §8 scenario 3).
pub fn cycle_problem<N>(graph: &TypeGraph<N>, id: TypeId) -> CoreProblem {
    let name = graph.name(id).unwrap_or_default();
    Problem::ValidationProblem {
        language_node: (),
        severity: Severity::Error,
        message: format!("Cycles in super-sub-class-relationships are not allowed: {name}"),
        sub_problems: Vec::new(),
    }
}

pub fn unregistered() -> TypirError {
    TypirError::UnregisteredKind { kind: KindTag::Class }
}
