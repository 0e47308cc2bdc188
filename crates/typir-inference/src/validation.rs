//! The validation collector (spec §4.11): gathers `ValidationProblem`s
//! per AST node from registered rules plus a handful of built-in
//! constraint helpers layered on the relation services.

use std::rc::Rc;

use typir_core::{AssignabilityService, ConversionService, EqualityService, SubTypeService, TypeGraph, TypeId};
use typir_common::{Problem, Severity};

use crate::collector::InferenceCollector;
use crate::problem::NodeProblem;

pub trait ValidationRule<N> {
    fn validate(&self, node: &N, graph: &TypeGraph<N>, collector: &InferenceCollector<N>) -> Vec<NodeProblem<N>>;
}

/// Registers `ValidationRule`s and runs every one of them against a node,
/// in registration order, concatenating their findings (spec §4.11: "a
/// node can carry more than one problem").
pub struct ValidationCollector<N> {
    rules: Vec<Rc<dyn ValidationRule<N>>>,
}

impl<N: Clone> Default for ValidationCollector<N> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<N: Clone> ValidationCollector<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rule(&mut self, rule: Rc<dyn ValidationRule<N>>) {
        self.rules.push(rule);
    }

    pub fn validate(&self, node: &N, graph: &TypeGraph<N>, collector: &InferenceCollector<N>) -> Vec<NodeProblem<N>> {
        self.rules.iter().flat_map(|rule| rule.validate(node, graph, collector)).collect()
    }
}

/// `node`'s inferred type must be assignable to `target` (spec §4.11
/// "assignability constraint", e.g. checking a return statement against
/// its enclosing function's declared output type).
pub fn require_assignable_to<N: Clone + 'static>(
    node: N,
    source: TypeId,
    target: TypeId,
    graph: &TypeGraph<N>,
    equality: &EqualityService<N>,
    subtype: &SubTypeService<N>,
    conversion: &ConversionService<N>,
    assignability: &AssignabilityService<N>,
    message: impl Into<String>,
) -> Option<NodeProblem<N>> {
    if assignability.is_assignable(graph, source, target, equality, subtype, conversion) {
        return None;
    }
    Some(Problem::ValidationProblem {
        language_node: node,
        severity: Severity::Error,
        message: message.into(),
        sub_problems: assignability
            .get_assignability_problem(graph, source, target, equality, subtype, conversion)
            .into_iter()
            .map(retag)
            .collect(),
    })
}

/// `sub` must be a sub-type of `sup` (spec §4.11 "sub-type constraint").
pub fn require_subtype_of<N: Clone>(
    node: N,
    sub: TypeId,
    sup: TypeId,
    graph: &TypeGraph<N>,
    equality: &EqualityService<N>,
    subtype: &SubTypeService<N>,
    message: impl Into<String>,
) -> Option<NodeProblem<N>> {
    if subtype.is_subtype(graph, sub, sup, equality) {
        return None;
    }
    Some(Problem::ValidationProblem {
        language_node: node,
        severity: Severity::Error,
        message: message.into(),
        sub_problems: subtype.get_subtype_result(graph, sub, sup, equality).into_iter().map(retag).collect(),
    })
}

/// `a` and `b` must be equal (spec §4.11 "equality constraint").
pub fn require_equal<N: Clone>(
    node: N,
    a: TypeId,
    b: TypeId,
    graph: &TypeGraph<N>,
    equality: &EqualityService<N>,
    message: impl Into<String>,
) -> Option<NodeProblem<N>> {
    if equality.are_equal(graph, a, b) {
        return None;
    }
    Some(Problem::ValidationProblem {
        language_node: node,
        severity: Severity::Error,
        message: message.into(),
        sub_problems: equality.get_problem(graph, a, b).into_iter().map(retag).collect(),
    })
}

/// Lifts a core (node-less) relation problem into this crate's `Node`
/// flavor, used for sub-problem lists attached to a validation diagnostic.
fn retag<N>(problem: typir_core::CoreProblem) -> NodeProblem<N> {
    match problem {
        Problem::ValueConflict { location, first_value, second_value, sub_problems } => Problem::ValueConflict {
            location,
            first_value,
            second_value,
            sub_problems: sub_problems.into_iter().map(retag).collect(),
        },
        Problem::IndexedTypeConflict { property_name, property_index, expected, actual, sub_problems } => {
            Problem::IndexedTypeConflict {
                property_name,
                property_index,
                expected,
                actual,
                sub_problems: sub_problems.into_iter().map(retag).collect(),
            }
        }
        Problem::AssignabilityProblem { source, target, sub_problems } => Problem::AssignabilityProblem {
            source,
            target,
            sub_problems: sub_problems.into_iter().map(retag).collect(),
        },
        Problem::SubTypeProblem { super_type, sub_type, sub_problems } => Problem::SubTypeProblem {
            super_type,
            sub_type,
            sub_problems: sub_problems.into_iter().map(retag).collect(),
        },
        Problem::TypeEqualityProblem { type1, type2, sub_problems } => Problem::TypeEqualityProblem {
            type1,
            type2,
            sub_problems: sub_problems.into_iter().map(retag).collect(),
        },
        // A node-carrying problem can only originate from this crate's own
        // helpers, never from `typir-core`'s relation services (whose
        // `CoreProblem = Problem<TypeSummary, ()>` never constructs these).
        Problem::InferenceProblem { .. } | Problem::ValidationProblem { .. } => unreachable!(
            "typir-core relation services never produce InferenceProblem/ValidationProblem"
        ),
    }
}
