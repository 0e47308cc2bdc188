//! Ordered inference rules, two-phase child resolution, operator
//! overloads and the validation collector (spec §4.9-§4.11).
//!
//! This crate is the one place that knows about a host AST shape beyond
//! the bare `N` handle `typir-core` threads around: it implements
//! `typir_core::NodeTypeInferrer<N>` over its own `InferenceCollector`, so
//! a `TypeSelector::LanguageNode` embedded anywhere in the graph can
//! resolve back into this crate's own machinery.

pub mod collector;
pub mod composite;
pub mod language;
pub mod operators;
pub mod problem;
pub mod rule;
pub mod validation;

pub use collector::{InferResult, InferenceCollector};
pub use composite::CompositeRule;
pub use language::{FlatLanguageService, LanguageKey, LanguageService};
pub use operators::{build_overloads, OperatorRule, OperatorSignature};
pub use problem::NodeProblem;
pub use rule::{FinalResult, InferenceRule, StepResult};
pub use validation::{require_assignable_to, require_equal, require_subtype_of, ValidationCollector, ValidationRule};

use std::hash::Hash;
use typir_core::{NodeTypeInferrer, TypeGraph, TypeId};

/// Adapts an `InferenceCollector` to `typir_core::NodeTypeInferrer`, so a
/// `TypeSelector::LanguageNode` can be resolved through ordinary reference
/// resolution instead of every caller having to special-case it.
impl<N: Clone + Hash + Eq> NodeTypeInferrer<N> for InferenceCollector<N> {
    fn infer_type_for_node(&self, _graph: &TypeGraph<N>, node: &N) -> Option<TypeId> {
        match self.infer_type(node) {
            Ok(Ok(id)) => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests;
