//! Inference rule shapes (spec §4.9).
//!
//! A rule is either zero-child (decides a type from the node alone) or
//! with-children (first asks for the node's relevant children, then is
//! re-invoked with their inferred types). Both shapes live behind the one
//! `InferenceRule` trait: a zero-child rule simply never returns
//! `StepResult::Children` and never overrides `infer_with_childrens_types`.

use typir_core::TypeId;

use crate::problem::NodeProblem;

/// Outcome of a rule's first step.
pub enum StepResult<N> {
    /// The rule claims this node and assigns it `TypeId` directly.
    Type(TypeId),
    /// `'N/A'`: this rule does not apply to this node; try the next one.
    NotApplicable,
    /// Defer entirely to another node's inferred type (e.g. a parenthesized
    /// expression delegating to its inner expression).
    Delegate(N),
    /// The rule applies but needs these children's types first; the
    /// collector infers each, then calls `infer_with_childrens_types`.
    Children(Vec<N>),
    /// The rule applies but the node is ill-typed.
    Problem(NodeProblem<N>),
}

/// Outcome of a rule's second step (only reached after `Children`).
pub enum FinalResult<N> {
    Type(TypeId),
    Problem(NodeProblem<N>),
}

pub trait InferenceRule<N: Clone> {
    /// Restricts this rule to nodes whose language key matches; `None`
    /// matches every node (spec §4.9 "rules can be keyed").
    fn language_key(&self) -> Option<String> {
        None
    }

    fn infer_without_children(&self, node: &N) -> StepResult<N>;

    /// Only invoked when `infer_without_children` returned
    /// `StepResult::Children`; receives the children's resolved types in
    /// the same order they were requested.
    fn infer_with_childrens_types(&self, node: &N, _children: &[TypeId]) -> FinalResult<N> {
        FinalResult::Problem(crate::problem::unresolvable(node.clone(), "incomplete rule"))
    }
}
