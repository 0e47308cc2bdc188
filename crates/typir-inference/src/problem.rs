//! Instantiates `typir_common::Problem` with the host's own node type as
//! the `Node` parameter, since -- unlike `typir-core`'s relation services
//! -- an unresolved inference or a validation failure always has a
//! concrete offending AST node to point at.

use typir_common::{Problem, Severity};

pub type NodeProblem<N> = Problem<typir_core::TypeSummary, N>;

pub fn unresolvable<N>(node: N, candidate: &str) -> NodeProblem<N> {
    Problem::InferenceProblem {
        language_node: node,
        inference_candidate: Some(candidate.to_string()),
        location: "inference".to_string(),
        sub_problems: Vec::new(),
    }
}

pub fn no_rule_matched<N>(node: N) -> NodeProblem<N> {
    Problem::InferenceProblem {
        language_node: node,
        inference_candidate: None,
        location: "inference".to_string(),
        sub_problems: Vec::new(),
    }
}

pub fn validation<N>(node: N, severity: Severity, message: impl Into<String>) -> NodeProblem<N> {
    Problem::ValidationProblem {
        language_node: node,
        severity,
        message: message.into(),
        sub_problems: Vec::new(),
    }
}
