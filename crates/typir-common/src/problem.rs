//! The structured problem tree (spec §6 "Problem shapes").
//!
//! Every comparison failure, unresolved inference and validation issue is
//! represented by a `Problem` value rather than thrown (spec §7): thrown
//! exceptions are reserved for programmer errors (duplicate identifiers,
//! malformed bounds, ...), never for a user's program being ill-typed.
//!
//! `Problem` is generic over the "type" handle (`Ty`) and the opaque host
//! AST node handle (`Node`) so this crate never depends on `typir-core`'s
//! concrete `Type`/graph types, nor on any particular host language. Each
//! consuming crate picks concrete types: `typir-core`'s relation services
//! instantiate `Ty` with a small `TypeSummary` (identifier + user
//! representation), and the inference/validation layer instantiates `Node`
//! with whatever `LanguageService::Node` the host provides.

use std::fmt;

/// Validation severities (spec §6).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Hint => "hint",
        };
        f.write_str(s)
    }
}

/// The stable, user-visible problem shapes from spec §6.
///
/// Every variant carries enough structure that a `Printer` can produce a
/// one-line summary plus deterministically-indented sub-problems (spec
/// §4.11), and every relation-service failure converts a recursive failure
/// into a `sub_problems` entry, never stopping at the first one (spec §7).
#[derive(Clone, Debug)]
pub enum Problem<Ty, Node> {
    ValueConflict {
        location: String,
        first_value: String,
        second_value: String,
        sub_problems: Vec<Problem<Ty, Node>>,
    },
    IndexedTypeConflict {
        property_name: Option<String>,
        property_index: Option<usize>,
        expected: Ty,
        actual: Ty,
        sub_problems: Vec<Problem<Ty, Node>>,
    },
    AssignabilityProblem {
        source: Ty,
        target: Ty,
        sub_problems: Vec<Problem<Ty, Node>>,
    },
    SubTypeProblem {
        super_type: Ty,
        sub_type: Ty,
        sub_problems: Vec<Problem<Ty, Node>>,
    },
    TypeEqualityProblem {
        type1: Ty,
        type2: Ty,
        sub_problems: Vec<Problem<Ty, Node>>,
    },
    InferenceProblem {
        language_node: Node,
        inference_candidate: Option<String>,
        location: String,
        sub_problems: Vec<Problem<Ty, Node>>,
    },
    ValidationProblem {
        language_node: Node,
        severity: Severity,
        message: String,
        sub_problems: Vec<Problem<Ty, Node>>,
    },
}

impl<Ty, Node> Problem<Ty, Node> {
    /// The `$problem` tag used for dispatch (spec §6: "every problem
    /// carries a `$problem` tag").
    pub fn tag(&self) -> &'static str {
        match self {
            Problem::ValueConflict { .. } => "ValueConflict",
            Problem::IndexedTypeConflict { .. } => "IndexedTypeConflict",
            Problem::AssignabilityProblem { .. } => "AssignabilityProblem",
            Problem::SubTypeProblem { .. } => "SubTypeProblem",
            Problem::TypeEqualityProblem { .. } => "TypeEqualityProblem",
            Problem::InferenceProblem { .. } => "InferenceProblem",
            Problem::ValidationProblem { .. } => "ValidationProblem",
        }
    }

    pub fn sub_problems(&self) -> &[Problem<Ty, Node>] {
        match self {
            Problem::ValueConflict { sub_problems, .. }
            | Problem::IndexedTypeConflict { sub_problems, .. }
            | Problem::AssignabilityProblem { sub_problems, .. }
            | Problem::SubTypeProblem { sub_problems, .. }
            | Problem::TypeEqualityProblem { sub_problems, .. }
            | Problem::InferenceProblem { sub_problems, .. }
            | Problem::ValidationProblem { sub_problems, .. } => sub_problems,
        }
    }
}
