//! Canonical English rendering of `Problem` trees (spec §4.11).
//!
//! The printer must not depend on the host language's own error-formatting
//! conventions: it only ever sees `Problem` values, never host AST nodes
//! beyond what `Node: Debug` gives it. This mirrors `tsz-common::diagnostics`
//! building a `Diagnostic` out of a message template plus
//! `DiagnosticRelatedInformation` entries, generalized from TypeScript's
//! fixed numeric codes to this engine's open `Problem` enum.

use crate::problem::{Problem, Severity};
use std::fmt;

/// Renders a `Problem` to a deterministic, indented string.
pub trait Printer<Ty, Node> {
    fn print(&self, problem: &Problem<Ty, Node>) -> String {
        let mut out = String::new();
        self.write(problem, 0, &mut out);
        out
    }

    fn write(&self, problem: &Problem<Ty, Node>, indent: usize, out: &mut String);
}

/// The default, dependency-free printer. Two spaces per indentation level,
/// one line per problem, deterministic field order.
#[derive(Default, Clone, Copy)]
pub struct DefaultPrinter;

impl<Ty, Node> Printer<Ty, Node> for DefaultPrinter
where
    Ty: fmt::Display,
    Node: fmt::Debug,
{
    fn write(&self, problem: &Problem<Ty, Node>, indent: usize, out: &mut String) {
        let pad = "  ".repeat(indent);
        let line = match problem {
            Problem::ValueConflict {
                location,
                first_value,
                second_value,
                ..
            } => format!(
                "{pad}Conflicting values at {location}: '{first_value}' vs '{second_value}'."
            ),
            Problem::IndexedTypeConflict {
                property_name,
                property_index,
                expected,
                actual,
                ..
            } => {
                let at = match (property_name, property_index) {
                    (Some(name), _) => format!(" at property '{name}'"),
                    (None, Some(index)) => format!(" at index {index}"),
                    (None, None) => String::new(),
                };
                format!("{pad}Type conflict{at}: expected '{expected}', got '{actual}'.")
            }
            Problem::AssignabilityProblem { source, target, .. } => {
                format!("{pad}Type '{source}' is not assignable to type '{target}'.")
            }
            Problem::SubTypeProblem {
                super_type,
                sub_type,
                ..
            } => format!("{pad}Type '{sub_type}' is not a sub-type of type '{super_type}'."),
            Problem::TypeEqualityProblem { type1, type2, .. } => {
                format!("{pad}Type '{type1}' is not equal to type '{type2}'.")
            }
            Problem::InferenceProblem {
                language_node,
                inference_candidate,
                location,
                ..
            } => {
                let candidate = inference_candidate
                    .as_deref()
                    .map(|c| format!(" (candidate: {c})"))
                    .unwrap_or_default();
                format!(
                    "{pad}Could not infer a type for {language_node:?} at {location}{candidate}."
                )
            }
            Problem::ValidationProblem {
                severity,
                message,
                language_node,
                ..
            } => {
                format!("{pad}{severity}: {message} (at {language_node:?}).")
            }
        };
        out.push_str(&line);
        for sub in problem.sub_problems() {
            out.push('\n');
            self.write(sub, indent + 1, out);
        }
    }
}

/// Convenience: the highest severity reachable from a `ValidationProblem`
/// tree, used by hosts deciding whether to fail a build.
pub fn worst_severity<Ty, Node>(problems: &[Problem<Ty, Node>]) -> Option<Severity> {
    fn walk<Ty, Node>(problem: &Problem<Ty, Node>, worst: &mut Option<Severity>) {
        if let Problem::ValidationProblem { severity, .. } = problem {
            let is_worse = match worst {
                None => true,
                Some(current) => rank(*severity) < rank(*current),
            };
            if is_worse {
                *worst = Some(*severity);
            }
        }
        for sub in problem.sub_problems() {
            walk(sub, worst);
        }
    }

    fn rank(s: Severity) -> u8 {
        match s {
            Severity::Error => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
            Severity::Hint => 3,
        }
    }

    let mut worst = None;
    for p in problems {
        walk(p, &mut worst);
    }
    worst
}
