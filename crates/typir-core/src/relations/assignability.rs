//! The assignability relation service (spec §4.8): `isAssignable(s,t)`
//! holds iff `s == t`, or an implicit conversion `s -> t` exists, or `s`
//! is a sub-type of `t`.
//!
//! Per DESIGN.md (Open Question 1), function-to-function assignability
//! goes through the Function kind's already-specified structural
//! sub-typing unconditionally -- nominal name enforcement affects
//! equality/identifier computation only, never this relation.

use crate::edge::ConversionMode;
use crate::graph::TypeGraph;
use crate::ids::TypeId;
use crate::kind::{CoreProblem, TypeSummary};
use std::marker::PhantomData;
use typir_common::Problem;

use super::conversion::ConversionService;
use super::equality::EqualityService;
use super::subtype::SubTypeService;

pub struct AssignabilityService<N> {
    _marker: PhantomData<N>,
}

impl<N> Default for AssignabilityService<N> {
    fn default() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<N: Clone> AssignabilityService<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_assignable(
        &self,
        graph: &TypeGraph<N>,
        source: TypeId,
        target: TypeId,
        equality: &EqualityService<N>,
        subtype: &SubTypeService<N>,
        conversion: &ConversionService<N>,
    ) -> bool {
        self.get_assignability_problem(graph, source, target, equality, subtype, conversion).is_none()
    }

    /// Returns a structured `AssignabilityProblem` carrying the
    /// sub-problems of every relation tried (spec §4.8), or `None` when
    /// assignable.
    pub fn get_assignability_problem(
        &self,
        graph: &TypeGraph<N>,
        source: TypeId,
        target: TypeId,
        equality: &EqualityService<N>,
        subtype: &SubTypeService<N>,
        conversion: &ConversionService<N>,
    ) -> Option<CoreProblem> {
        if equality.are_equal(graph, source, target) {
            return None;
        }
        if conversion.is_convertible(graph, source, target, ConversionMode::Implicit, equality) {
            return None;
        }
        if subtype.is_subtype(graph, source, target, equality) {
            return None;
        }

        let mut sub_problems = Vec::new();
        if let Some(p) = equality.get_problem(graph, source, target) {
            sub_problems.push(p);
        }
        if let Some(p) = subtype.get_subtype_result(graph, source, target, equality) {
            sub_problems.push(p);
        }

        Some(Problem::AssignabilityProblem {
            source: summary(graph, source),
            target: summary(graph, target),
            sub_problems,
        })
    }
}

fn summary<N>(graph: &TypeGraph<N>, id: TypeId) -> TypeSummary {
    TypeSummary {
        identifier: graph.identifier(id).unwrap_or_default(),
        user_representation: graph.user_representation(id).unwrap_or_default(),
    }
}
