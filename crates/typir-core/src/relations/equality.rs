//! The equality relation service (spec §4.5), using the **memoized
//! computation** strategy with a `Pending` cache sentinel (DESIGN.md Open
//! Question 2: explicit alias edges were not chosen, since only the
//! memoized strategy lets `class A { p: B } class B { p: A }` converge
//! without extra user ceremony).
//!
//! The cache edge is stored once per unordered pair, under the
//! `(min(a,b), max(a,b))` ordering, since spec §3 calls `EqualityEdge`
//! "bidirectional".

use crate::edge::{CachingStatus, RelationTag};
use crate::graph::TypeGraph;
use crate::ids::TypeId;
use crate::kind::{CoreProblem, KindTag, TypeSummary};
use crate::kinds::{class, fixed_parameter, function, multiplicity, primitive};
use std::marker::PhantomData;
use typir_common::Problem;

pub struct EqualityService<N> {
    _marker: PhantomData<N>,
}

impl<N> Default for EqualityService<N> {
    fn default() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<N: Clone> EqualityService<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn are_equal(&self, graph: &TypeGraph<N>, a: TypeId, b: TypeId) -> bool {
        self.get_problem(graph, a, b).is_none()
    }

    pub fn get_problem(&self, graph: &TypeGraph<N>, a: TypeId, b: TypeId) -> Option<CoreProblem> {
        if a == b {
            return None;
        }
        let (lo, hi) = if a.0 <= b.0 { (a, b) } else { (b, a) };

        if let Some(edge_id) = graph.get_edge(lo, hi, RelationTag::Equality) {
            match graph.edge_status(edge_id) {
                Some(CachingStatus::LinkExists) => {
                    tracing::trace!(a = lo.0, b = hi.0, "equality cache hit: equal");
                    return None;
                }
                // Pending behaves as "equal for now" while the recursive
                // comparison that created this entry is still in flight
                // (spec §4.5), which is what lets self-referential
                // structures compare equal instead of looping forever.
                Some(CachingStatus::Pending) => {
                    tracing::trace!(a = lo.0, b = hi.0, "equality cache pending: assumed equal for now");
                    return None;
                }
                Some(CachingStatus::NoLink) => {
                    tracing::trace!(a = lo.0, b = hi.0, "equality cache hit: not equal");
                    return Some(
                        graph
                            .with_edge(edge_id, |e| e.cached_error())
                            .flatten()
                            .unwrap_or_else(|| self.problem(graph, a, b)),
                    );
                }
                _ => {}
            }
        }

        let edge_id = match graph.get_edge(lo, hi, RelationTag::Equality) {
            Some(id) => id,
            None => graph.add_edge(lo, hi, RelationTag::Equality).expect("checked above"),
        };
        graph.with_edge(edge_id, |e| e.set_status(CachingStatus::Pending));
        tracing::trace!(a = lo.0, b = hi.0, "equality cache miss, analyzing");

        // Deeply nested structural types (e.g. `Multiplicity<Multiplicity<...>>`)
        // recurse through `analyze` one stack frame per level; grow the
        // stack on demand rather than risk overflow on pathological input.
        let result = stacker::maybe_grow(32 * 1024, 1024 * 1024, || self.analyze(graph, a, b));

        let status = if result.is_none() { CachingStatus::LinkExists } else { CachingStatus::NoLink };
        graph.with_edge(edge_id, |e| {
            e.set_status(status);
            e.set_cached_error(result.clone());
        });
        result
    }

    fn analyze(&self, graph: &TypeGraph<N>, a: TypeId, b: TypeId) -> Option<CoreProblem> {
        let (tag_a, tag_b) = (graph.kind_tag(a), graph.kind_tag(b));
        if tag_a != tag_b {
            return Some(self.problem(graph, a, b));
        }
        match tag_a? {
            KindTag::Primitive => {
                if primitive::names_equal(graph, a, b) {
                    None
                } else {
                    Some(self.problem(graph, a, b))
                }
            }
            KindTag::Function => function::analyze_equality(graph, a, b, |x, y| self.are_equal(graph, x, y)),
            KindTag::Class => class::analyze_equality(graph, a, b),
            KindTag::FixedParameter => fixed_parameter::analyze_equality(graph, a, b, |x, y| self.are_equal(graph, x, y)),
            KindTag::Multiplicity => multiplicity::analyze_equality(graph, a, b, |x, y| self.are_equal(graph, x, y)),
            KindTag::Top | KindTag::Bottom => Some(self.problem(graph, a, b)),
        }
    }

    fn problem(&self, graph: &TypeGraph<N>, a: TypeId, b: TypeId) -> CoreProblem {
        Problem::TypeEqualityProblem {
            type1: summary(graph, a),
            type2: summary(graph, b),
            sub_problems: Vec::new(),
        }
    }

    /// Cache introspection (spec §3 "Supplemented features").
    pub fn equality_cache_len(&self, graph: &TypeGraph<N>) -> usize {
        graph
            .all_registered_types()
            .iter()
            .map(|id| graph.outgoing(*id, RelationTag::Equality).len())
            .sum()
    }
}

fn summary<N>(graph: &TypeGraph<N>, id: TypeId) -> TypeSummary {
    TypeSummary {
        identifier: graph.identifier(id).unwrap_or_default(),
        user_representation: graph.user_representation(id).unwrap_or_default(),
    }
}
