//! The sub-type relation service (spec §4.6): reachability over directed
//! `SubTypeEdge` edges for nominal hierarchies (`Class`, and the
//! `Top`/`Bottom` bulk markings), plus each kind's own structural
//! analyzer for the kinds that define sub-typing without declared edges
//! (`Function` variance, `FixedParameter`/`Multiplicity` element-wise).

use crate::edge::{CachingStatus, RelationTag};
use crate::error::TypirError;
use crate::graph::TypeGraph;
use crate::ids::TypeId;
use crate::kind::{CoreProblem, KindTag, TypeSummary};
use crate::kinds::{fixed_parameter, function, multiplicity, primitive};
use rustc_hash::FxHashSet;
use std::marker::PhantomData;
use typir_common::Problem;

use super::equality::EqualityService;

pub struct SubTypeService<N> {
    _marker: PhantomData<N>,
}

impl<N> Default for SubTypeService<N> {
    fn default() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<N: Clone> SubTypeService<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_subtype(&self, graph: &TypeGraph<N>, sub: TypeId, sup: TypeId, equality: &EqualityService<N>) -> bool {
        self.get_subtype_result(graph, sub, sup, equality).is_none()
    }

    pub fn get_subtype_result(
        &self,
        graph: &TypeGraph<N>,
        sub: TypeId,
        sup: TypeId,
        equality: &EqualityService<N>,
    ) -> Option<CoreProblem> {
        if sub == sup {
            return None;
        }
        if let Some(edge_id) = graph.get_edge(sub, sup, RelationTag::SubType) {
            match graph.edge_status(edge_id) {
                Some(CachingStatus::LinkExists) => {
                    tracing::trace!(sub = sub.0, sup = sup.0, "subtype cache hit: subtype");
                    return None;
                }
                Some(CachingStatus::NoLink) => {
                    tracing::trace!(sub = sub.0, sup = sup.0, "subtype cache hit: not subtype");
                    return Some(self.problem(graph, sub, sup));
                }
                _ => {}
            }
        }

        let structural = stacker::maybe_grow(32 * 1024, 1024 * 1024, || self.structural(graph, sub, sup, equality));
        let result = match structural {
            Some(true) => true,
            Some(false) | None => self.bfs_reachable(graph, sub, sup),
        };

        self.cache(graph, sub, sup, result);
        if result {
            None
        } else {
            Some(self.problem(graph, sub, sup))
        }
    }

    /// Dispatches to the kind's own structural analyzer when both sides
    /// share a kind that defines sub-typing without declared edges.
    /// Returns `None` when the kind pair has no structural rule (the
    /// caller falls back to edge reachability).
    fn structural(&self, graph: &TypeGraph<N>, sub: TypeId, sup: TypeId, equality: &EqualityService<N>) -> Option<bool> {
        let tag_sub = graph.kind_tag(sub)?;
        let tag_sup = graph.kind_tag(sup)?;
        if tag_sub != tag_sup {
            return None;
        }
        match tag_sub {
            KindTag::Primitive => Some(primitive::names_equal(graph, sub, sup)),
            KindTag::Function => {
                Some(function::analyze_is_subtype_of(graph, sub, sup, |a, b| self.is_subtype(graph, a, b, equality)).is_none())
            }
            KindTag::FixedParameter => Some(
                fixed_parameter::analyze_is_subtype_of(
                    graph,
                    sub,
                    sup,
                    |a, b| equality.are_equal(graph, a, b),
                    |a, b| self.is_subtype(graph, a, b, equality),
                )
                .is_none(),
            ),
            KindTag::Multiplicity => Some(
                multiplicity::analyze_is_subtype_of(graph, sub, sup, |a, b| self.is_subtype(graph, a, b, equality)).is_none(),
            ),
            KindTag::Class | KindTag::Top | KindTag::Bottom => None,
        }
    }

    /// The kind-data declared supers (`Class`'s `super_types`) unioned
    /// with any graph `SubType` edges confirmed `LinkExists` (used for
    /// `Top`/`Bottom`'s bulk marking and explicit `mark_as_subtype`
    /// calls). Edges cached `NoLink` by a prior negative query are *not*
    /// real links and must not be walked as reachability edges (a
    /// `NoLink` edge exists purely as a memoization slot).
    fn direct_supers(&self, graph: &TypeGraph<N>, id: TypeId) -> Vec<TypeId> {
        let mut supers = crate::kinds::class::direct_super_types(graph, id);
        supers.extend(graph.outgoing(id, RelationTag::SubType).into_iter().filter_map(|e| {
            if graph.edge_status(e) == Some(CachingStatus::LinkExists) {
                graph.with_edge(e, |edge| edge.to)
            } else {
                None
            }
        }));
        supers
    }

    fn bfs_reachable(&self, graph: &TypeGraph<N>, sub: TypeId, sup: TypeId) -> bool {
        let mut visited: FxHashSet<TypeId> = FxHashSet::default();
        let mut stack = vec![sub];
        visited.insert(sub);
        while let Some(current) = stack.pop() {
            for next in self.direct_supers(graph, current) {
                if next == sup {
                    return true;
                }
                if visited.insert(next) {
                    stack.push(next);
                }
            }
        }
        false
    }

    fn cache(&self, graph: &TypeGraph<N>, sub: TypeId, sup: TypeId, result: bool) {
        let status = if result { CachingStatus::LinkExists } else { CachingStatus::NoLink };
        match graph.get_edge(sub, sup, RelationTag::SubType) {
            Some(edge_id) => graph.with_edge(edge_id, |e| e.set_status(status)).unwrap_or(()),
            None => {
                if let Ok(edge_id) = graph.add_edge(sub, sup, RelationTag::SubType) {
                    graph.with_edge(edge_id, |e| e.set_status(status));
                }
            }
        }
    }

    fn problem(&self, graph: &TypeGraph<N>, sub: TypeId, sup: TypeId) -> CoreProblem {
        Problem::SubTypeProblem {
            super_type: summary(graph, sup),
            sub_type: summary(graph, sub),
            sub_problems: Vec::new(),
        }
    }

    /// Declares a direct sub-type edge (spec §4.6 `markAsSubType`). When
    /// `check_for_cycles` is true (the default for user-declared
    /// inheritance), an edge-path search first verifies that `sup` cannot
    /// already reach `sub`, which would make the pair mutually
    /// sub-typing.
    ///
    /// # Errors
    /// `TypirError::SubTypeCycle` when cycle checking is requested and
    /// the edge would create one.
    pub fn mark_as_subtype(
        &self,
        graph: &TypeGraph<N>,
        sub: TypeId,
        sup: TypeId,
        check_for_cycles: bool,
    ) -> Result<(), TypirError> {
        if check_for_cycles && self.bfs_reachable(graph, sup, sub) {
            return Err(TypirError::SubTypeCycle { participants: vec![sub, sup] });
        }
        self.mark_as_subtype_unchecked(graph, sub, sup)
    }

    /// `markAsSubType` with cycle checking disabled, used by `Top`/
    /// `Bottom`'s bulk marking (spec §4.4.6 "Cycle check suppressed").
    ///
    /// A `SubType` edge for `(sub, sup)` may already exist purely as a
    /// memoized `NoLink` from a prior negative query; that is not a
    /// declared link and must be upgraded to `LinkExists`, not treated as
    /// already-marked.
    pub fn mark_as_subtype_unchecked(&self, graph: &TypeGraph<N>, sub: TypeId, sup: TypeId) -> Result<(), TypirError> {
        if let Some(edge_id) = graph.get_edge(sub, sup, RelationTag::SubType) {
            graph.with_edge(edge_id, |e| e.set_status(CachingStatus::LinkExists));
            return Ok(());
        }
        let edge_id = graph.add_edge(sub, sup, RelationTag::SubType)?;
        graph.with_edge(edge_id, |e| e.set_status(CachingStatus::LinkExists));
        Ok(())
    }

    /// Cache introspection (spec §3 "Supplemented features": cache-length
    /// accessors mirroring the pack's `QueryCache` tests).
    pub fn subtype_cache_len(&self, graph: &TypeGraph<N>) -> usize {
        graph
            .all_registered_types()
            .iter()
            .map(|id| graph.outgoing(*id, RelationTag::SubType).len())
            .sum()
    }
}

fn summary<N>(graph: &TypeGraph<N>, id: TypeId) -> TypeSummary {
    TypeSummary {
        identifier: graph.identifier(id).unwrap_or_default(),
        user_representation: graph.user_representation(id).unwrap_or_default(),
    }
}
