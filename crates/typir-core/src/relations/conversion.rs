//! The conversion relation service (spec §4.7): a directed relation with
//! a mode (`Implicit`/`Explicit`). `Self` is returned when `from == to`
//! by equality and is never stored as an edge.

use crate::edge::{CachingStatus, ConversionMode, RelationTag};
use crate::graph::TypeGraph;
use crate::ids::TypeId;
use std::marker::PhantomData;

use super::equality::EqualityService;

pub struct ConversionService<N> {
    _marker: PhantomData<N>,
}

impl<N> Default for ConversionService<N> {
    fn default() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<N: Clone> ConversionService<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// `markAsConvertible` (spec §4.7). Both sides accept arrays in the
    /// source system; here callers that want the cross product simply
    /// call this once per `(from, to)` pair (see
    /// `mark_many_as_convertible`).
    pub fn mark_as_convertible(&self, graph: &TypeGraph<N>, from: TypeId, to: TypeId, mode: ConversionMode) {
        debug_assert!(
            !matches!(mode, ConversionMode::SelfConversion | ConversionMode::None),
            "Self/None are never stored as edges"
        );
        let edge_id = match graph.get_edge(from, to, RelationTag::Conversion) {
            Some(id) => id,
            None => graph
                .add_edge(from, to, RelationTag::Conversion)
                .expect("just checked for an existing edge"),
        };
        graph.with_edge(edge_id, |e| {
            e.set_status(CachingStatus::LinkExists);
            e.set_conversion_mode(mode);
        });
    }

    /// The cross product of `froms x tos` is marked (spec §4.7: "Both
    /// sides accept arrays").
    pub fn mark_many_as_convertible(&self, graph: &TypeGraph<N>, froms: &[TypeId], tos: &[TypeId], mode: ConversionMode) {
        for &from in froms {
            for &to in tos {
                self.mark_as_convertible(graph, from, to, mode);
            }
        }
    }

    pub fn get_conversion(&self, graph: &TypeGraph<N>, from: TypeId, to: TypeId, equality: &EqualityService<N>) -> ConversionMode {
        if from == to || equality.are_equal(graph, from, to) {
            return ConversionMode::SelfConversion;
        }
        match graph.get_edge(from, to, RelationTag::Conversion) {
            Some(edge_id) => graph.with_edge(edge_id, |e| e.conversion_mode()).flatten().unwrap_or(ConversionMode::None),
            None => ConversionMode::None,
        }
    }

    pub fn is_convertible(&self, graph: &TypeGraph<N>, from: TypeId, to: TypeId, mode: ConversionMode, equality: &EqualityService<N>) -> bool {
        let actual = self.get_conversion(graph, from, to, equality);
        match mode {
            ConversionMode::Implicit => actual == ConversionMode::Implicit || actual == ConversionMode::SelfConversion,
            ConversionMode::Explicit => {
                actual == ConversionMode::Explicit || actual == ConversionMode::Implicit || actual == ConversionMode::SelfConversion
            }
            ConversionMode::SelfConversion => actual == ConversionMode::SelfConversion,
            ConversionMode::None => actual == ConversionMode::None,
        }
    }

    /// Cache introspection (spec §3 "Supplemented features").
    pub fn conversion_cache_len(&self, graph: &TypeGraph<N>) -> usize {
        graph
            .all_registered_types()
            .iter()
            .map(|id| graph.outgoing(*id, RelationTag::Conversion).len())
            .sum()
    }
}
