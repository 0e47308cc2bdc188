//! The `Multiplicity` kind (spec §4.4.5): wraps a constrained type with
//! `[lo..hi]` bounds (`hi` may be unlimited).

use crate::error::TypirError;
use crate::graph::{Preconditions, TypeGraph};
use crate::ids::TypeId;
use crate::kind::{CoreProblem, TypeSummary};
use crate::node::{KindData, MultiplicityData};
use crate::reference::TypeReference;
use crate::selector::TypeSelector;
use typir_common::Problem;

pub struct MultiplicityDetails<N> {
    pub inner: TypeSelector<N>,
    pub lo: u32,
    pub hi: Option<u32>,
}

#[derive(Default, Clone, Copy)]
pub struct MultiplicityKind;

impl MultiplicityKind {
    pub fn new() -> Self {
        Self
    }

    /// `[n]` when `lo == hi`, `[*]` for `0..unlimited`, `[lo..hi]`
    /// otherwise (spec §4.4.5 "canonical forms").
    fn bounds_identifier(lo: u32, hi: Option<u32>) -> String {
        match (lo, hi) {
            (0, None) => "[*]".to_string(),
            (lo, Some(hi)) if lo == hi => format!("[{lo}]"),
            (lo, Some(hi)) => format!("[{lo}..{hi}]"),
            (lo, None) => format!("[{lo}..*]"),
        }
    }

    pub fn identifier_of(inner_identifier: &str, lo: u32, hi: Option<u32>) -> String {
        format!("{inner_identifier}{}", Self::bounds_identifier(lo, hi))
    }

    /// # Errors
    /// `TypirError::InvalidMultiplicityBounds` when `lo > hi` (spec §7
    /// "thrown": "invalid bounds for Multiplicity").
    pub fn create<N: Clone + 'static>(
        &self,
        graph: &TypeGraph<N>,
        details: MultiplicityDetails<N>,
    ) -> Result<TypeId, TypirError> {
        if let Some(hi) = details.hi
            && details.lo > hi
        {
            return Err(TypirError::InvalidMultiplicityBounds {
                lo: details.lo,
                hi: details.hi,
            });
        }

        let id = graph.register_node(
            crate::kind::KindTag::Multiplicity,
            "<multiplicity>".to_string(),
            "<multiplicity>".to_string(),
        );
        let inner = TypeReference::new(details.inner);
        let refs = vec![inner.clone()];

        graph.set_kind_data(
            id,
            KindData::Multiplicity(MultiplicityData {
                inner,
                lo: details.lo,
                hi: details.hi,
            }),
        );

        graph.define_initialization_process(
            id,
            Preconditions {
                refs_to_be_identifiable: refs.clone(),
                refs_to_be_completed: refs,
                refs_relevant_for_invalidation: Vec::new(),
                on_identification: Some(Box::new(|graph, id| Self::on_identification(graph, id))),
                on_completion: None,
                on_invalidation: None,
            },
        );
        graph.advance_pending(None);
        Ok(id)
    }

    fn on_identification<N: Clone>(graph: &TypeGraph<N>, id: TypeId) {
        let Some(data) = graph.kind_data(id) else { return };
        let Some(m) = data.as_multiplicity() else { return };
        let Some(inner_id) = m.inner.resolved_type() else { return };
        let Ok(inner_identifier) = graph.identifier(inner_id) else {
            return;
        };
        let identifier = Self::identifier_of(&inner_identifier, m.lo, m.hi);
        if graph.set_identifier(id, &identifier).is_ok() {
            graph.set_user_representation(id, identifier);
        }
    }
}

fn summary<N>(graph: &TypeGraph<N>, id: TypeId) -> TypeSummary {
    TypeSummary {
        identifier: graph.identifier(id).unwrap_or_default(),
        user_representation: graph.user_representation(id).unwrap_or_default(),
    }
}

/// Equality analyzer. Spec §9 flags the source's analyzer as buggy
/// (compares a type's bounds against itself); fixed here to compare `a`'s
/// bounds against `b`'s, per the recorded Open Question resolution
/// (DESIGN.md).
pub fn analyze_equality<N: Clone>(
    graph: &TypeGraph<N>,
    a: TypeId,
    b: TypeId,
    mut type_eq: impl FnMut(TypeId, TypeId) -> bool,
) -> Option<CoreProblem> {
    let data_a = graph.kind_data(a)?;
    let data_b = graph.kind_data(b)?;
    let ma = data_a.as_multiplicity()?;
    let mb = data_b.as_multiplicity()?;

    let mut sub_problems = Vec::new();
    if ma.lo != mb.lo || ma.hi != mb.hi {
        sub_problems.push(Problem::ValueConflict {
            location: "bounds".to_string(),
            first_value: MultiplicityKind::bounds_identifier(ma.lo, ma.hi),
            second_value: MultiplicityKind::bounds_identifier(mb.lo, mb.hi),
            sub_problems: Vec::new(),
        });
    }
    if let (Some(ida), Some(idb)) = (ma.inner.resolved_type(), mb.inner.resolved_type())
        && !type_eq(ida, idb)
    {
        sub_problems.push(Problem::IndexedTypeConflict {
            property_name: None,
            property_index: None,
            expected: summary(graph, ida),
            actual: summary(graph, idb),
            sub_problems: Vec::new(),
        });
    }

    if sub_problems.is_empty() {
        None
    } else {
        Some(Problem::TypeEqualityProblem {
            type1: summary(graph, a),
            type2: summary(graph, b),
            sub_problems,
        })
    }
}

/// Sub-typing: inner sub-type AND bound relaxation (spec §4.4.5):
/// `lo_sub >= lo_super` and `hi_sub <= hi_super`, with `None` (unlimited)
/// acting as an absorbing maximum.
pub fn analyze_is_subtype_of<N: Clone>(
    graph: &TypeGraph<N>,
    sub: TypeId,
    sup: TypeId,
    mut is_subtype: impl FnMut(TypeId, TypeId) -> bool,
) -> Option<CoreProblem> {
    let data_sub = graph.kind_data(sub)?;
    let data_sup = graph.kind_data(sup)?;
    let msub = data_sub.as_multiplicity()?;
    let msup = data_sup.as_multiplicity()?;

    let mut sub_problems = Vec::new();

    let lo_ok = msub.lo >= msup.lo;
    let hi_ok = match (msub.hi, msup.hi) {
        (_, None) => true,
        (None, Some(_)) => false,
        (Some(hi_sub), Some(hi_sup)) => hi_sub <= hi_sup,
    };
    if !lo_ok || !hi_ok {
        sub_problems.push(Problem::ValueConflict {
            location: "bounds relaxation".to_string(),
            first_value: MultiplicityKind::bounds_identifier(msub.lo, msub.hi),
            second_value: MultiplicityKind::bounds_identifier(msup.lo, msup.hi),
            sub_problems: Vec::new(),
        });
    }

    if let (Some(idsub), Some(idsup)) = (msub.inner.resolved_type(), msup.inner.resolved_type())
        && !is_subtype(idsub, idsup)
    {
        sub_problems.push(Problem::IndexedTypeConflict {
            property_name: None,
            property_index: None,
            expected: summary(graph, idsup),
            actual: summary(graph, idsub),
            sub_problems: Vec::new(),
        });
    }

    if sub_problems.is_empty() {
        None
    } else {
        Some(Problem::SubTypeProblem {
            super_type: summary(graph, sup),
            sub_type: summary(graph, sub),
            sub_problems,
        })
    }
}
