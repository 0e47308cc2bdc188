//! Programmer errors (spec §7: "thrown" not "returned").
//!
//! These are invariant violations in the embedding code, never diagnostics
//! about the program being type-checked — those are `Problem` values
//! (`typir_common::Problem`) returned from the relation services and
//! validation collector instead. The teacher's leaf crates (`tsz-common`,
//! `tsz-solver`) do not pull in `thiserror` for this kind of error; they
//! hand-roll a small `enum` with a manual `Display`/`Error` impl, which this
//! mirrors.

use crate::edge::RelationTag;
use crate::ids::TypeId;
use crate::kind::KindTag;
use std::fmt;

#[derive(Debug, Clone)]
pub enum TypirError {
    /// Adding a type whose identifier collides with an existing, distinct
    /// registered type (spec §3 invariant).
    DuplicateIdentifier { identifier: String },
    /// Adding an edge when one already exists for the same
    /// `(from, to, relation)` triple (spec §3 `TypeEdge` invariant).
    DuplicateEdge {
        from: TypeId,
        to: TypeId,
        relation: RelationTag,
    },
    /// Removing a node that is not registered in the graph.
    NodeNotFound { id: TypeId },
    /// Removing an edge that is not registered in the graph.
    EdgeNotFound {
        from: TypeId,
        to: TypeId,
        relation: RelationTag,
    },
    /// The inference collector detected a node being inferred while a
    /// prior inference of the very same node is still in flight (spec
    /// §4.9 "pending" recursion detection).
    InferenceRecursion { node: String },
    /// A `Multiplicity` kind was asked to construct `[lo..hi]` with
    /// `lo > hi`.
    InvalidMultiplicityBounds { lo: u32, hi: Option<u32> },
    /// An operator factory was asked to build a signature list with zero
    /// overloads.
    EmptyOverloadSet,
    /// A kind was queried (e.g. via its tag) before being registered with
    /// the engine.
    UnregisteredKind { kind: KindTag },
    /// `identifier()` was called on a type that is still `Invalid` (its
    /// identifier has not been computed yet).
    IdentifierNotAvailable { id: TypeId },
    /// `markAsSubType` (or declared inheritance) detected a cycle while
    /// cycle checking was requested.
    SubTypeCycle { participants: Vec<TypeId> },
}

impl fmt::Display for TypirError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypirError::DuplicateIdentifier { identifier } => {
                write!(f, "a distinct type is already registered under identifier '{identifier}'")
            }
            TypirError::DuplicateEdge { from, to, relation } => {
                write!(f, "an edge for relation {relation:?} already exists between {from:?} and {to:?}")
            }
            TypirError::NodeNotFound { id } => write!(f, "no type registered for {id:?}"),
            TypirError::EdgeNotFound { from, to, relation } => {
                write!(f, "no {relation:?} edge registered between {from:?} and {to:?}")
            }
            TypirError::InferenceRecursion { node } => {
                write!(f, "inference rules for '{node}' recursed into themselves")
            }
            TypirError::InvalidMultiplicityBounds { lo, hi } => {
                write!(f, "invalid multiplicity bounds [{lo}..{hi:?}]: lower bound exceeds upper bound")
            }
            TypirError::EmptyOverloadSet => {
                write!(f, "an operator must be constructed with at least one overload signature")
            }
            TypirError::UnregisteredKind { kind } => write!(f, "kind {kind:?} is not registered with this engine"),
            TypirError::IdentifierNotAvailable { id } => {
                write!(f, "{id:?} is still Invalid; its identifier is not yet computed")
            }
            TypirError::SubTypeCycle { participants } => {
                write!(f, "cycle in super-sub-type relationships involving {participants:?}")
            }
        }
    }
}

impl std::error::Error for TypirError {}
