//! Stable handles into the type graph's arenas.
//!
//! Types and edges are owned exclusively by `TypeGraph` (spec §3
//! "Ownership"); everywhere else they are passed around as these small
//! `Copy` indices, the same tradeoff `tsz-solver` makes with its `TypeId`
//! newtype over an interner-owned arena.

use std::fmt;

/// A handle to a type node owned by a `TypeGraph`. Indices are never
/// reused after a node is removed, so a stale `TypeId` is always
/// detectable (`TypeGraph::get` returns `None`) rather than aliasing a
/// different type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// A handle to a directed, relation-tagged edge owned by a `TypeGraph`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) u32);

impl fmt::Debug for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}
