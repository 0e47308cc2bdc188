//! Directed, relation-tagged edges between types (spec §3 "TypeEdge").

use crate::ids::TypeId;
use crate::kind::CoreProblem;
use std::cell::RefCell;

/// The relation a `TypeEdge` carries. Spec §3 names `SubTypeEdge`,
/// `EqualityEdge` and `ConversionEdge` as the recognised relations; at most
/// one edge exists per `(from, to, relation)` triple.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum RelationTag {
    SubType,
    Equality,
    Conversion,
}

/// The cached status of a relation computation stored on an edge (spec
/// §3). `Pending` is the cycle-breaking sentinel described in §4.5: while
/// a recursive equality (or sub-type) computation is in flight, the edge
/// reads as `Pending`, which the equality service treats as "equal for
/// now" so self-referential structures converge instead of looping
/// forever.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum CachingStatus {
    #[default]
    Unknown,
    Pending,
    LinkExists,
    NoLink,
}

/// How one type converts into another (spec §4.7).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ConversionMode {
    /// Coercion: considered during assignability.
    Implicit,
    /// Cast: must be requested explicitly, never used for assignability.
    Explicit,
    /// `from == to`; never stored as an edge, always computed on the fly.
    SelfConversion,
    /// No edge recorded for this pair.
    None,
}

#[derive(Debug)]
pub struct TypeEdge {
    pub from: TypeId,
    pub to: TypeId,
    pub relation: RelationTag,
    pub(crate) status: RefCell<CachingStatus>,
    pub(crate) conversion_mode: RefCell<Option<ConversionMode>>,
    pub(crate) cached_error: RefCell<Option<CoreProblem>>,
}

impl TypeEdge {
    pub fn new(from: TypeId, to: TypeId, relation: RelationTag) -> Self {
        Self {
            from,
            to,
            relation,
            status: RefCell::new(CachingStatus::Unknown),
            conversion_mode: RefCell::new(None),
            cached_error: RefCell::new(None),
        }
    }

    pub fn status(&self) -> CachingStatus {
        *self.status.borrow()
    }

    pub fn set_status(&self, status: CachingStatus) {
        *self.status.borrow_mut() = status;
    }

    pub fn conversion_mode(&self) -> Option<ConversionMode> {
        *self.conversion_mode.borrow()
    }

    pub fn set_conversion_mode(&self, mode: ConversionMode) {
        *self.conversion_mode.borrow_mut() = Some(mode);
    }

    pub fn cached_error(&self) -> Option<CoreProblem> {
        self.cached_error.borrow().clone()
    }

    pub fn set_cached_error(&self, problem: Option<CoreProblem>) {
        *self.cached_error.borrow_mut() = problem;
    }
}
