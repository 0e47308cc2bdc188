//! `TypeSelector` (spec §4.3): the several shapes a deferred reference to a
//! type can take.

use crate::ids::TypeId;
use crate::reference::TypeReference;
use std::rc::Rc;

/// Something that can eventually name a `Type`.
///
/// A concrete `Type` and a `TypeInitializer` collapse onto the same
/// variant here: in this port, "creating" a type always registers it into
/// the graph immediately (in the `Invalid` state), so an as-yet-unfinished
/// factory result already has a `TypeId` — there is no separate
/// not-yet-a-type value to represent.
pub enum TypeSelector<N> {
    Type(TypeId),
    Identifier(String),
    Reference(Rc<TypeReference<N>>),
    /// Lazily produces another selector; re-evaluated on every resolution
    /// attempt, which is how forward references to not-yet-declared types
    /// are expressed (e.g. a closure capturing a name to look up later).
    Lazy(Rc<dyn Fn() -> TypeSelector<N>>),
    /// An opaque host AST node resolved through type inference.
    LanguageNode(N),
}

impl<N: Clone> Clone for TypeSelector<N> {
    fn clone(&self) -> Self {
        match self {
            TypeSelector::Type(id) => TypeSelector::Type(*id),
            TypeSelector::Identifier(s) => TypeSelector::Identifier(s.clone()),
            TypeSelector::Reference(r) => TypeSelector::Reference(Rc::clone(r)),
            TypeSelector::Lazy(f) => TypeSelector::Lazy(Rc::clone(f)),
            TypeSelector::LanguageNode(n) => TypeSelector::LanguageNode(n.clone()),
        }
    }
}
