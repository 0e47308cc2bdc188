//! Waiters that fire once a set of `TypeReference`s reach a target state
//! (spec §4.3), plus the cycle-breaking "ignore set" protocol that lets
//! mutually recursive class definitions converge.

use crate::graph::TypeGraph;
use crate::ids::TypeId;
use crate::reference::{NodeTypeInferrer, TypeReference};
use crate::state::InitializationState;
use rustc_hash::FxHashSet;
use std::cell::RefCell;
use std::rc::Rc;

/// Fulfilled once every ref in `to_be_identifiable` resolves to a type at
/// least `Identifiable`, and every ref in `to_be_completed` resolves to a
/// type that is `Completed` (spec §4.3).
///
/// A ref whose resolved type has been added to this waiter's ignore set
/// counts as fulfilled even if it has not actually reached the required
/// state yet — the mechanism that lets `class A { f: B } class B { f: A }`
/// converge (spec §4.3 "Cycle breaking").
pub struct WaitingForIdentifiableAndCompletedTypeReferences<N> {
    pub to_be_identifiable: Vec<Rc<TypeReference<N>>>,
    pub to_be_completed: Vec<Rc<TypeReference<N>>>,
    ignore: RefCell<FxHashSet<TypeId>>,
}

impl<N: Clone> WaitingForIdentifiableAndCompletedTypeReferences<N> {
    pub fn new(
        to_be_identifiable: Vec<Rc<TypeReference<N>>>,
        to_be_completed: Vec<Rc<TypeReference<N>>>,
    ) -> Self {
        Self {
            to_be_identifiable,
            to_be_completed,
            ignore: RefCell::new(FxHashSet::default()),
        }
    }

    /// Adds `ids` to the ignore set. Returns `true` if at least one id was
    /// newly inserted (a no-op insert means this branch of propagation can
    /// stop, per spec: "types already in the set short-circuit further
    /// propagation").
    pub fn add_to_ignore_set(&self, ids: impl IntoIterator<Item = TypeId>) -> bool {
        let mut ignore = self.ignore.borrow_mut();
        let mut changed = false;
        for id in ids {
            changed |= ignore.insert(id);
        }
        changed
    }

    pub fn is_ignored(&self, id: TypeId) -> bool {
        self.ignore.borrow().contains(&id)
    }

    fn ref_satisfies(
        &self,
        r: &Rc<TypeReference<N>>,
        graph: &TypeGraph<N>,
        inferrer: Option<&dyn NodeTypeInferrer<N>>,
        required: InitializationState,
    ) -> bool {
        match r.try_resolve(graph, inferrer) {
            Some(id) => {
                self.is_ignored(id) || graph.state(id).is_some_and(|s| s.is_at_least(required))
            }
            None => false,
        }
    }

    pub fn identifiable_fulfilled(
        &self,
        graph: &TypeGraph<N>,
        inferrer: Option<&dyn NodeTypeInferrer<N>>,
    ) -> bool {
        self.to_be_identifiable
            .iter()
            .all(|r| self.ref_satisfies(r, graph, inferrer, InitializationState::Identifiable))
    }

    pub fn completed_fulfilled(
        &self,
        graph: &TypeGraph<N>,
        inferrer: Option<&dyn NodeTypeInferrer<N>>,
    ) -> bool {
        self.to_be_completed
            .iter()
            .all(|r| self.ref_satisfies(r, graph, inferrer, InitializationState::Completed))
    }

    /// The resolved targets of every watched ref, used when this waiter is
    /// stalled and a cycle-breaking round needs candidates to ignore.
    pub fn resolved_targets(
        &self,
        graph: &TypeGraph<N>,
        inferrer: Option<&dyn NodeTypeInferrer<N>>,
    ) -> Vec<TypeId> {
        self.to_be_identifiable
            .iter()
            .chain(self.to_be_completed.iter())
            .filter_map(|r| r.try_resolve(graph, inferrer))
            .collect()
    }
}

/// Symmetric waiter used for invalidation (spec §4.3
/// "WaitingForInvalidTypeReferences"): fulfilled iff every watched ref is
/// unresolved or resolved to an `Invalid` type, and at least one ref is
/// watched.
pub struct WaitingForInvalidTypeReferences<N> {
    pub refs: Vec<Rc<TypeReference<N>>>,
}

impl<N: Clone> WaitingForInvalidTypeReferences<N> {
    pub fn new(refs: Vec<Rc<TypeReference<N>>>) -> Self {
        Self { refs }
    }

    pub fn fulfilled(&self, graph: &TypeGraph<N>, inferrer: Option<&dyn NodeTypeInferrer<N>>) -> bool {
        if self.refs.is_empty() {
            return false;
        }
        self.refs.iter().all(|r| match r.try_resolve(graph, inferrer) {
            None => true,
            Some(id) => graph.state(id).is_none_or(|s| s == InitializationState::Invalid),
        })
    }
}
