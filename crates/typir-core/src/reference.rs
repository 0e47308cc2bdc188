//! `TypeReference` (spec §4.3): a resolving indirection from a
//! `TypeSelector` to a concrete `Type`.

use crate::graph::TypeGraph;
use crate::ids::TypeId;
use crate::selector::TypeSelector;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Resolves an opaque host AST node to the `TypeId` the inference
/// collector would assign it. Implemented by `typir-inference`'s
/// collector and injected into the engine so `typir-core` never depends
/// on inference machinery directly (spec §6's dependency-injection style
/// container).
pub trait NodeTypeInferrer<N> {
    fn infer_type_for_node(&self, graph: &TypeGraph<N>, node: &N) -> Option<TypeId>;
}

/// Notified when a `TypeReference` changes what it resolves to.
pub trait TypeReferenceListener<N> {
    fn on_type_reference_resolved(&self, reference: &TypeReference<N>, resolved: TypeId);
    fn on_type_reference_invalidated(&self, reference: &TypeReference<N>, previous: TypeId);
}

/// A resolving indirection from a `TypeSelector` to a `Type` (spec §4.3).
///
/// Lifecycle: constructed unresolved -> resolved (cached) -> possibly
/// invalidated when the resolved type disappears or is forced back to
/// `Invalid`, at which point the next `try_resolve` call attempts
/// resolution again.
pub struct TypeReference<N> {
    selector: RefCell<TypeSelector<N>>,
    resolved: Cell<Option<TypeId>>,
    listeners: RefCell<Vec<Rc<dyn TypeReferenceListener<N>>>>,
}

impl<N: Clone> TypeReference<N> {
    pub fn new(selector: TypeSelector<N>) -> Rc<Self> {
        Rc::new(Self {
            selector: RefCell::new(selector),
            resolved: Cell::new(None),
            listeners: RefCell::new(Vec::new()),
        })
    }

    /// A reference that is already resolved; convenient when a
    /// precondition is a concrete `TypeId` known up front.
    pub fn resolved(id: TypeId) -> Rc<Self> {
        let r = Self::new(TypeSelector::Type(id));
        r.resolved.set(Some(id));
        r
    }

    pub fn resolved_type(&self) -> Option<TypeId> {
        self.resolved.get()
    }

    pub fn add_listener(self: &Rc<Self>, listener: Rc<dyn TypeReferenceListener<N>>, replay: bool) {
        if replay && let Some(ty) = self.resolved.get() {
            listener.on_type_reference_resolved(self, ty);
        }
        self.listeners.borrow_mut().push(listener);
    }

    /// Idempotent: removing a listener that is not registered is a no-op.
    pub fn remove_listener(&self, listener: &Rc<dyn TypeReferenceListener<N>>) {
        self.listeners
            .borrow_mut()
            .retain(|l| !Rc::ptr_eq(l, listener));
    }

    /// Attempts to resolve the selector against the current graph state
    /// (and, for `TypeSelector::LanguageNode`, the inference collector).
    /// Updates the cached resolution and notifies listeners when it
    /// changes. Returns the resolution either way.
    pub fn try_resolve(
        self: &Rc<Self>,
        graph: &TypeGraph<N>,
        inferrer: Option<&dyn NodeTypeInferrer<N>>,
    ) -> Option<TypeId> {
        let selector = self.selector.borrow().clone();
        let found = resolve_selector(&selector, graph, inferrer);

        let previous = self.resolved.get();
        if previous != found {
            self.resolved.set(found);
            if let Some(prev) = previous {
                self.notify_invalidated(prev);
            }
            if let Some(next) = found {
                self.notify_resolved(next);
            }
        }
        found
    }

    fn notify_resolved(self: &Rc<Self>, ty: TypeId) {
        for listener in self.listeners.borrow().clone() {
            listener.on_type_reference_resolved(self, ty);
        }
    }

    fn notify_invalidated(self: &Rc<Self>, previous: TypeId) {
        for listener in self.listeners.borrow().clone() {
            listener.on_type_reference_invalidated(self, previous);
        }
    }
}

/// Resolves a bare `TypeSelector` without requiring it to be wrapped in a
/// `TypeReference` first; used for `TypeSelector::Lazy`'s inner result and
/// by callers that only need a one-shot lookup.
pub fn resolve_selector<N: Clone>(
    selector: &TypeSelector<N>,
    graph: &TypeGraph<N>,
    inferrer: Option<&dyn NodeTypeInferrer<N>>,
) -> Option<TypeId> {
    match selector {
        TypeSelector::Type(id) => graph.contains(*id).then_some(*id),
        TypeSelector::Identifier(name) => graph.get_by_identifier(name),
        TypeSelector::Reference(r) => r.try_resolve(graph, inferrer),
        TypeSelector::Lazy(f) => resolve_selector(&f(), graph, inferrer),
        TypeSelector::LanguageNode(node) => inferrer.and_then(|i| i.infer_type_for_node(graph, node)),
    }
}
