//! The type graph (spec §3, §4.1): a single directed multigraph of types
//! and typed edges, with listeners.

use crate::edge::{CachingStatus, RelationTag, TypeEdge};
use crate::error::TypirError;
use crate::ids::{EdgeId, TypeId};
use crate::kind::KindTag;
use crate::node::KindData;
use crate::reference::NodeTypeInferrer;
use crate::state::{InitializationState, TypeStateListener};
use crate::waiter::{WaitingForIdentifiableAndCompletedTypeReferences, WaitingForInvalidTypeReferences};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use typir_common::{Atom, Interner};

/// Called back when a type's preconditions are met or broken (spec §4.2
/// `defineTheInitializationProcessOfThisType`).
pub struct Preconditions<N> {
    pub refs_to_be_identifiable: Vec<Rc<crate::reference::TypeReference<N>>>,
    pub refs_to_be_completed: Vec<Rc<crate::reference::TypeReference<N>>>,
    pub refs_relevant_for_invalidation: Vec<Rc<crate::reference::TypeReference<N>>>,
    pub on_identification: Option<Box<dyn Fn(&TypeGraph<N>, TypeId)>>,
    pub on_completion: Option<Box<dyn Fn(&TypeGraph<N>, TypeId)>>,
    pub on_invalidation: Option<Box<dyn Fn(&TypeGraph<N>, TypeId)>>,
}

impl<N> Default for Preconditions<N> {
    fn default() -> Self {
        Self {
            refs_to_be_identifiable: Vec::new(),
            refs_to_be_completed: Vec::new(),
            refs_relevant_for_invalidation: Vec::new(),
            on_identification: None,
            on_completion: None,
            on_invalidation: None,
        }
    }
}

pub(crate) struct TypeNode<N> {
    pub id: TypeId,
    pub kind_tag: KindTag,
    identifier: RefCell<Option<Atom>>,
    name: RefCell<String>,
    user_representation: RefCell<String>,
    state: Cell<InitializationState>,
    state_listeners: RefCell<Vec<Rc<dyn TypeStateListener>>>,
    preconditions: RefCell<Option<Preconditions<N>>>,
    identifiable_waiter: RefCell<Option<Rc<WaitingForIdentifiableAndCompletedTypeReferences<N>>>>,
    invalid_waiter: RefCell<Option<Rc<WaitingForInvalidTypeReferences<N>>>>,
    edges_out: RefCell<FxHashMap<RelationTag, SmallVec<[EdgeId; 4]>>>,
    edges_in: RefCell<FxHashMap<RelationTag, SmallVec<[EdgeId; 4]>>>,
    kind_data: RefCell<Option<Rc<KindData<N>>>>,
}

/// Observes graph-wide additions and removals (spec §4.1).
pub trait GraphListener<N> {
    fn on_added_type(&self, _graph: &TypeGraph<N>, _id: TypeId) {}
    fn on_removed_type(&self, _graph: &TypeGraph<N>, _id: TypeId) {}
    fn on_added_edge(&self, _graph: &TypeGraph<N>, _id: EdgeId) {}
    fn on_removed_edge(&self, _graph: &TypeGraph<N>, _id: EdgeId) {}
}

struct ListenerEntry<N> {
    id: u32,
    listener: Rc<dyn GraphListener<N>>,
}

/// The type graph. All mutation happens through `&self` methods backed by
/// `RefCell`s so that listener callbacks (which may themselves mutate the
/// graph, e.g. to register further types while reacting to one) can
/// re-enter safely, matching spec §5's "Listener notifications iterate
/// over a snapshot copy of the listener list to permit removal during
/// notification".
pub struct TypeGraph<N> {
    nodes: RefCell<Vec<Option<TypeNode<N>>>>,
    by_identifier: RefCell<FxHashMap<Atom, TypeId>>,
    edges: RefCell<Vec<Option<TypeEdge>>>,
    edge_index: RefCell<FxHashMap<(TypeId, TypeId, RelationTag), EdgeId>>,
    listeners: RefCell<Vec<ListenerEntry<N>>>,
    next_listener_id: Cell<u32>,
    interner: Interner,
}

impl<N> Default for TypeGraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> TypeGraph<N> {
    pub fn new() -> Self {
        Self {
            nodes: RefCell::new(Vec::new()),
            by_identifier: RefCell::new(FxHashMap::default()),
            edges: RefCell::new(Vec::new()),
            edge_index: RefCell::new(FxHashMap::default()),
            listeners: RefCell::new(Vec::new()),
            next_listener_id: Cell::new(0),
            interner: Interner::new(),
        }
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    // -- listeners --------------------------------------------------

    /// Registers a graph listener. When `replay` is true the listener is
    /// synchronously notified of every node already in the graph before
    /// this call returns (spec §4.1).
    pub fn add_listener(&self, listener: Rc<dyn GraphListener<N>>, replay: bool) -> u32 {
        let id = self.next_listener_id.get();
        self.next_listener_id.set(id + 1);
        if replay {
            let ids: Vec<TypeId> = self.all_registered_types();
            for existing in ids {
                listener.on_added_type(self, existing);
            }
        }
        self.listeners
            .borrow_mut()
            .push(ListenerEntry { id, listener });
        id
    }

    /// Idempotent: removing an id that is not registered is a no-op.
    pub fn remove_listener(&self, id: u32) {
        self.listeners.borrow_mut().retain(|entry| entry.id != id);
    }

    fn listener_snapshot(&self) -> Vec<Rc<dyn GraphListener<N>>> {
        self.listeners
            .borrow()
            .iter()
            .map(|entry| Rc::clone(&entry.listener))
            .collect()
    }

    // -- nodes --------------------------------------------------------

    /// Registers a freshly constructed type (always starting `Invalid`)
    /// and returns its handle. Kinds call this, then
    /// `define_initialization_process`, as part of `create`/`getOrCreate`.
    pub(crate) fn register_node(&self, kind_tag: KindTag, name: String, user_representation: String) -> TypeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = TypeId(nodes.len() as u32);
        nodes.push(Some(TypeNode {
            id,
            kind_tag,
            identifier: RefCell::new(None),
            name: RefCell::new(name),
            user_representation: RefCell::new(user_representation),
            state: Cell::new(InitializationState::Invalid),
            state_listeners: RefCell::new(Vec::new()),
            preconditions: RefCell::new(None),
            identifiable_waiter: RefCell::new(None),
            invalid_waiter: RefCell::new(None),
            edges_out: RefCell::new(FxHashMap::default()),
            edges_in: RefCell::new(FxHashMap::default()),
            kind_data: RefCell::new(None),
        }));
        drop(nodes);
        tracing::trace!(type_id = id.0, kind = %kind_tag, "registered type, state=Invalid");
        for listener in self.listener_snapshot() {
            listener.on_added_type(self, id);
        }
        id
    }

    /// Installs a kind's structural payload for `id`. Called once by a
    /// kind's `create`, immediately after `register_node`.
    pub(crate) fn set_kind_data(&self, id: TypeId, data: KindData<N>) {
        let nodes = self.nodes.borrow();
        if let Some(node) = nodes[id.0 as usize].as_ref() {
            *node.kind_data.borrow_mut() = Some(Rc::new(data));
        }
    }

    /// The kind-specific payload for `id`, if it has been installed.
    pub fn kind_data(&self, id: TypeId) -> Option<Rc<KindData<N>>> {
        self.with_node(id, |n| n.kind_data.borrow().clone()).flatten()
    }

    /// Registers `id`'s initialization preconditions (spec §4.2
    /// `defineTheInitializationProcessOfThisType`). Immediately attempts
    /// to advance the state machine in case the preconditions are already
    /// met (e.g. an empty ref list).
    pub fn define_initialization_process(&self, id: TypeId, preconditions: Preconditions<N>) {
        let waiter = Rc::new(WaitingForIdentifiableAndCompletedTypeReferences::new(
            preconditions.refs_to_be_identifiable.clone(),
            preconditions.refs_to_be_completed.clone(),
        ));
        let invalid_waiter = if preconditions.refs_relevant_for_invalidation.is_empty() {
            None
        } else {
            Some(Rc::new(WaitingForInvalidTypeReferences::new(
                preconditions.refs_relevant_for_invalidation.clone(),
            )))
        };
        {
            let nodes = self.nodes.borrow();
            let node = nodes[id.0 as usize].as_ref().expect("freshly registered node");
            *node.preconditions.borrow_mut() = Some(preconditions);
            *node.identifiable_waiter.borrow_mut() = Some(waiter);
            *node.invalid_waiter.borrow_mut() = invalid_waiter;
        }
    }

    pub fn add_state_listener(&self, id: TypeId, listener: Rc<dyn TypeStateListener>) {
        let nodes = self.nodes.borrow();
        if let Some(node) = nodes[id.0 as usize].as_ref() {
            node.state_listeners.borrow_mut().push(listener);
        }
    }

    pub fn contains(&self, id: TypeId) -> bool {
        let nodes = self.nodes.borrow();
        id.0 as usize < nodes.len() && nodes[id.0 as usize].is_some()
    }

    pub fn get_by_identifier(&self, identifier: &str) -> Option<TypeId> {
        let atom = self.interner.intern(identifier);
        self.by_identifier.borrow().get(&atom).copied()
    }

    pub fn kind_tag(&self, id: TypeId) -> Option<KindTag> {
        self.with_node(id, |n| n.kind_tag)
    }

    pub fn state(&self, id: TypeId) -> Option<InitializationState> {
        self.with_node(id, |n| n.state.get())
    }

    pub fn name(&self, id: TypeId) -> Option<String> {
        self.with_node(id, |n| n.name.borrow().clone())
    }

    pub fn user_representation(&self, id: TypeId) -> Option<String> {
        self.with_node(id, |n| n.user_representation.borrow().clone())
    }

    pub fn set_user_representation(&self, id: TypeId, repr: String) {
        let nodes = self.nodes.borrow();
        if let Some(node) = nodes[id.0 as usize].as_ref() {
            *node.user_representation.borrow_mut() = repr;
        }
    }

    /// The type's identifier, once computed.
    ///
    /// # Errors
    /// Returns `TypirError::IdentifierNotAvailable` while the type is
    /// still `Invalid` (spec §7: this is a programmer error, not a
    /// diagnostic — the embedding asked for something not yet available).
    pub fn identifier(&self, id: TypeId) -> Result<String, TypirError> {
        let nodes = self.nodes.borrow();
        let node = nodes[id.0 as usize]
            .as_ref()
            .ok_or(TypirError::NodeNotFound { id })?;
        match *node.identifier.borrow() {
            Some(atom) => Ok(self.interner.resolve(atom)),
            None => Err(TypirError::IdentifierNotAvailable { id }),
        }
    }

    /// Called by a kind's `on_identification` callback once it can
    /// compute its own identifier. Enforces identifier-injectivity (spec
    /// §3 invariant): re-registering the *same* `id` under its own
    /// identifier is a no-op, but a distinct type colliding with an
    /// existing identifier is a programmer error.
    pub fn set_identifier(&self, id: TypeId, identifier: &str) -> Result<(), TypirError> {
        let atom = self.interner.intern(identifier);
        {
            let existing = self.by_identifier.borrow().get(&atom).copied();
            if let Some(existing) = existing
                && existing != id
            {
                return Err(TypirError::DuplicateIdentifier {
                    identifier: identifier.to_string(),
                });
            }
        }
        let nodes = self.nodes.borrow();
        let node = nodes[id.0 as usize]
            .as_ref()
            .ok_or(TypirError::NodeNotFound { id })?;
        *node.identifier.borrow_mut() = Some(atom);
        drop(nodes);
        self.by_identifier.borrow_mut().insert(atom, id);
        Ok(())
    }

    pub fn all_registered_types(&self) -> Vec<TypeId> {
        self.nodes
            .borrow()
            .iter()
            .filter_map(|n| n.as_ref().map(|n| n.id))
            .collect()
    }

    pub fn remove_node(&self, id: TypeId) -> Result<(), TypirError> {
        let removed = {
            let mut nodes = self.nodes.borrow_mut();
            match nodes.get_mut(id.0 as usize) {
                Some(slot @ Some(_)) => slot.take(),
                _ => return Err(TypirError::NodeNotFound { id }),
            }
        };
        let Some(node) = removed else {
            return Err(TypirError::NodeNotFound { id });
        };
        if let Some(atom) = *node.identifier.borrow() {
            self.by_identifier.borrow_mut().remove(&atom);
        }
        let incident: Vec<EdgeId> = node
            .edges_out
            .borrow()
            .values()
            .chain(node.edges_in.borrow().values())
            .flat_map(|v| v.iter().copied())
            .collect();
        for edge_id in incident {
            let _ = self.remove_edge(edge_id);
        }
        for listener in self.listener_snapshot() {
            listener.on_removed_type(self, id);
        }
        Ok(())
    }

    fn with_node<T>(&self, id: TypeId, f: impl FnOnce(&TypeNode<N>) -> T) -> Option<T> {
        let nodes = self.nodes.borrow();
        nodes.get(id.0 as usize).and_then(|n| n.as_ref()).map(f)
    }

    // -- edges ----------------------------------------------------------

    pub fn add_edge(&self, from: TypeId, to: TypeId, relation: RelationTag) -> Result<EdgeId, TypirError> {
        if self.edge_index.borrow().contains_key(&(from, to, relation)) {
            return Err(TypirError::DuplicateEdge { from, to, relation });
        }
        let id = {
            let mut edges = self.edges.borrow_mut();
            let id = EdgeId(edges.len() as u32);
            edges.push(Some(TypeEdge::new(from, to, relation)));
            id
        };
        self.edge_index.borrow_mut().insert((from, to, relation), id);
        {
            let nodes = self.nodes.borrow();
            if let Some(node) = nodes[from.0 as usize].as_ref() {
                node.edges_out.borrow_mut().entry(relation).or_default().push(id);
            }
            if let Some(node) = nodes[to.0 as usize].as_ref() {
                node.edges_in.borrow_mut().entry(relation).or_default().push(id);
            }
        }
        for listener in self.listener_snapshot() {
            listener.on_added_edge(self, id);
        }
        Ok(id)
    }

    pub fn remove_edge(&self, id: EdgeId) -> Result<(), TypirError> {
        let edge = {
            let mut edges = self.edges.borrow_mut();
            match edges.get_mut(id.0 as usize) {
                Some(slot @ Some(_)) => slot.take(),
                _ => return Err(TypirError::EdgeNotFound {
                    from: TypeId(0),
                    to: TypeId(0),
                    relation: RelationTag::Equality,
                }),
            }
        };
        let Some(edge) = edge else {
            return Err(TypirError::EdgeNotFound {
                from: TypeId(0),
                to: TypeId(0),
                relation: RelationTag::Equality,
            });
        };
        self.edge_index.borrow_mut().remove(&(edge.from, edge.to, edge.relation));
        let nodes = self.nodes.borrow();
        if let Some(node) = nodes[edge.from.0 as usize].as_ref()
            && let Some(list) = node.edges_out.borrow_mut().get_mut(&edge.relation)
        {
            list.retain(|e| *e != id);
        }
        if let Some(node) = nodes[edge.to.0 as usize].as_ref()
            && let Some(list) = node.edges_in.borrow_mut().get_mut(&edge.relation)
        {
            list.retain(|e| *e != id);
        }
        drop(nodes);
        for listener in self.listener_snapshot() {
            listener.on_removed_edge(self, id);
        }
        Ok(())
    }

    /// A single `(from, to, relation)` edge, if registered.
    pub fn get_edge(&self, from: TypeId, to: TypeId, relation: RelationTag) -> Option<EdgeId> {
        self.edge_index.borrow().get(&(from, to, relation)).copied()
    }

    pub fn edge_status(&self, id: EdgeId) -> Option<CachingStatus> {
        self.edges.borrow().get(id.0 as usize)?.as_ref().map(|e| e.status())
    }

    pub fn with_edge<T>(&self, id: EdgeId, f: impl FnOnce(&TypeEdge) -> T) -> Option<T> {
        self.edges.borrow().get(id.0 as usize)?.as_ref().map(f)
    }

    pub fn outgoing(&self, id: TypeId, relation: RelationTag) -> Vec<EdgeId> {
        self.with_node(id, |n| {
            n.edges_out
                .borrow()
                .get(&relation)
                .map(|v| v.to_vec())
                .unwrap_or_default()
        })
        .unwrap_or_default()
    }

    pub fn incoming(&self, id: TypeId, relation: RelationTag) -> Vec<EdgeId> {
        self.with_node(id, |n| {
            n.edges_in
                .borrow()
                .get(&relation)
                .map(|v| v.to_vec())
                .unwrap_or_default()
        })
        .unwrap_or_default()
    }

    // -- staged initialization sweep ------------------------------------

    /// Re-evaluates every pending type's preconditions until a fixpoint is
    /// reached, then, if some types remain stalled solely because they
    /// wait on each other, breaks the cycle via the ignore-set protocol
    /// (spec §4.3) and retries. Also drives the reverse direction: a
    /// non-`Invalid` type whose `refs_relevant_for_invalidation` resolve
    /// to an `Invalid` type is pushed back to `Invalid` itself, cascading
    /// through dependents over subsequent fixpoint iterations. Called
    /// after every graph mutation that could unblock a waiter (`create`,
    /// `add_edge`, `set_identifier`, ...); safe and cheap to call
    /// redundantly.
    pub fn advance_pending(&self, inferrer: Option<&dyn NodeTypeInferrer<N>>)
    where
        N: Clone,
    {
        let _span = tracing::trace_span!("advance_pending").entered();
        loop {
            let mut progressed = false;
            for id in self.all_registered_types() {
                progressed |= self.try_advance_one(id, inferrer);
            }
            if !progressed {
                break;
            }
        }
        self.break_stalled_cycles(inferrer);
    }

    fn try_advance_one(&self, id: TypeId, inferrer: Option<&dyn NodeTypeInferrer<N>>) -> bool
    where
        N: Clone,
    {
        let Some(state) = self.state(id) else { return false };
        let mut progressed = false;

        if state != InitializationState::Invalid {
            let waiter = self.with_node(id, |n| n.invalid_waiter.borrow().clone()).flatten();
            if let Some(waiter) = waiter
                && waiter.fulfilled(self, inferrer)
            {
                self.invalidate(id);
                return true;
            }
        }

        if state == InitializationState::Invalid {
            let waiter = self.with_node(id, |n| n.identifiable_waiter.borrow().clone()).flatten();
            if let Some(waiter) = waiter
                && waiter.identifiable_fulfilled(self, inferrer)
            {
                self.transition_to_identifiable(id);
                progressed = true;
            }
        }

        if self.state(id) == Some(InitializationState::Identifiable) {
            let waiter = self.with_node(id, |n| n.identifiable_waiter.borrow().clone()).flatten();
            if let Some(waiter) = waiter
                && waiter.completed_fulfilled(self, inferrer)
            {
                self.transition_to_completed(id);
                progressed = true;
            }
        }

        progressed
    }

    fn transition_to_identifiable(&self, id: TypeId) {
        let callback = self.with_node(id, |n| {
            n.state.set(InitializationState::Identifiable);
            n.preconditions
                .borrow()
                .as_ref()
                .and_then(|p| p.on_identification.as_ref().map(|_| ()))
        });
        tracing::debug!(type_id = id.0, "type -> Identifiable");
        if callback.is_some() {
            // Run the user callback outside of any borrow on `nodes`.
            self.run_precondition_hook(id, |p| p.on_identification.as_ref());
        }
        self.notify_state(id, Hook::Identifiable);
    }

    fn transition_to_completed(&self, id: TypeId) {
        self.with_node(id, |n| n.state.set(InitializationState::Completed));
        tracing::debug!(type_id = id.0, "type -> Completed");
        self.run_precondition_hook(id, |p| p.on_completion.as_ref());
        self.notify_state(id, Hook::Completed);
    }

    /// Forces `id` back to `Invalid` (spec §4.2 invalidation). Re-running
    /// `advance_pending` afterwards lets it re-advance from scratch.
    pub fn invalidate(&self, id: TypeId) {
        let was_invalid = self.state(id) == Some(InitializationState::Invalid);
        if was_invalid {
            return;
        }
        self.with_node(id, |n| {
            n.state.set(InitializationState::Invalid);
            if let Some(atom) = n.identifier.borrow_mut().take() {
                self.by_identifier.borrow_mut().remove(&atom);
            }
        });
        tracing::debug!(type_id = id.0, "type -> Invalid (invalidated)");
        self.run_precondition_hook(id, |p| p.on_invalidation.as_ref());
        self.notify_state(id, Hook::Invalidated);
    }

    fn run_precondition_hook(
        &self,
        id: TypeId,
        select: impl FnOnce(&Preconditions<N>) -> Option<&Box<dyn Fn(&TypeGraph<N>, TypeId)>>,
    ) {
        let nodes = self.nodes.borrow();
        let Some(node) = nodes[id.0 as usize].as_ref() else { return };
        let preconditions = node.preconditions.borrow();
        if let Some(p) = preconditions.as_ref()
            && let Some(hook) = select(p)
        {
            // SAFETY-free note: we cannot call `hook` while holding
            // `preconditions`'s borrow if the hook re-enters the graph and
            // touches this same node's preconditions; callbacks are
            // documented to only touch *other* nodes (setting identifiers,
            // creating further types), which is the pattern every kind in
            // this crate follows.
            hook(self, id);
        }
    }

    fn notify_state(&self, id: TypeId, hook: Hook) {
        let listeners = self
            .with_node(id, |n| n.state_listeners.borrow().clone())
            .unwrap_or_default();
        for listener in listeners {
            match hook {
                Hook::Identifiable => listener.on_identifiable(),
                Hook::Completed => listener.on_completed(),
                Hook::Invalidated => listener.on_invalidated(),
            }
        }
    }

    fn break_stalled_cycles(&self, inferrer: Option<&dyn NodeTypeInferrer<N>>)
    where
        N: Clone,
    {
        let stalled: Vec<TypeId> = self
            .all_registered_types()
            .into_iter()
            .filter(|id| self.state(*id) != Some(InitializationState::Completed))
            .collect();
        if stalled.is_empty() {
            return;
        }
        let stalled_set: std::collections::HashSet<TypeId> = stalled.iter().copied().collect();

        let mut any_change = false;
        for id in &stalled {
            let waiter = self.with_node(*id, |n| n.identifiable_waiter.borrow().clone()).flatten();
            if let Some(waiter) = waiter {
                let targets: Vec<TypeId> = waiter
                    .resolved_targets(self, inferrer)
                    .into_iter()
                    .filter(|t| stalled_set.contains(t))
                    .collect();
                if waiter.add_to_ignore_set(targets) {
                    tracing::trace!(type_id = id.0, "added stalled dependencies to ignore set to break a cycle");
                    any_change = true;
                }
            }
        }

        if any_change {
            self.advance_pending(inferrer);
        }
    }
}

enum Hook {
    Identifiable,
    Completed,
    Invalidated,
}

impl<N: Clone> Clone for Preconditions<N> {
    fn clone(&self) -> Self {
        // Only the ref lists are cloned (cheap `Rc` clones); callbacks are
        // not `Clone` and are never needed twice, so a cloned
        // `Preconditions` has no callbacks. Used solely to seed the waiter
        // before the original is moved into storage.
        Self {
            refs_to_be_identifiable: self.refs_to_be_identifiable.clone(),
            refs_to_be_completed: self.refs_to_be_completed.clone(),
            refs_relevant_for_invalidation: self.refs_relevant_for_invalidation.clone(),
            on_identification: None,
            on_completion: None,
            on_invalidation: None,
        }
    }
}
