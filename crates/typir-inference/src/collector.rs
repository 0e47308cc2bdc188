//! The inference collector (spec §4.9): an ordered, memoized, recursion-
//! guarded dispatcher over registered `InferenceRule`s.

use std::cell::RefCell;
use std::hash::Hash;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use typir_core::{TypeId, TypirError};

use crate::language::LanguageService;
use crate::problem::{no_rule_matched, NodeProblem};
use crate::rule::{FinalResult, InferenceRule, StepResult};

enum CacheState {
    Pending,
    Resolved(TypeId),
}

/// `Ok(Ok(id))`: resolved to a type. `Ok(Err(problem))`: the node is
/// reachable and every applicable rule ran, but none produced a type.
/// `Err(recursion)`: a programmer error -- the same node was re-entered
/// while its own inference was still in flight (spec §7, "thrown").
pub type InferResult<N> = Result<Result<TypeId, NodeProblem<N>>, TypirError>;

/// Registers inference rules in order and dispatches to them, caching one
/// result per AST node and detecting re-entrant recursion (spec §4.9).
///
/// `N` must be `Hash + Eq` to key the memoization table -- in this port an
/// AST node is always some small, cheaply comparable handle (an index,
/// an `Rc` pointer, an interned id), never the subtree itself.
pub struct InferenceCollector<N> {
    language: Rc<dyn LanguageService<N>>,
    rules: RefCell<Vec<(Option<String>, Rc<dyn InferenceRule<N>>)>>,
    cache: RefCell<FxHashMap<N, CacheState>>,
}

impl<N: Clone + Hash + Eq> InferenceCollector<N> {
    pub fn new(language: Rc<dyn LanguageService<N>>) -> Rc<Self> {
        Rc::new(Self {
            language,
            rules: RefCell::new(Vec::new()),
            cache: RefCell::new(FxHashMap::default()),
        })
    }

    /// Registers a rule at the end of the evaluation order (spec §4.9
    /// "rules are evaluated in registration order").
    pub fn add_rule(&self, rule: Rc<dyn InferenceRule<N>>) {
        let key = rule.language_key();
        self.rules.borrow_mut().push((key, rule));
    }

    pub fn cached_result_count(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn infer_type(&self, node: &N) -> InferResult<N> {
        let node_key = self.language.language_node_key(node);
        if let Some(state) = self.cache.borrow().get(node) {
            return match state {
                CacheState::Resolved(id) => {
                    tracing::trace!(node = %node_key, "inference cache hit");
                    Ok(Ok(*id))
                }
                CacheState::Pending => {
                    tracing::debug!(node = %node_key, "inference recursion detected");
                    Err(TypirError::InferenceRecursion { node: node_key })
                }
            };
        }

        self.cache.borrow_mut().insert(node.clone(), CacheState::Pending);
        tracing::trace!(node = %node_key, "inference cache miss, running rules");
        let result = stacker::maybe_grow(32 * 1024, 1024 * 1024, || self.run_rules(node));
        match &result {
            Ok(Ok(id)) => {
                self.cache.borrow_mut().insert(node.clone(), CacheState::Resolved(*id));
            }
            _ => {
                // Failures (including the recursion error bubbling back up
                // through a caller that catches it) are never cached: a
                // later, differently-shaped call might still succeed.
                self.cache.borrow_mut().remove(node);
            }
        }
        result
    }

    fn run_rules(&self, node: &N) -> InferResult<N> {
        let node_key = self.language.language_node_key(node);
        let rules = self.rules.borrow();
        for (rule_key, rule) in rules.iter() {
            if let Some(rule_key) = rule_key
                && !self.language.matches(rule_key, &node_key)
            {
                continue;
            }
            match rule.infer_without_children(node) {
                StepResult::NotApplicable => continue,
                StepResult::Type(id) => return Ok(Ok(id)),
                StepResult::Problem(p) => return Ok(Err(p)),
                StepResult::Delegate(other) => {
                    drop(rules);
                    return self.infer_type(&other);
                }
                StepResult::Children(children) => {
                    let mut child_types = Vec::with_capacity(children.len());
                    for child in &children {
                        match self.infer_type(child)? {
                            Ok(ty) => child_types.push(ty),
                            Err(p) => return Ok(Err(p)),
                        }
                    }
                    return match rule.infer_with_childrens_types(node, &child_types) {
                        FinalResult::Type(id) => Ok(Ok(id)),
                        FinalResult::Problem(p) => Ok(Err(p)),
                    };
                }
            }
        }
        Ok(Err(no_rule_matched(node.clone())))
    }
}
