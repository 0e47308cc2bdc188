//! The host language adapter (spec §6 "Host language adapter").
//!
//! The engine never depends on a concrete AST type hierarchy: it only
//! ever sees an opaque `N` and asks this adapter for a node's "language
//! key" (its AST discriminant), which the inference collector uses to
//! index rules so they can be skipped efficiently, and which lets a rule
//! keyed on a base AST class match nodes of a subclass.

/// A per-node-kind discriminant string (e.g. a `SyntaxKind` name).
pub type LanguageKey = String;

pub trait LanguageService<N> {
    fn language_node_key(&self, node: &N) -> LanguageKey;

    /// Keys of every kind considered a sub-kind of `key` (including
    /// `key` itself), used so a rule registered for a base class also
    /// fires for its subclasses.
    fn all_sub_keys(&self, key: &LanguageKey) -> Vec<LanguageKey> {
        vec![key.clone()]
    }

    /// Keys of every kind `key` is considered a sub-kind of (including
    /// `key` itself).
    fn all_super_keys(&self, key: &LanguageKey) -> Vec<LanguageKey> {
        vec![key.clone()]
    }

    /// Whether a rule keyed `rule_key` should fire for a node keyed
    /// `node_key` -- true when the node's key is `rule_key` itself or one
    /// of its recognised sub-kinds.
    fn matches(&self, rule_key: &LanguageKey, node_key: &LanguageKey) -> bool {
        rule_key == node_key || self.all_super_keys(node_key).contains(rule_key)
    }
}

/// A trivial adapter for hosts with no AST-subclass hierarchy: every node
/// key is taken literally, with no sub/super-key expansion.
pub struct FlatLanguageService<F> {
    key_of: F,
}

impl<F> FlatLanguageService<F> {
    pub fn new(key_of: F) -> Self {
        Self { key_of }
    }
}

impl<N, F: Fn(&N) -> LanguageKey> LanguageService<N> for FlatLanguageService<F> {
    fn language_node_key(&self, node: &N) -> LanguageKey {
        (self.key_of)(node)
    }
}
