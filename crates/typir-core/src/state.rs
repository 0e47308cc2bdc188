//! The per-type initialization state machine (spec §3 "Lifecycle", §4.2).

use std::fmt;

/// A type's position in its three-state lifecycle.
///
/// Transitions are monotonic (`Invalid -> Identifiable -> Completed`)
/// except for invalidation, which restarts the whole cycle from `Invalid`
/// (spec §4.2).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum InitializationState {
    #[default]
    Invalid,
    Identifiable,
    Completed,
}

impl InitializationState {
    /// `self` is the same stage or a later one than `other` in the
    /// lifecycle ordering `Invalid < Identifiable < Completed`.
    pub fn is_at_least(self, other: InitializationState) -> bool {
        self >= other
    }
}

impl fmt::Display for InitializationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InitializationState::Invalid => "Invalid",
            InitializationState::Identifiable => "Identifiable",
            InitializationState::Completed => "Completed",
        };
        f.write_str(s)
    }
}

/// Observes a single type's state transitions.
///
/// Notification order is guaranteed never to report `Completed` before
/// `Identifiable` (spec §4.2 "Ordering guarantee"): if a type's completion
/// waiter is already fulfilled at the instant identification fires, both
/// callbacks run back-to-back in that order during the same notification
/// pass.
pub trait TypeStateListener {
    fn on_identifiable(&self) {}
    fn on_completed(&self) {}
    /// Fired when a non-`Invalid` type is forced back to `Invalid`
    /// (spec §4.2 "any non-Invalid -- any ref for invalidation becomes
    /// Invalid --> Invalid").
    fn on_invalidated(&self) {}
}
