//! String interning.
//!
//! Type identifiers and kind/field/parameter names are repeated constantly
//! (every edge lookup, every cache key) so they are interned once into a
//! small `Copy` handle rather than passed around as owned `String`s, the
//! same tradeoff `tsz-solver`'s `TypeInterner` makes for literal and
//! property names.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;

/// An interned string. Cheap to copy, compare and hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(u32);

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Atom({})", self.0)
    }
}

/// A single-threaded string interner.
///
/// The engine's scheduling model is single-threaded cooperative (spec §5),
/// so a `RefCell`-guarded table is enough; there is no need for the
/// concurrent map the teacher reaches for (`dashmap`) when its checker runs
/// under `rayon`.
#[derive(Default)]
pub struct Interner {
    inner: RefCell<InternerInner>,
}

#[derive(Default)]
struct InternerInner {
    strings: Vec<Box<str>>,
    lookup: FxHashMap<Box<str>, Atom>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `s`, returning the existing `Atom` if `s` was seen before.
    pub fn intern(&self, s: &str) -> Atom {
        let mut inner = self.inner.borrow_mut();
        if let Some(&atom) = inner.lookup.get(s) {
            return atom;
        }
        let atom = Atom(inner.strings.len() as u32);
        inner.strings.push(s.into());
        inner.lookup.insert(s.into(), atom);
        atom
    }

    /// Resolves a previously interned `Atom` back to its string contents.
    ///
    /// # Panics
    /// Panics if `atom` was not produced by this interner.
    pub fn resolve(&self, atom: Atom) -> String {
        self.inner.borrow().strings[atom.0 as usize].to_string()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
