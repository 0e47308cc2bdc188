//! Shared primitives for the typir type-checking engine.
//!
//! This crate provides the pieces used by every other layer:
//! - String interning (`Atom`, `Interner`)
//! - The structured problem tree returned by relation services and
//!   validation (`Problem`, `Severity`)
//! - A deterministic problem printer (`Printer`, `DefaultPrinter`)

pub mod interner;
pub use interner::{Atom, Interner};

pub mod problem;
pub use problem::{Problem, Severity};

pub mod printer;
pub use printer::{DefaultPrinter, Printer};

#[cfg(test)]
mod tests;
