//! Typir-RS: an embeddable, language-agnostic type-checking engine.
//!
//! This crate is the thin wiring layer spec §6 describes: a
//! dependency-injection-style `Engine` assembling `typir-core`'s type
//! graph and relation services with `typir-inference`'s collector,
//! operator factory and validation collector, parameterized by whatever
//! opaque host AST node type (`N`) the embedding language provides
//! through a `LanguageService` adapter.
//!
//! No parser, CLI, or editor binding lives here (spec's Non-goals):
//! this crate's only surface is the library API re-exported below.

pub mod engine;

pub use engine::{Engine, EngineBuilder};

pub use typir_common::{Atom, DefaultPrinter, Interner, Printer, Problem, Severity};
pub use typir_core::kinds::{
    BottomKind, ClassDetails, ClassKind, FixedParameterDetails, FixedParameterKind, FunctionDetails, FunctionKind,
    FunctionParameterDetails, KindRegistry, MultiplicityDetails, MultiplicityKind, PrimitiveKind, TopKind,
};
pub use typir_core::node::{FixedParameterStrategy, FunctionOptions};
pub use typir_core::{
    AssignabilityService, CachingStatus, ConversionMode, ConversionService, EqualityService, InitializationState,
    KindTag, NodeTypeInferrer, SubTypeService, TypeGraph, TypeId, TypeReference, TypeSelector, TypeSummary, TypirError,
};
pub use typir_inference::{
    build_overloads, require_assignable_to, require_equal, require_subtype_of, CompositeRule, FinalResult,
    FlatLanguageService, InferResult, InferenceCollector, InferenceRule, LanguageKey, LanguageService, NodeProblem,
    OperatorRule, OperatorSignature, StepResult, ValidationCollector, ValidationRule,
};

#[cfg(test)]
mod tests;
