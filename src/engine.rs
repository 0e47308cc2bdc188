//! The dependency-injection-style engine container (spec §6 "Engine
//! construction"): default service implementations wired together behind
//! one struct, with factory helpers standing in for the spec's
//! `factory.{Primitives, Functions, Classes, Top, Bottom, Operators}`
//! group and `infrastructure.{Graph, GraphAlgorithms, Kinds,
//! TypeResolver}` covered by `TypeGraph` + `KindRegistry` directly.

use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use typir_common::{DefaultPrinter, Printer};
use typir_core::kinds::class::ClassCreateResult;
use typir_core::kinds::{
    BottomKind, ClassDetails, ClassKind, FixedParameterKind, FunctionDetails, FunctionKind, KindRegistry,
    MultiplicityKind, PrimitiveKind, TopKind,
};
use typir_core::node::{FixedParameterStrategy, FunctionOptions};
use typir_core::{AssignabilityService, ConversionService, EqualityService, SubTypeService, TypeGraph, TypeId, TypirError};
use typir_inference::{InferenceCollector, LanguageService, NodeProblem, ValidationCollector};

/// Everything spec §6 groups under one container: `Assignability`,
/// `Equality`, `Conversion`, `Subtype` and `Inference` relation/collector
/// services; `Printer`; `Language`; `validation.Collector`; the
/// `factory.*` kind constructors (exposed as methods below, since Rust has
/// no runtime service-locator idiom); and `infrastructure.{Graph, Kinds}`
/// as the `graph`/`kinds` fields (`GraphAlgorithms`/`TypeResolver` are
/// `TypeGraph`'s own methods and the `NodeTypeInferrer` impl respectively,
/// so they are not separate fields).
pub struct Engine<N: Clone + Hash + Eq + 'static> {
    pub graph: Rc<TypeGraph<N>>,
    pub kinds: KindRegistry,
    pub equality: Rc<EqualityService<N>>,
    pub subtype: Rc<SubTypeService<N>>,
    pub conversion: Rc<ConversionService<N>>,
    pub assignability: Rc<AssignabilityService<N>>,
    pub inference: Rc<InferenceCollector<N>>,
    pub validation: ValidationCollector<N>,
    printer: Box<dyn Printer<typir_core::TypeSummary, N>>,
}

impl<N: Clone + Hash + Eq + fmt::Debug + 'static> Engine<N> {
    pub fn builder(language: Rc<dyn LanguageService<N>>) -> EngineBuilder<N> {
        EngineBuilder::new(language)
    }

    pub fn register_primitive(&mut self) -> PrimitiveKind {
        let kind = PrimitiveKind::new();
        self.kinds.register_primitive(kind);
        kind
    }

    pub fn register_function(&mut self, options: FunctionOptions) -> FunctionKind {
        let kind = FunctionKind::new(options);
        self.kinds.register_function(kind);
        kind
    }

    pub fn register_class(&mut self) -> ClassKind {
        let kind = ClassKind::new();
        self.kinds.register_class(kind);
        kind
    }

    pub fn register_fixed_parameter(&mut self, base_name: &'static str, strategy: FixedParameterStrategy) -> FixedParameterKind {
        let kind = FixedParameterKind { base_name, strategy };
        self.kinds.register_fixed_parameter(kind);
        kind
    }

    pub fn register_multiplicity(&mut self) -> MultiplicityKind {
        let kind = MultiplicityKind::new();
        self.kinds.register_multiplicity(kind);
        kind
    }

    /// Registers `Top` and `Bottom` together: both listener-driven bulk
    /// markings need the `SubTypeService` to already exist.
    pub fn register_top_and_bottom(&mut self) -> (TypeId, TypeId) {
        let top_kind = TopKind::new();
        let bottom_kind = BottomKind::new();
        let top = top_kind.get_or_create(&self.graph, &self.subtype);
        let bottom = bottom_kind.get_or_create(&self.graph, &self.subtype);
        self.kinds.register_top(top_kind);
        self.kinds.register_bottom(bottom_kind);
        self.kinds.remember_top_type(top);
        self.kinds.remember_bottom_type(bottom);
        (top, bottom)
    }

    pub fn create_class(&self, kind: ClassKind, details: ClassDetails<N>) -> ClassCreateResult {
        kind.create(&self.graph, details)
    }

    pub fn create_function(&self, kind: FunctionKind, details: FunctionDetails<N>) -> TypeId {
        kind.create(&self.graph, details)
    }

    pub fn is_assignable(&self, source: TypeId, target: TypeId) -> bool {
        self.assignability.is_assignable(&self.graph, source, target, &self.equality, &self.subtype, &self.conversion)
    }

    pub fn infer_type(&self, node: &N) -> Result<Result<TypeId, NodeProblem<N>>, TypirError> {
        self.inference.infer_type(node)
    }

    pub fn validate(&self, node: &N) -> Vec<NodeProblem<N>> {
        self.validation.validate(node, &self.graph, &self.inference)
    }

    pub fn print(&self, problem: &NodeProblem<N>) -> String {
        self.printer.print(problem)
    }
}

pub struct EngineBuilder<N: Clone + Hash + Eq + 'static> {
    language: Rc<dyn LanguageService<N>>,
    printer: Option<Box<dyn Printer<typir_core::TypeSummary, N>>>,
    validation: ValidationCollector<N>,
}

impl<N: Clone + Hash + Eq + fmt::Debug + 'static> EngineBuilder<N> {
    fn new(language: Rc<dyn LanguageService<N>>) -> Self {
        Self {
            language,
            printer: None,
            validation: ValidationCollector::new(),
        }
    }

    /// Overrides the default `Printer` (spec §6 "merges default service
    /// implementations with user overrides").
    pub fn with_printer(mut self, printer: Box<dyn Printer<typir_core::TypeSummary, N>>) -> Self {
        self.printer = Some(printer);
        self
    }

    pub fn with_validation(mut self, validation: ValidationCollector<N>) -> Self {
        self.validation = validation;
        self
    }

    pub fn build(self) -> Engine<N> {
        let graph = Rc::new(TypeGraph::new());
        Engine {
            graph,
            kinds: KindRegistry::new(),
            equality: Rc::new(EqualityService::new()),
            subtype: Rc::new(SubTypeService::new()),
            conversion: Rc::new(ConversionService::new()),
            assignability: Rc::new(AssignabilityService::new()),
            inference: InferenceCollector::new(self.language),
            validation: self.validation,
            printer: self.printer.unwrap_or_else(|| Box::new(DefaultPrinter)),
        }
    }
}
