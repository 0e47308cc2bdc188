//! The `Function` kind (spec §4.4.2): simple name, optional output
//! parameter, ordered input parameters, and three name-enforcement
//! switches that control identifier/equality but never sub-typing (see
//! DESIGN.md, Open Question 1).

use crate::error::TypirError;
use crate::graph::{Preconditions, TypeGraph};
use crate::ids::TypeId;
use crate::kind::{CoreProblem, KindTag, TypeSummary};
use crate::node::{FunctionData, FunctionOptions, FunctionParameter, KindData};
use crate::reference::TypeReference;
use crate::selector::TypeSelector;
use std::rc::Rc;
use typir_common::Problem;

pub struct FunctionParameterDetails<N> {
    pub name: Option<String>,
    pub ty: TypeSelector<N>,
}

pub struct FunctionDetails<N> {
    pub function_name: Option<String>,
    pub output: Option<FunctionParameterDetails<N>>,
    pub inputs: Vec<FunctionParameterDetails<N>>,
    pub options: FunctionOptions,
}

/// Stateless factory for function types. `options` control nominal vs
/// structural behavior and are fixed at construction (spec §4.4.2).
#[derive(Default, Clone, Copy)]
pub struct FunctionKind {
    pub options: FunctionOptions,
}

impl FunctionKind {
    pub fn new(options: FunctionOptions) -> Self {
        Self { options }
    }

    /// `name(in1,in2)->out` when names are enforced, `(in1,in2)->out`
    /// otherwise -- chosen so two functions with identical signatures
    /// under the enforced-names policy produce the same identifier.
    fn build_identifier(&self, parts: &FunctionIdentifierParts) -> String {
        let mut s = String::new();
        if self.options.enforce_function_name
            && let Some(name) = &parts.function_name
        {
            s.push_str(name);
        }
        s.push('(');
        for (i, input) in parts.inputs.iter().enumerate() {
            if i > 0 {
                s.push(',');
            }
            if self.options.enforce_input_names
                && let Some(name) = &input.0
            {
                s.push_str(name);
                s.push(':');
            }
            s.push_str(&input.1);
        }
        s.push(')');
        s.push_str("->");
        match &parts.output {
            Some((name, identifier)) => {
                if self.options.enforce_output_name
                    && let Some(name) = name
                {
                    s.push_str(name);
                    s.push(':');
                }
                s.push_str(identifier);
            }
            None => s.push_str("void"),
        }
        s
    }

    pub fn create<N: Clone + 'static>(&self, graph: &TypeGraph<N>, details: FunctionDetails<N>) -> TypeId {
        let id = graph.register_node(KindTag::Function, "<function>".to_string(), "<function>".to_string());

        let inputs: Vec<FunctionParameter<N>> = details
            .inputs
            .into_iter()
            .map(|p| FunctionParameter {
                name: p.name,
                ty: TypeReference::new(p.ty),
            })
            .collect();
        let output = details.output.map(|p| FunctionParameter {
            name: p.name,
            ty: TypeReference::new(p.ty),
        });

        let mut refs: Vec<Rc<TypeReference<N>>> = inputs.iter().map(|p| Rc::clone(&p.ty)).collect();
        if let Some(output) = &output {
            refs.push(Rc::clone(&output.ty));
        }

        let data = FunctionData {
            function_name: details.function_name,
            output,
            inputs,
            options: self.options,
        };
        graph.set_kind_data(id, KindData::Function(data));

        let kind = *self;
        graph.define_initialization_process(
            id,
            Preconditions {
                refs_to_be_identifiable: refs.clone(),
                refs_to_be_completed: refs,
                refs_relevant_for_invalidation: Vec::new(),
                on_identification: Some(Box::new(move |graph, id| kind.on_identification(graph, id))),
                on_completion: Some(Box::new(|graph, id| {
                    if let Some(repr) = render_user_representation(graph, id) {
                        graph.set_user_representation(id, repr);
                    }
                })),
                on_invalidation: None,
            },
        );
        graph.advance_pending(None);
        id
    }

    fn on_identification<N: Clone>(&self, graph: &TypeGraph<N>, id: TypeId) {
        let Some(data) = graph.kind_data(id) else { return };
        let Some(f) = data.as_function() else { return };
        let Some(parts) = function_identifier_parts(graph, f) else {
            return;
        };
        let identifier = self.build_identifier(&parts);
        if graph.set_identifier(id, &identifier).is_ok() {
            graph.set_user_representation(id, identifier);
        }
    }
}

struct FunctionIdentifierParts {
    function_name: Option<String>,
    inputs: Vec<(Option<String>, String)>,
    output: Option<(Option<String>, String)>,
}

fn function_identifier_parts<N: Clone>(
    graph: &TypeGraph<N>,
    f: &FunctionData<N>,
) -> Option<FunctionIdentifierParts> {
    let mut inputs = Vec::with_capacity(f.inputs.len());
    for param in &f.inputs {
        let resolved = param.ty.resolved_type()?;
        inputs.push((param.name.clone(), graph.identifier(resolved).ok()?));
    }
    let output = match &f.output {
        Some(param) => {
            let resolved = param.ty.resolved_type()?;
            Some((param.name.clone(), graph.identifier(resolved).ok()?))
        }
        None => None,
    };
    Some(FunctionIdentifierParts {
        function_name: f.function_name.clone(),
        inputs,
        output,
    })
}

fn render_user_representation<N: Clone>(graph: &TypeGraph<N>, id: TypeId) -> Option<String> {
    graph.identifier(id).ok()
}

fn summary<N>(graph: &TypeGraph<N>, id: TypeId) -> TypeSummary {
    TypeSummary {
        identifier: graph.identifier(id).unwrap_or_default(),
        user_representation: graph.user_representation(id).unwrap_or_default(),
    }
}

/// Equality analyzer (spec §4.4.2): identical input/output sequences
/// under equality, with parameter names compared iff enforced.
pub fn analyze_equality<N: Clone>(
    graph: &TypeGraph<N>,
    a: TypeId,
    b: TypeId,
    mut type_eq: impl FnMut(TypeId, TypeId) -> bool,
) -> Option<CoreProblem> {
    let data_a = graph.kind_data(a)?;
    let data_b = graph.kind_data(b)?;
    let fa = data_a.as_function()?;
    let fb = data_b.as_function()?;

    let mut sub_problems = Vec::new();

    if fa.options.enforce_function_name && fa.function_name != fb.function_name {
        sub_problems.push(Problem::ValueConflict {
            location: "function name".to_string(),
            first_value: fa.function_name.clone().unwrap_or_default(),
            second_value: fb.function_name.clone().unwrap_or_default(),
            sub_problems: Vec::new(),
        });
    }

    if fa.inputs.len() != fb.inputs.len() {
        sub_problems.push(Problem::ValueConflict {
            location: "input arity".to_string(),
            first_value: fa.inputs.len().to_string(),
            second_value: fb.inputs.len().to_string(),
            sub_problems: Vec::new(),
        });
    } else {
        for (i, (pa, pb)) in fa.inputs.iter().zip(fb.inputs.iter()).enumerate() {
            check_parameter(graph, i, pa, pb, fa.options.enforce_input_names, &mut type_eq, &mut sub_problems);
        }
    }

    match (&fa.output, &fb.output) {
        (Some(pa), Some(pb)) => {
            check_parameter(graph, usize::MAX, pa, pb, fa.options.enforce_output_name, &mut type_eq, &mut sub_problems);
        }
        (None, None) => {}
        _ => sub_problems.push(Problem::ValueConflict {
            location: "output presence".to_string(),
            first_value: fa.output.is_some().to_string(),
            second_value: fb.output.is_some().to_string(),
            sub_problems: Vec::new(),
        }),
    }

    if sub_problems.is_empty() {
        None
    } else {
        Some(Problem::TypeEqualityProblem {
            type1: summary(graph, a),
            type2: summary(graph, b),
            sub_problems,
        })
    }
}

fn check_parameter<N: Clone>(
    graph: &TypeGraph<N>,
    index: usize,
    a: &FunctionParameter<N>,
    b: &FunctionParameter<N>,
    enforce_names: bool,
    type_eq: &mut impl FnMut(TypeId, TypeId) -> bool,
    sub_problems: &mut Vec<CoreProblem>,
) {
    if enforce_names && a.name != b.name {
        sub_problems.push(Problem::ValueConflict {
            location: format!("parameter name at index {index}"),
            first_value: a.name.clone().unwrap_or_default(),
            second_value: b.name.clone().unwrap_or_default(),
            sub_problems: Vec::new(),
        });
    }
    if let (Some(ida), Some(idb)) = (a.ty.resolved_type(), b.ty.resolved_type())
        && !type_eq(ida, idb)
    {
        sub_problems.push(Problem::IndexedTypeConflict {
            property_name: a.name.clone(),
            property_index: (index != usize::MAX).then_some(index),
            expected: summary(graph, ida),
            actual: summary(graph, idb),
            sub_problems: Vec::new(),
        });
    }
}

/// Sub-typing analyzer (spec §4.4.2 "function variance"): output
/// covariant, inputs contravariant, arities equal.
pub fn analyze_is_subtype_of<N: Clone>(
    graph: &TypeGraph<N>,
    sub: TypeId,
    sup: TypeId,
    mut is_subtype: impl FnMut(TypeId, TypeId) -> bool,
) -> Option<CoreProblem> {
    let data_sub = graph.kind_data(sub)?;
    let data_sup = graph.kind_data(sup)?;
    let fsub = data_sub.as_function()?;
    let fsup = data_sup.as_function()?;

    let mut sub_problems = Vec::new();

    if fsub.inputs.len() != fsup.inputs.len() {
        sub_problems.push(Problem::ValueConflict {
            location: "input arity".to_string(),
            first_value: fsub.inputs.len().to_string(),
            second_value: fsup.inputs.len().to_string(),
            sub_problems: Vec::new(),
        });
    } else {
        // Contravariant: the super-type's input must be a sub-type of the
        // sub-type's input.
        for (i, (psub, psup)) in fsub.inputs.iter().zip(fsup.inputs.iter()).enumerate() {
            if let (Some(idsub), Some(idsup)) = (psub.ty.resolved_type(), psup.ty.resolved_type())
                && !is_subtype(idsup, idsub)
            {
                sub_problems.push(Problem::IndexedTypeConflict {
                    property_name: psub.name.clone(),
                    property_index: Some(i),
                    expected: summary(graph, idsup),
                    actual: summary(graph, idsub),
                    sub_problems: Vec::new(),
                });
            }
        }
    }

    // Covariant: the sub-type's output must be a sub-type of the
    // super-type's output.
    match (&fsub.output, &fsup.output) {
        (Some(osub), Some(osup)) => {
            if let (Some(idsub), Some(idsup)) = (osub.ty.resolved_type(), osup.ty.resolved_type())
                && !is_subtype(idsub, idsup)
            {
                sub_problems.push(Problem::IndexedTypeConflict {
                    property_name: None,
                    property_index: None,
                    expected: summary(graph, idsup),
                    actual: summary(graph, idsub),
                    sub_problems: Vec::new(),
                });
            }
        }
        (None, None) => {}
        _ => sub_problems.push(Problem::ValueConflict {
            location: "output presence".to_string(),
            first_value: fsub.output.is_some().to_string(),
            second_value: fsup.output.is_some().to_string(),
            sub_problems: Vec::new(),
        }),
    }

    if sub_problems.is_empty() {
        None
    } else {
        Some(Problem::SubTypeProblem {
            super_type: summary(graph, sup),
            sub_type: summary(graph, sub),
            sub_problems,
        })
    }
}

pub fn unregistered() -> TypirError {
    TypirError::UnregisteredKind { kind: KindTag::Function }
}
