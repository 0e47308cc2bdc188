//! The operator factory (spec §4.4.2 "Operator factory" design note):
//! operators are plain `Function`-kind types under the hood, grouped into
//! overload sets and dispatched through one composite-shaped inference
//! rule per operator name.
//!
//! Scenario 6 in the spec's worked examples is the shape this exists for:
//! `+` overloaded for `(int,int)->int` and `(string,string)->string`; a
//! call with mismatched operand types (`1 + "a"`) matches neither overload
//! and is reported, not silently coerced.

use std::rc::Rc;

use typir_core::kinds::{FunctionDetails, FunctionKind, FunctionParameterDetails};
use typir_core::{AssignabilityService, ConversionService, EqualityService, SubTypeService, TypeGraph, TypeId, TypeSelector};

use crate::problem::NodeProblem;
use crate::rule::{FinalResult, InferenceRule, StepResult};
use typir_common::Problem;

/// One operand-type signature for an operator overload.
pub struct OperatorSignature {
    pub operand_types: Vec<TypeId>,
    pub return_type: TypeId,
}

/// Builds the `Function`-kind types backing an operator's overload set.
/// `name` is stored on each signature for display but -- matching every
/// other `Function` built with default `FunctionOptions` -- is not part of
/// the identifier, so two structurally identical operators never collide.
pub fn build_overloads<N: Clone + 'static>(
    graph: &TypeGraph<N>,
    function_kind: &FunctionKind,
    name: &str,
    signatures: &[OperatorSignature],
) -> Vec<TypeId> {
    signatures
        .iter()
        .map(|sig| {
            let inputs = sig
                .operand_types
                .iter()
                .enumerate()
                .map(|(i, ty)| FunctionParameterDetails {
                    name: Some(format!("op{i}")),
                    ty: TypeSelector::Type(*ty),
                })
                .collect();
            function_kind.create(
                graph,
                FunctionDetails {
                    function_name: Some(name.to_string()),
                    output: Some(FunctionParameterDetails {
                        name: Some("return".to_string()),
                        ty: TypeSelector::Type(sig.return_type),
                    }),
                    inputs,
                    options: function_kind.options,
                },
            )
        })
        .collect()
}

/// Dispatches a call node to the overload whose operand types the call's
/// children are assignable to, resolving arguments left-to-right and
/// picking the first overload that accepts all of them (spec §4.9 design
/// note: "resolve child argument types first and match by
/// contravariant-assignability").
///
/// When every overload shares the same return type, argument inference is
/// skipped entirely (the fast path spec §4.9 calls out): the expression's
/// type is known without looking at its operands at all.
pub struct OperatorRule<N> {
    operator_name: String,
    overloads: Vec<TypeId>,
    extract_operands: Rc<dyn Fn(&N) -> Option<Vec<N>>>,
    graph: Rc<TypeGraph<N>>,
    assignability: Rc<AssignabilityService<N>>,
    equality: Rc<EqualityService<N>>,
    subtype: Rc<SubTypeService<N>>,
    conversion: Rc<ConversionService<N>>,
}

impl<N: Clone + 'static> OperatorRule<N> {
    pub fn new(
        operator_name: impl Into<String>,
        overloads: Vec<TypeId>,
        extract_operands: Rc<dyn Fn(&N) -> Option<Vec<N>>>,
        graph: Rc<TypeGraph<N>>,
        assignability: Rc<AssignabilityService<N>>,
        equality: Rc<EqualityService<N>>,
        subtype: Rc<SubTypeService<N>>,
        conversion: Rc<ConversionService<N>>,
    ) -> Self {
        Self {
            operator_name: operator_name.into(),
            overloads,
            extract_operands,
            graph,
            assignability,
            equality,
            subtype,
            conversion,
        }
    }

    fn common_return_type(&self) -> Option<TypeId> {
        let mut iter = self.overloads.iter();
        let first = *iter.next()?;
        let first_output = self.output_of(first)?;
        for &other in iter {
            if self.output_of(other)? != first_output {
                return None;
            }
        }
        Some(first_output)
    }

    fn output_of(&self, function: TypeId) -> Option<TypeId> {
        self.graph.kind_data(function)?.as_function()?.output.as_ref()?.ty.resolved_type()
    }

    fn matching_overload(&self, argument_types: &[TypeId]) -> Option<TypeId> {
        'overload: for &overload in &self.overloads {
            let Some(data) = self.graph.kind_data(overload) else { continue };
            let Some(f) = data.as_function() else { continue };
            if f.inputs.len() != argument_types.len() {
                continue;
            }
            for (param, &arg) in f.inputs.iter().zip(argument_types) {
                let Some(param_ty) = param.ty.resolved_type() else { continue 'overload };
                if !self.assignability.is_assignable(
                    &self.graph,
                    arg,
                    param_ty,
                    &self.equality,
                    &self.subtype,
                    &self.conversion,
                ) {
                    continue 'overload;
                }
            }
            return Some(overload);
        }
        None
    }

    fn no_overload_matches(&self, node: N) -> NodeProblem<N> {
        Problem::InferenceProblem {
            language_node: node,
            inference_candidate: Some(format!("operator '{}'", self.operator_name)),
            location: "operator overload resolution".to_string(),
            sub_problems: Vec::new(),
        }
    }
}

impl<N: Clone + 'static> InferenceRule<N> for OperatorRule<N> {
    fn infer_without_children(&self, node: &N) -> StepResult<N> {
        if let Some(return_type) = self.common_return_type() {
            return StepResult::Type(return_type);
        }
        match (self.extract_operands)(node) {
            Some(operands) => StepResult::Children(operands),
            None => StepResult::NotApplicable,
        }
    }

    fn infer_with_childrens_types(&self, node: &N, children: &[TypeId]) -> FinalResult<N> {
        match self.matching_overload(children) {
            Some(overload) => match self.output_of(overload) {
                Some(ty) => FinalResult::Type(ty),
                None => FinalResult::Problem(self.no_overload_matches(node.clone())),
            },
            None => FinalResult::Problem(self.no_overload_matches(node.clone())),
        }
    }
}
