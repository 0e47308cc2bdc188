use std::rc::Rc;

use typir_core::TypeId;

use super::{int_type, new_graph, string_type, Expr};
use crate::collector::InferenceCollector;
use crate::language::FlatLanguageService;
use crate::rule::{FinalResult, InferenceRule, StepResult};

fn language() -> Rc<FlatLanguageService<fn(&Expr) -> String>> {
    Rc::new(FlatLanguageService::new(key_of as fn(&Expr) -> String))
}

fn key_of(node: &Expr) -> String {
    match node {
        Expr::Int(_) => "Int".to_string(),
        Expr::Str(_) => "Str".to_string(),
        Expr::Add(..) => "Add".to_string(),
        Expr::Paren(_) => "Paren".to_string(),
    }
}

struct IntLitRule(TypeId);
impl InferenceRule<Expr> for IntLitRule {
    fn infer_without_children(&self, node: &Expr) -> StepResult<Expr> {
        match node {
            Expr::Int(_) => StepResult::Type(self.0),
            _ => StepResult::NotApplicable,
        }
    }
}

struct StrLitRule(TypeId);
impl InferenceRule<Expr> for StrLitRule {
    fn infer_without_children(&self, node: &Expr) -> StepResult<Expr> {
        match node {
            Expr::Str(_) => StepResult::Type(self.0),
            _ => StepResult::NotApplicable,
        }
    }
}

/// A rule keyed on `Add`'s children: both sides must infer to the same
/// type, which becomes the result -- deliberately simpler than the full
/// operator overload dispatch in `operator_tests`, to isolate the
/// two-step with-children protocol itself.
struct AddSameTypeRule;
impl InferenceRule<Expr> for AddSameTypeRule {
    fn language_key(&self) -> Option<String> {
        Some("Add".to_string())
    }

    fn infer_without_children(&self, node: &Expr) -> StepResult<Expr> {
        match node {
            Expr::Add(l, r) => StepResult::Children(vec![(**l).clone(), (**r).clone()]),
            _ => StepResult::NotApplicable,
        }
    }

    fn infer_with_childrens_types(&self, node: &Expr, children: &[TypeId]) -> FinalResult<Expr> {
        match children {
            [a, b] if a == b => FinalResult::Type(*a),
            _ => FinalResult::Problem(crate::problem::no_rule_matched(node.clone())),
        }
    }
}

struct ParenDelegateRule;
impl InferenceRule<Expr> for ParenDelegateRule {
    fn infer_without_children(&self, node: &Expr) -> StepResult<Expr> {
        match node {
            Expr::Paren(inner) => StepResult::Delegate((**inner).clone()),
            _ => StepResult::NotApplicable,
        }
    }
}

#[test]
fn zero_child_rules_win_in_registration_order() {
    let graph = new_graph();
    let int_ty = int_type(&graph);
    let str_ty = string_type(&graph);
    let collector = InferenceCollector::new(language());
    collector.add_rule(Rc::new(IntLitRule(int_ty)));
    collector.add_rule(Rc::new(StrLitRule(str_ty)));

    assert_eq!(collector.infer_type(&Expr::Int(1)).unwrap().unwrap(), int_ty);
    assert_eq!(collector.infer_type(&Expr::Str("a".to_string())).unwrap().unwrap(), str_ty);
}

#[test]
fn unmatched_node_yields_a_problem_not_an_error() {
    let graph = new_graph();
    let collector: Rc<InferenceCollector<Expr>> = InferenceCollector::new(language());
    let _ = int_type(&graph); // ensure graph participates, even though no rule uses it
    let outcome = collector.infer_type(&Expr::Str("x".to_string())).unwrap();
    assert!(outcome.is_err());
}

#[test]
fn with_children_rule_infers_operands_first() {
    let graph = new_graph();
    let int_ty = int_type(&graph);
    let collector = InferenceCollector::new(language());
    collector.add_rule(Rc::new(IntLitRule(int_ty)));
    collector.add_rule(Rc::new(AddSameTypeRule));

    let expr = Expr::Add(Rc::new(Expr::Int(1)), Rc::new(Expr::Int(2)));
    assert_eq!(collector.infer_type(&expr).unwrap().unwrap(), int_ty);
}

#[test]
fn with_children_rule_reports_mismatched_operands() {
    let graph = new_graph();
    let int_ty = int_type(&graph);
    let str_ty = string_type(&graph);
    let collector = InferenceCollector::new(language());
    collector.add_rule(Rc::new(IntLitRule(int_ty)));
    collector.add_rule(Rc::new(StrLitRule(str_ty)));
    collector.add_rule(Rc::new(AddSameTypeRule));

    let expr = Expr::Add(Rc::new(Expr::Int(1)), Rc::new(Expr::Str("a".to_string())));
    assert!(collector.infer_type(&expr).unwrap().is_err());
}

#[test]
fn delegating_rule_resolves_through_the_inner_node() {
    let graph = new_graph();
    let int_ty = int_type(&graph);
    let collector = InferenceCollector::new(language());
    collector.add_rule(Rc::new(IntLitRule(int_ty)));
    collector.add_rule(Rc::new(ParenDelegateRule));

    let expr = Expr::Paren(Rc::new(Expr::Int(5)));
    assert_eq!(collector.infer_type(&expr).unwrap().unwrap(), int_ty);
}

#[test]
fn results_are_memoized() {
    let graph = new_graph();
    let int_ty = int_type(&graph);
    let collector = InferenceCollector::new(language());
    collector.add_rule(Rc::new(IntLitRule(int_ty)));

    let expr = Expr::Int(42);
    assert_eq!(collector.infer_type(&expr).unwrap().unwrap(), int_ty);
    assert_eq!(collector.cached_result_count(), 1);
    assert_eq!(collector.infer_type(&expr).unwrap().unwrap(), int_ty);
    assert_eq!(collector.cached_result_count(), 1);
}

/// A rule that asks the collector to infer the very node it was handed --
/// the recursion the "pending" cache sentinel exists to catch (spec §4.9,
/// §7 "thrown" errors).
struct SelfRecursingRule(Rc<InferenceCollector<Expr>>);
impl InferenceRule<Expr> for SelfRecursingRule {
    fn infer_without_children(&self, node: &Expr) -> StepResult<Expr> {
        match self.0.infer_type(node) {
            Ok(Ok(id)) => StepResult::Type(id),
            _ => StepResult::NotApplicable,
        }
    }
}

#[test]
fn reentrant_inference_of_the_same_node_is_a_thrown_recursion_error() {
    let collector = InferenceCollector::new(language());
    let recursing = Rc::new(SelfRecursingRule(Rc::clone(&collector)));
    collector.add_rule(recursing);

    let expr = Expr::Int(1);
    let result = collector.infer_type(&expr);
    assert!(matches!(result, Err(typir_core::TypirError::InferenceRecursion { .. })));
}
