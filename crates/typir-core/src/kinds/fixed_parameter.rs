//! The `FixedParameter` kind (spec §4.4.4): a base name plus a fixed
//! arity of positional type parameters (e.g. `Map<K,V>`, `List<T>`).

use crate::graph::{Preconditions, TypeGraph};
use crate::ids::TypeId;
use crate::kind::{CoreProblem, KindTag, TypeSummary};
use crate::node::{FixedParameterData, FixedParameterStrategy, KindData};
use crate::reference::TypeReference;
use crate::selector::TypeSelector;
use std::rc::Rc;
use typir_common::Problem;

/// Separator used inside the identifier; chosen so it never collides
/// with a base name or a nested identifier's own `<...>` bracketing
/// (spec §4.4.4 "a separator that does not collide with printing").
const OPEN: char = '<';
const CLOSE: char = '>';
const SEP: char = ',';

pub struct FixedParameterDetails<N> {
    pub base_name: String,
    pub parameters: Vec<TypeSelector<N>>,
}

/// One registered container family (e.g. `Map`), with its element-wise
/// comparison strategy fixed at registration (spec §4.4.4: "configurable
/// per-kind strategy").
#[derive(Clone, Copy)]
pub struct FixedParameterKind {
    pub base_name: &'static str,
    pub strategy: FixedParameterStrategy,
}

impl FixedParameterKind {
    pub fn new(base_name: &'static str, strategy: FixedParameterStrategy) -> Self {
        Self { base_name, strategy }
    }

    pub fn identifier_of(&self, parameter_identifiers: &[String]) -> String {
        let mut s = String::new();
        s.push_str(self.base_name);
        s.push(OPEN);
        for (i, p) in parameter_identifiers.iter().enumerate() {
            if i > 0 {
                s.push(SEP);
            }
            s.push_str(p);
        }
        s.push(CLOSE);
        s
    }

    pub fn create<N: Clone + 'static>(&self, graph: &TypeGraph<N>, details: FixedParameterDetails<N>) -> TypeId {
        let id = graph.register_node(
            KindTag::FixedParameter,
            format!("{}<...>", self.base_name),
            format!("{}<...>", self.base_name),
        );
        let parameters: Vec<Rc<TypeReference<N>>> =
            details.parameters.into_iter().map(TypeReference::new).collect();
        let refs = parameters.clone();

        graph.set_kind_data(
            id,
            KindData::FixedParameter(FixedParameterData {
                base_name: details.base_name,
                parameters,
                strategy: self.strategy,
            }),
        );

        let kind = *self;
        graph.define_initialization_process(
            id,
            Preconditions {
                refs_to_be_identifiable: refs.clone(),
                refs_to_be_completed: refs,
                refs_relevant_for_invalidation: Vec::new(),
                on_identification: Some(Box::new(move |graph, id| kind.on_identification(graph, id))),
                on_completion: None,
                on_invalidation: None,
            },
        );
        graph.advance_pending(None);
        id
    }

    fn on_identification<N: Clone>(&self, graph: &TypeGraph<N>, id: TypeId) {
        let Some(data) = graph.kind_data(id) else { return };
        let Some(fp) = data.as_fixed_parameter() else { return };
        let Some(identifiers) = fp
            .parameters
            .iter()
            .map(|p| p.resolved_type().and_then(|t| graph.identifier(t).ok()))
            .collect::<Option<Vec<_>>>()
        else {
            return;
        };
        let identifier = self.identifier_of(&identifiers);
        if graph.set_identifier(id, &identifier).is_ok() {
            graph.set_user_representation(id, identifier);
        }
    }

    /// Reuses an existing type with the same structural identifier
    /// instead of creating a new one (spec §8 scenario 7:
    /// `getOrCreate` returns the same object for `Map<string, Person>`
    /// constructed twice).
    pub fn get_or_create<N: Clone + 'static>(
        &self,
        graph: &TypeGraph<N>,
        details: FixedParameterDetails<N>,
        parameter_ids: &[TypeId],
    ) -> TypeId {
        let identifiers: Vec<String> = parameter_ids
            .iter()
            .filter_map(|id| graph.identifier(*id).ok())
            .collect();
        if identifiers.len() == parameter_ids.len() {
            let candidate = self.identifier_of(&identifiers);
            if let Some(existing) = graph.get_by_identifier(&candidate) {
                return existing;
            }
        }
        self.create(graph, details)
    }
}

fn summary<N>(graph: &TypeGraph<N>, id: TypeId) -> TypeSummary {
    TypeSummary {
        identifier: graph.identifier(id).unwrap_or_default(),
        user_representation: graph.user_representation(id).unwrap_or_default(),
    }
}

/// Equality: same base name and element-wise equal parameters (spec
/// §4.4.4). Produces an `IndexedTypeConflict` at the first differing
/// position, matching spec §8 scenario 7.
pub fn analyze_equality<N: Clone>(
    graph: &TypeGraph<N>,
    a: TypeId,
    b: TypeId,
    mut type_eq: impl FnMut(TypeId, TypeId) -> bool,
) -> Option<CoreProblem> {
    let data_a = graph.kind_data(a)?;
    let data_b = graph.kind_data(b)?;
    let fa = data_a.as_fixed_parameter()?;
    let fb = data_b.as_fixed_parameter()?;

    let mut sub_problems = Vec::new();
    if fa.base_name != fb.base_name {
        sub_problems.push(Problem::ValueConflict {
            location: "base name".to_string(),
            first_value: fa.base_name.clone(),
            second_value: fb.base_name.clone(),
            sub_problems: Vec::new(),
        });
    }
    if fa.parameters.len() != fb.parameters.len() {
        sub_problems.push(Problem::ValueConflict {
            location: "parameter arity".to_string(),
            first_value: fa.parameters.len().to_string(),
            second_value: fb.parameters.len().to_string(),
            sub_problems: Vec::new(),
        });
    } else {
        for (i, (pa, pb)) in fa.parameters.iter().zip(fb.parameters.iter()).enumerate() {
            if let (Some(ida), Some(idb)) = (pa.resolved_type(), pb.resolved_type())
                && !type_eq(ida, idb)
            {
                sub_problems.push(Problem::IndexedTypeConflict {
                    property_name: None,
                    property_index: Some(i),
                    expected: summary(graph, ida),
                    actual: summary(graph, idb),
                    sub_problems: Vec::new(),
                });
            }
        }
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

/// Sub-typing: same base name, element-wise compared by `strategy`
/// (spec §4.4.4: "no variance annotation").
pub fn analyze_is_subtype_of<N: Clone>(
    graph: &TypeGraph<N>,
    sub: TypeId,
    sup: TypeId,
    mut type_eq: impl FnMut(TypeId, TypeId) -> bool,
    mut is_subtype: impl FnMut(TypeId, TypeId) -> bool,
) -> Option<CoreProblem> {
    let data_sub = graph.kind_data(sub)?;
    let data_sup = graph.kind_data(sup)?;
    let fsub = data_sub.as_fixed_parameter()?;
    let fsup = data_sup.as_fixed_parameter()?;

    if fsub.base_name != fsup.base_name || fsub.parameters.len() != fsup.parameters.len() {
        return Some(Problem::SubTypeProblem {
            super_type: summary(graph, sup),
            sub_type: summary(graph, sub),
            sub_problems: vec![Problem::ValueConflict {
                location: "base name / arity".to_string(),
                first_value: format!("{}<{}>", fsub.base_name, fsub.parameters.len()),
                second_value: format!("{}<{}>", fsup.base_name, fsup.parameters.len()),
                sub_problems: Vec::new(),
            }],
        });
    }

    let mut sub_problems = Vec::new();
    for (i, (psub, psup)) in fsub.parameters.iter().zip(fsup.parameters.iter()).enumerate() {
        if let (Some(idsub), Some(idsup)) = (psub.resolved_type(), psup.resolved_type()) {
            let ok = match fsub.strategy {
                FixedParameterStrategy::Equal => type_eq(idsub, idsup),
                FixedParameterStrategy::SubType => is_subtype(idsub, idsup),
            };
            if !ok {
                sub_problems.push(Problem::IndexedTypeConflict {
                    property_name: None,
                    property_index: Some(i),
                    expected: summary(graph, idsup),
                    actual: summary(graph, idsub),
                    sub_problems: Vec::new(),
                });
            }
        }
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
