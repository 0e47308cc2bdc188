//! Per-kind payload carried by a `TypeNode` (spec §9 Design Notes: "a
//! systems-language port SHOULD use a tagged sum (enum with data) for the
//! `Type` variants ... the 'kind' object becomes a per-variant
//! configuration value carried in the variant's payload").
//!
//! `crate::kind::KindTag` is the discriminator; `KindData` is the payload.
//! Every field that names another type is a `Rc<TypeReference<N>>` rather
//! than a bare `TypeId`, because at construction time that other type may
//! still be `Invalid` (forward references, mutual recursion) -- the
//! reference resolves once the graph's staged initialization sweep makes
//! progress (spec §4.3).

use crate::ids::TypeId;
use crate::reference::TypeReference;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FunctionOptions {
    pub enforce_function_name: bool,
    pub enforce_input_names: bool,
    pub enforce_output_name: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FixedParameterStrategy {
    Equal,
    SubType,
}

pub struct PrimitiveData {
    pub name: String,
}

pub struct FunctionParameter<N> {
    pub name: Option<String>,
    pub ty: Rc<TypeReference<N>>,
}

pub struct FunctionData<N> {
    pub function_name: Option<String>,
    pub output: Option<FunctionParameter<N>>,
    pub inputs: Vec<FunctionParameter<N>>,
    pub options: FunctionOptions,
}

pub struct ClassData<N> {
    pub class_name: String,
    pub fields: Vec<(String, Rc<TypeReference<N>>)>,
    /// Methods are themselves `Function`-kind types, referenced the same
    /// lazy way as fields so a method whose signature mentions the
    /// enclosing class (or a mutually-recursive sibling) can be declared.
    pub methods: Vec<(String, Rc<TypeReference<N>>)>,
    pub super_types: Vec<Rc<TypeReference<N>>>,
}

pub struct FixedParameterData<N> {
    pub base_name: String,
    pub parameters: Vec<Rc<TypeReference<N>>>,
    pub strategy: FixedParameterStrategy,
}

pub struct MultiplicityData<N> {
    pub inner: Rc<TypeReference<N>>,
    pub lo: u32,
    /// `None` means unlimited (`*`).
    pub hi: Option<u32>,
}

/// The per-kind payload a `TypeNode` carries once its kind's `create`
/// installs it. Absent (`None`) only for the brief window between
/// `register_node` and the kind finishing construction.
pub enum KindData<N> {
    Primitive(PrimitiveData),
    Function(FunctionData<N>),
    Class(ClassData<N>),
    FixedParameter(FixedParameterData<N>),
    Multiplicity(MultiplicityData<N>),
    Top,
    Bottom,
}

impl<N> KindData<N> {
    pub fn as_primitive(&self) -> Option<&PrimitiveData> {
        match self {
            KindData::Primitive(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionData<N>> {
        match self {
            KindData::Function(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassData<N>> {
        match self {
            KindData::Class(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_fixed_parameter(&self) -> Option<&FixedParameterData<N>> {
        match self {
            KindData::FixedParameter(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_multiplicity(&self) -> Option<&MultiplicityData<N>> {
        match self {
            KindData::Multiplicity(d) => Some(d),
            _ => None,
        }
    }
}

/// Every `Rc<TypeReference<N>>` a `KindData` mentions, resolved to a
/// `TypeId` where possible. Used to build the `refs_to_be_identifiable` /
/// `refs_to_be_completed` lists and by analyzers that need a kind's
/// children as concrete types.
pub fn direct_refs<N: Clone>(data: &KindData<N>) -> Vec<Rc<TypeReference<N>>> {
    match data {
        KindData::Primitive(_) | KindData::Top | KindData::Bottom => Vec::new(),
        KindData::Function(f) => {
            let mut refs: Vec<_> = f.inputs.iter().map(|p| Rc::clone(&p.ty)).collect();
            if let Some(output) = &f.output {
                refs.push(Rc::clone(&output.ty));
            }
            refs
        }
        KindData::Class(c) => {
            let mut refs: Vec<_> = c.fields.iter().map(|(_, r)| Rc::clone(r)).collect();
            refs.extend(c.methods.iter().map(|(_, r)| Rc::clone(r)));
            refs.extend(c.super_types.iter().cloned());
            refs
        }
        KindData::FixedParameter(fp) => fp.parameters.clone(),
        KindData::Multiplicity(m) => vec![Rc::clone(&m.inner)],
    }
}

pub fn resolved_ids<N: Clone>(refs: &[Rc<TypeReference<N>>]) -> Option<Vec<TypeId>> {
    refs.iter().map(|r| r.resolved_type()).collect()
}
