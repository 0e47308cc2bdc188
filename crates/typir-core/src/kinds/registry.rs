//! `infrastructure.Kinds` (spec §6): tracks which kind factories this
//! engine instance has registered, so that using an un-registered kind is
//! a programmer error (`TypirError::UnregisteredKind`) rather than a
//! silent default.

use super::{BottomKind, ClassKind, FixedParameterKind, FunctionKind, MultiplicityKind, PrimitiveKind, TopKind};
use crate::error::TypirError;
use crate::ids::TypeId;
use crate::kind::KindTag;
use rustc_hash::FxHashMap;

#[derive(Default)]
pub struct KindRegistry {
    primitive: Option<PrimitiveKind>,
    function: Option<FunctionKind>,
    class: Option<ClassKind>,
    fixed_parameters: FxHashMap<&'static str, FixedParameterKind>,
    multiplicity: Option<MultiplicityKind>,
    top: Option<TopKind>,
    bottom: Option<BottomKind>,
    top_type: Option<TypeId>,
    bottom_type: Option<TypeId>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_primitive(&mut self, kind: PrimitiveKind) {
        self.primitive = Some(kind);
    }

    pub fn primitive(&self) -> Result<PrimitiveKind, TypirError> {
        self.primitive.ok_or(TypirError::UnregisteredKind { kind: KindTag::Primitive })
    }

    pub fn register_function(&mut self, kind: FunctionKind) {
        self.function = Some(kind);
    }

    pub fn function(&self) -> Result<FunctionKind, TypirError> {
        self.function.ok_or(TypirError::UnregisteredKind { kind: KindTag::Function })
    }

    pub fn register_class(&mut self, kind: ClassKind) {
        self.class = Some(kind);
    }

    pub fn class(&self) -> Result<ClassKind, TypirError> {
        self.class.ok_or(TypirError::UnregisteredKind { kind: KindTag::Class })
    }

    pub fn register_fixed_parameter(&mut self, kind: FixedParameterKind) {
        self.fixed_parameters.insert(kind.base_name, kind);
    }

    pub fn fixed_parameter(&self, base_name: &str) -> Result<FixedParameterKind, TypirError> {
        self.fixed_parameters
            .get(base_name)
            .copied()
            .ok_or(TypirError::UnregisteredKind { kind: KindTag::FixedParameter })
    }

    pub fn register_multiplicity(&mut self, kind: MultiplicityKind) {
        self.multiplicity = Some(kind);
    }

    pub fn multiplicity(&self) -> Result<MultiplicityKind, TypirError> {
        self.multiplicity.ok_or(TypirError::UnregisteredKind { kind: KindTag::Multiplicity })
    }

    pub fn register_top(&mut self, kind: TopKind) {
        self.top = Some(kind);
    }

    pub fn top(&self) -> Result<TopKind, TypirError> {
        self.top.ok_or(TypirError::UnregisteredKind { kind: KindTag::Top })
    }

    pub fn register_bottom(&mut self, kind: BottomKind) {
        self.bottom = Some(kind);
    }

    pub fn bottom(&self) -> Result<BottomKind, TypirError> {
        self.bottom.ok_or(TypirError::UnregisteredKind { kind: KindTag::Bottom })
    }

    pub fn remember_top_type(&mut self, id: TypeId) {
        self.top_type = Some(id);
    }

    pub fn remember_bottom_type(&mut self, id: TypeId) {
        self.bottom_type = Some(id);
    }

    pub fn top_type(&self) -> Option<TypeId> {
        self.top_type
    }

    pub fn bottom_type(&self) -> Option<TypeId> {
        self.bottom_type
    }
}
