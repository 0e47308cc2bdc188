//! The kind discriminator and a printable summary of a type used by
//! relation-service problems (spec §4.4).

use std::fmt;

/// Discriminates the seven recognised type families (spec §4.4).
///
/// A systems-language port is told to use "a tagged sum (enum with data)
/// for the `Type` variants" (spec §9 Design Notes); `KindTag` is that
/// discriminator, and `crate::node::KindData` is the payload each variant
/// carries.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum KindTag {
    Primitive,
    Function,
    Class,
    FixedParameter,
    Multiplicity,
    Top,
    Bottom,
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            KindTag::Primitive => "Primitive",
            KindTag::Function => "Function",
            KindTag::Class => "Class",
            KindTag::FixedParameter => "FixedParameter",
            KindTag::Multiplicity => "Multiplicity",
            KindTag::Top => "Top",
            KindTag::Bottom => "Bottom",
        };
        f.write_str(s)
    }
}

/// A small, cheaply-cloned printable stand-in for a `Type`, used as the
/// `Ty` parameter of `typir_common::Problem` so relation services never
/// need to hand out a borrow of the whole graph just to report a problem.
#[derive(Clone, Debug)]
pub struct TypeSummary {
    pub identifier: String,
    pub user_representation: String,
}

impl fmt::Display for TypeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_representation)
    }
}

/// The problem tree instantiation used throughout `typir-core`. Relation
/// services never have a host AST node to attach to a problem, so `Node`
/// is unit; `typir-inference` instantiates its own `Problem<TypeSummary,
/// N>` once a real language node is available.
pub type CoreProblem = typir_common::Problem<TypeSummary, ()>;
