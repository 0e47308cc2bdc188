//! The seven recognised type families (spec §4.4): per-family creation,
//! equality/sub-type/assignability analyzers, and structural printing.
//! Each kind is a stateless (or small, `Copy`-config) factory + analyzer
//! bound to a `KindTag`; the heavier structural data each kind's types
//! carry lives in `crate::node::KindData`.

pub mod class;
pub mod fixed_parameter;
pub mod function;
pub mod multiplicity;
pub mod primitive;
pub mod registry;
pub mod top_bottom;

pub use class::{ClassDetails, ClassKind};
pub use fixed_parameter::{FixedParameterDetails, FixedParameterKind};
pub use function::{FunctionDetails, FunctionKind, FunctionParameterDetails};
pub use multiplicity::{MultiplicityDetails, MultiplicityKind};
pub use primitive::PrimitiveKind;
pub use registry::KindRegistry;
pub use top_bottom::{BottomKind, TopKind};
