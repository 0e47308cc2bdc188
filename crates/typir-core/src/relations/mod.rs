//! Relation services over the type graph (spec §4.5-§4.8): equality,
//! sub-typing, conversion and assignability, each with explicit
//! memoization stored as cached `TypeEdge`s and documented cycle-breaking
//! semantics.

pub mod assignability;
pub mod conversion;
pub mod equality;
pub mod subtype;

pub use assignability::AssignabilityService;
pub use conversion::ConversionService;
pub use equality::EqualityService;
pub use subtype::SubTypeService;
