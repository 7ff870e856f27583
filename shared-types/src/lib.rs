//! Types shared between the extractors and the command-line surface.

pub mod email;
pub mod extraction;
pub mod field_map;

pub use email::{DocumentClass, RawMessage};
pub use field_map::FieldMap;

// Re-export extraction types
pub use extraction::*;
