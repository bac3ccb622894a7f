// Common types and utilities shared across the application

pub mod entity_ids;
pub mod error_kind;
pub mod id;

pub use entity_ids::*;
pub use error_kind::ErrorKind;
pub use id::Id;
