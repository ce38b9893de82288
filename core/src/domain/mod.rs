//! Domain layer containing push tokens, notification payloads and broadcast results.

pub mod entities;
pub mod value_objects;

// Re-export commonly used domain types
pub use entities::*;
pub use value_objects::*;
