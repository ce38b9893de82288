//! Common utility functions

pub mod token;

// Re-export commonly used utilities
pub use token::*;
