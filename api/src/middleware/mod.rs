//! Middleware for the HeartCast API

pub mod cors;

pub use cors::create_cors;
