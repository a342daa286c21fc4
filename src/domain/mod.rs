//! # Domain Layer
//!
//! Configuration, types, errors, and the trait seams the rest of the crate
//! is built against.

pub mod config;
pub mod errors;
pub mod traits;
pub mod types;
