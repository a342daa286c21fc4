//! # Infrastructure Layer
//!
//! Concrete backend adapters behind the domain traits.

pub mod openai;
