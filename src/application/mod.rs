//! # Application Layer
//!
//! The router core: registry, sync engine, event dispatcher, conversation
//! context, and logging setup.

pub mod context;
pub mod dispatcher;
pub mod logging;
pub mod registry;
pub mod router;
pub mod sync;
