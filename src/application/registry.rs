//! # Command Registry
//!
//! Ordered collection of command handlers keyed by name. Populated
//! single-threaded during startup, before the dispatcher starts; only read
//! afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::errors::RegistryError;
use crate::domain::traits::CommandHandler;
use crate::domain::types::CommandDefinition;

#[derive(Default)]
pub struct CommandRegistry {
    handlers: Vec<Arc<dyn CommandHandler>>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under its definition's name. Duplicate names
    /// are rejected.
    pub fn register(&mut self, handler: Arc<dyn CommandHandler>) -> Result<(), RegistryError> {
        let name = handler.definition().name;
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        self.index.insert(name, self.handlers.len());
        self.handlers.push(handler);
        Ok(())
    }

    /// Definitions in registration order, as fed to the sync engine.
    pub fn list(&self) -> Vec<CommandDefinition> {
        self.handlers.iter().map(|h| h.definition()).collect()
    }

    pub fn find(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.index.get(name).map(|&i| self.handlers[i].clone())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
