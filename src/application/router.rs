//! # Router
//!
//! Front door of the crate: command registration, the startup sync and
//! shutdown teardown, and construction of the concurrent dispatcher. All
//! dependencies are injected here once at startup; nothing reaches for
//! globals.

use std::sync::Arc;

use crate::application::context::{ContextCache, IgnoredConversations};
use crate::application::dispatcher::Dispatcher;
use crate::application::registry::CommandRegistry;
use crate::application::sync::{SyncEngine, SyncReport};
use crate::domain::errors::{RegistryError, SyncError};
use crate::domain::traits::{AddressPredicate, CommandHandler, ContextHandler, Gateway};
use crate::domain::types::Scope;

pub struct Router {
    registry: CommandRegistry,
    gateway: Arc<dyn Gateway>,
    cache: Arc<ContextCache>,
    ignored: Arc<IgnoredConversations>,
    context_handler: Option<Arc<dyn ContextHandler>>,
    addressed: Arc<dyn AddressPredicate>,
}

impl Router {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        cache: Arc<ContextCache>,
        ignored: Arc<IgnoredConversations>,
        addressed: Arc<dyn AddressPredicate>,
    ) -> Self {
        Self {
            registry: CommandRegistry::new(),
            gateway,
            cache,
            ignored,
            context_handler: None,
            addressed,
        }
    }

    /// Registers a command for interaction dispatch. Startup only,
    /// single-threaded, before `start`.
    pub fn register(&mut self, handler: Arc<dyn CommandHandler>) -> Result<(), RegistryError> {
        self.registry.register(handler)
    }

    /// Installs the handler for context-bearing free-form messages. Without
    /// one, message events are dropped silently.
    pub fn set_context_handler(&mut self, handler: Arc<dyn ContextHandler>) {
        self.context_handler = Some(handler);
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Reconciles the remote command set with the registry. Run once at
    /// startup, before dispatch begins.
    pub async fn sync(&self, scope: &Scope) -> Result<SyncReport, SyncError> {
        SyncEngine::new(self.gateway.clone())
            .sync(&self.registry, scope)
            .await
    }

    /// Best-effort removal of all remote commands. Run once at shutdown,
    /// after dispatch has stopped.
    pub async fn teardown(&self, scope: &Scope) -> anyhow::Result<usize> {
        SyncEngine::new(self.gateway.clone()).teardown(scope).await
    }

    /// Freezes registration and yields the dispatcher.
    pub fn start(self) -> Arc<Dispatcher> {
        Arc::new(Dispatcher::new(
            Arc::new(self.registry),
            self.gateway,
            self.cache,
            self.ignored,
            self.context_handler,
            self.addressed,
        ))
    }
}
