//! # courier
//!
//! Command routing and bounded conversation context for chat gateways.
//!
//! The crate sits between a real-time chat gateway and a set of stateless
//! command handlers:
//!
//! - the [`Router`] registers a declarative command set and reconciles it
//!   with the gateway (create/update/delete until remote state matches the
//!   local registry exactly),
//! - the [`Dispatcher`] routes interaction and message events to handlers,
//!   one spawned task per event, containing handler errors and panics,
//! - the [`ContextCache`] keeps a bounded, LRU-evicted transcript per
//!   conversation so context-bearing handlers can reconstruct recent
//!   history without querying the gateway,
//! - the [`IgnoredConversations`] set lets an operator mute the bot per
//!   conversation.
//!
//! The gateway connection itself and the generation backends live behind
//! traits ([`domain::traits`]); the embedding process wires its gateway
//! events into [`Dispatcher::run`] and calls [`Router::sync`] /
//! [`Router::teardown`] around it.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interface;
pub mod strings;

pub use application::context::{ContextCache, IgnoredConversations};
pub use application::dispatcher::{Dispatcher, MentionPredicate};
pub use application::registry::CommandRegistry;
pub use application::router::Router;
pub use application::sync::{SyncEngine, SyncReport};
pub use domain::config::AppConfig;
pub use domain::errors::{ConfigError, HandlerError, RegistryError, SyncError};
pub use domain::traits::{
    AddressPredicate, CommandHandler, CompletionBackend, ContextHandler, Gateway, ImageBackend,
};
pub use domain::types::{
    CommandDefinition, CommandRequest, ConversationId, GatewayEvent, InboundMessage, Interaction,
    ParamKind, ParamSpec, RemoteCommand, Role, Scope, TranscriptEntry,
};
