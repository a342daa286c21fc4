//! # Domain Traits
//!
//! Abstract interfaces at the system's seams: the gateway, the two handler
//! capabilities, the addressed-to-bot heuristic, and the generation
//! backends. Infrastructure supplies the concrete implementations; tests
//! supply fakes.

use async_trait::async_trait;

use crate::domain::errors::HandlerError;
use crate::domain::types::{
    CommandDefinition, CommandRequest, ConversationId, InboundMessage, RemoteCommand, Scope,
    TranscriptEntry,
};

/// The remote chat service: command registration surface and reply sink.
/// The connection lifecycle (connect, heartbeat, reconnect) is assumed
/// established before any of these are called.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn list_commands(&self, scope: &Scope) -> anyhow::Result<Vec<RemoteCommand>>;

    async fn create_command(
        &self,
        scope: &Scope,
        definition: &CommandDefinition,
    ) -> anyhow::Result<RemoteCommand>;

    async fn update_command(
        &self,
        scope: &Scope,
        id: &str,
        definition: &CommandDefinition,
    ) -> anyhow::Result<RemoteCommand>;

    async fn delete_command(&self, scope: &Scope, id: &str) -> anyhow::Result<()>;

    async fn send_reply(&self, conversation: &ConversationId, text: &str) -> anyhow::Result<()>;
}

/// A named, schema-described command invocable through the gateway.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    fn definition(&self) -> CommandDefinition;

    /// Invoked exactly once per interaction, on the dispatching task. The
    /// returned string becomes the visible reply.
    async fn invoke(&self, request: CommandRequest) -> Result<String, HandlerError>;
}

/// Capability for free-form messages that carry conversational context.
#[async_trait]
pub trait ContextHandler: Send + Sync {
    /// `transcript` already contains the inbound message as its last turn;
    /// the dispatcher appends the returned reply afterwards. No cache lock
    /// is held while this runs.
    async fn respond(
        &self,
        conversation: &ConversationId,
        transcript: &[TranscriptEntry],
    ) -> Result<String, HandlerError>;
}

/// Heuristic deciding whether a free-form message is addressed to the bot.
pub trait AddressPredicate: Send + Sync {
    fn addressed(&self, message: &InboundMessage) -> bool;
}

/// Chat-completion backend, invoked only from inside handlers.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn generate(
        &self,
        history: &[TranscriptEntry],
        model: Option<&str>,
    ) -> Result<String, HandlerError>;
}

/// Image-generation backend. Returns a URL to the rendered image.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    async fn generate(&self, prompt: &str, size: Option<&str>) -> Result<String, HandlerError>;
}
