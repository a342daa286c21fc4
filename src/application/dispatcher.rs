//! # Event Dispatcher
//!
//! Routes gateway events to handlers. Each event's handler runs on its own
//! spawned task, so two events arriving close together execute
//! concurrently; the context cache and ignored set are the only shared
//! state. Handler errors and panics are contained at this boundary and
//! turned into a generic visible reply.

use futures::FutureExt;
use regex::Regex;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::application::context::{ContextCache, IgnoredConversations};
use crate::application::registry::CommandRegistry;
use crate::domain::traits::{AddressPredicate, ContextHandler, Gateway};
use crate::domain::types::{
    CommandRequest, ConversationId, GatewayEvent, InboundMessage, Interaction, TranscriptEntry,
};
use crate::strings;

pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    gateway: Arc<dyn Gateway>,
    cache: Arc<ContextCache>,
    ignored: Arc<IgnoredConversations>,
    context_handler: Option<Arc<dyn ContextHandler>>,
    addressed: Arc<dyn AddressPredicate>,
}

impl Dispatcher {
    pub(crate) fn new(
        registry: Arc<CommandRegistry>,
        gateway: Arc<dyn Gateway>,
        cache: Arc<ContextCache>,
        ignored: Arc<IgnoredConversations>,
        context_handler: Option<Arc<dyn ContextHandler>>,
        addressed: Arc<dyn AddressPredicate>,
    ) -> Self {
        Self {
            registry,
            gateway,
            cache,
            ignored,
            context_handler,
            addressed,
        }
    }

    /// Drains the inbound event stream until the sender side closes,
    /// spawning one task per event.
    pub async fn run(self: Arc<Self>, mut events: mpsc::Receiver<GatewayEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                GatewayEvent::Interaction(interaction) => {
                    let _ = self.on_interaction(interaction);
                }
                GatewayEvent::Message(message) => {
                    let _ = self.on_message(message);
                }
            }
        }
    }

    /// Entry point for a structured command invocation. Returns the task
    /// handle so callers (and tests) can await completion.
    pub fn on_interaction(self: &Arc<Self>, interaction: Interaction) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move { this.dispatch_interaction(interaction).await })
    }

    /// Entry point for a free-form message.
    pub fn on_message(self: &Arc<Self>, message: InboundMessage) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move { this.dispatch_message(message).await })
    }

    async fn dispatch_interaction(&self, interaction: Interaction) {
        info!(
            command = %interaction.name,
            conversation = %interaction.conversation,
            sender = %interaction.sender,
            "dispatching interaction"
        );

        let Some(handler) = self.registry.find(&interaction.name) else {
            warn!(command = %interaction.name, "unknown command");
            self.reply(
                &interaction.conversation,
                &strings::unknown_command(&interaction.name),
            )
            .await;
            return;
        };

        let request = match CommandRequest::decode(&handler.definition(), &interaction) {
            Ok(request) => request,
            Err(err) => {
                warn!(command = %interaction.name, error = %err, "rejected interaction options");
                self.reply(
                    &interaction.conversation,
                    &strings::invalid_request(&err.to_string()),
                )
                .await;
                return;
            }
        };

        match AssertUnwindSafe(handler.invoke(request)).catch_unwind().await {
            Ok(Ok(reply)) => self.reply(&interaction.conversation, &reply).await,
            Ok(Err(err)) => {
                error!(command = %interaction.name, error = %err, "handler failed");
                self.reply(&interaction.conversation, strings::HANDLER_FAILED)
                    .await;
            }
            Err(_) => {
                error!(command = %interaction.name, "handler panicked");
                self.reply(&interaction.conversation, strings::HANDLER_FAILED)
                    .await;
            }
        }
    }

    async fn dispatch_message(&self, message: InboundMessage) {
        // Loop prevention first, then the operator mute.
        if message.self_authored {
            return;
        }
        if self.ignored.contains(&message.conversation).await {
            return;
        }
        let Some(handler) = &self.context_handler else {
            return;
        };
        if !self.addressed.addressed(&message) {
            return;
        }

        info!(
            conversation = %message.conversation,
            sender = %message.sender,
            "dispatching addressed message"
        );

        let conversation = message.conversation.clone();
        self.cache
            .append(&conversation, TranscriptEntry::user(&message.content))
            .await;
        // Snapshot is a clone; the cache lock is released before the
        // (possibly slow) backend call.
        let transcript = self.cache.transcript(&conversation).await;

        match AssertUnwindSafe(handler.respond(&conversation, &transcript))
            .catch_unwind()
            .await
        {
            Ok(Ok(reply)) => {
                self.cache
                    .append(&conversation, TranscriptEntry::assistant(&reply))
                    .await;
                self.reply(&conversation, &reply).await;
            }
            Ok(Err(err)) => {
                error!(conversation = %conversation, error = %err, "context handler failed");
                self.reply(&conversation, strings::HANDLER_FAILED).await;
            }
            Err(_) => {
                error!(conversation = %conversation, "context handler panicked");
                self.reply(&conversation, strings::HANDLER_FAILED).await;
            }
        }
    }

    async fn reply(&self, conversation: &ConversationId, text: &str) {
        if let Err(err) = self.gateway.send_reply(conversation, text).await {
            error!(conversation = %conversation, error = %err, "failed to send reply");
        }
    }
}

/// Default addressed-to-bot heuristic: a mention tag for the bot's user id
/// (`<@id>` or `<@!id>`) anywhere in the message, or a direct reply to one
/// of the bot's messages.
pub struct MentionPredicate {
    mention: Regex,
}

impl MentionPredicate {
    pub fn new(bot_id: &str) -> Self {
        let pattern = format!("<@!?{}>", regex::escape(bot_id));
        Self {
            mention: Regex::new(&pattern).expect("mention pattern is valid"),
        }
    }
}

impl AddressPredicate for MentionPredicate {
    fn addressed(&self, message: &InboundMessage) -> bool {
        message.reply_to_bot || self.mention.is_match(&message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(content: &str, reply_to_bot: bool) -> InboundMessage {
        InboundMessage {
            conversation: ConversationId::from("thread-1"),
            sender: "alice".to_string(),
            content: content.to_string(),
            self_authored: false,
            reply_to_bot,
        }
    }

    #[test]
    fn mention_tag_is_addressed() {
        let predicate = MentionPredicate::new("99");
        assert!(predicate.addressed(&message("<@99> hello", false)));
        assert!(predicate.addressed(&message("hey <@!99>, got a sec?", false)));
    }

    #[test]
    fn reply_to_bot_is_addressed() {
        let predicate = MentionPredicate::new("99");
        assert!(predicate.addressed(&message("sounds good", true)));
    }

    #[test]
    fn plain_chatter_is_not_addressed() {
        let predicate = MentionPredicate::new("99");
        assert!(!predicate.addressed(&message("good morning everyone", false)));
        // A mention of somebody else does not count.
        assert!(!predicate.addressed(&message("<@100> hello", false)));
    }
}
