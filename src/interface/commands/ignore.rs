//! # Ignore Command
//!
//! Operator toggle that mutes the bot's context-bearing handling in the
//! current conversation. Structured interactions still work while muted;
//! only free-form message handling is suppressed.

use async_trait::async_trait;
use std::sync::Arc;

use crate::application::context::IgnoredConversations;
use crate::domain::errors::HandlerError;
use crate::domain::traits::CommandHandler;
use crate::domain::types::{CommandDefinition, CommandRequest};
use crate::strings;

pub struct IgnoreCommand {
    ignored: Arc<IgnoredConversations>,
}

impl IgnoreCommand {
    pub fn new(ignored: Arc<IgnoredConversations>) -> Self {
        Self { ignored }
    }
}

#[async_trait]
impl CommandHandler for IgnoreCommand {
    fn definition(&self) -> CommandDefinition {
        CommandDefinition::new(
            "ignore",
            "Toggle whether the bot stays quiet in this conversation",
        )
    }

    async fn invoke(&self, request: CommandRequest) -> Result<String, HandlerError> {
        let muted = self.ignored.toggle(&request.conversation).await;
        Ok(if muted {
            strings::CONVERSATION_MUTED
        } else {
            strings::CONVERSATION_UNMUTED
        }
        .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ConversationId, Interaction};
    use std::collections::HashMap;

    fn request(command: &IgnoreCommand) -> CommandRequest {
        let interaction = Interaction {
            name: "ignore".to_string(),
            conversation: ConversationId::from("thread-1"),
            sender: "operator".to_string(),
            options: HashMap::new(),
        };
        CommandRequest::decode(&command.definition(), &interaction).unwrap()
    }

    #[tokio::test]
    async fn toggles_membership_back_and_forth() {
        let ignored = Arc::new(IgnoredConversations::new());
        let command = IgnoreCommand::new(ignored.clone());
        let id = ConversationId::from("thread-1");

        let reply = command.invoke(request(&command)).await.unwrap();
        assert_eq!(reply, strings::CONVERSATION_MUTED);
        assert!(ignored.contains(&id).await);

        let reply = command.invoke(request(&command)).await.unwrap();
        assert_eq!(reply, strings::CONVERSATION_UNMUTED);
        assert!(!ignored.contains(&id).await);
    }
}
