//! # Info Command

use async_trait::async_trait;

use crate::domain::errors::HandlerError;
use crate::domain::traits::CommandHandler;
use crate::domain::types::{CommandDefinition, CommandRequest};

/// Static bot information.
pub struct InfoCommand;

#[async_trait]
impl CommandHandler for InfoCommand {
    fn definition(&self) -> CommandDefinition {
        CommandDefinition::new("info", "Show bot version information")
    }

    async fn invoke(&self, _request: CommandRequest) -> Result<String, HandlerError> {
        Ok(format!(
            "{} v{}: command routing with short-term conversation memory.",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ConversationId, Interaction};
    use std::collections::HashMap;

    #[tokio::test]
    async fn reports_package_version() {
        let command = InfoCommand;
        let interaction = Interaction {
            name: "info".to_string(),
            conversation: ConversationId::from("thread-1"),
            sender: "alice".to_string(),
            options: HashMap::new(),
        };
        let request = CommandRequest::decode(&command.definition(), &interaction).unwrap();

        let reply = command.invoke(request).await.unwrap();
        assert!(reply.contains(env!("CARGO_PKG_VERSION")));
    }
}
