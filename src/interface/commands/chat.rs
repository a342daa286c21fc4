//! # Chat Command
//!
//! Conversational completion over the bounded context cache. Registered as
//! the `chat` interaction and also installed as the handler for free-form
//! messages addressed to the bot, so both paths share one transcript per
//! conversation.

use async_trait::async_trait;
use std::sync::Arc;

use crate::application::context::ContextCache;
use crate::domain::errors::HandlerError;
use crate::domain::traits::{CommandHandler, CompletionBackend, ContextHandler};
use crate::domain::types::{
    CommandDefinition, CommandRequest, ConversationId, ParamKind, ParamSpec, TranscriptEntry,
};

pub struct ChatCommand {
    backend: Arc<dyn CompletionBackend>,
    cache: Arc<ContextCache>,
    models: Vec<String>,
}

impl ChatCommand {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        cache: Arc<ContextCache>,
        models: Vec<String>,
    ) -> Self {
        Self {
            backend,
            cache,
            models,
        }
    }

    async fn complete(
        &self,
        conversation: &ConversationId,
        prompt: &str,
        model: Option<&str>,
    ) -> Result<String, HandlerError> {
        self.cache
            .append(conversation, TranscriptEntry::user(prompt))
            .await;
        // Snapshot only; the cache lock is not held across the backend
        // call.
        let history = self.cache.transcript(conversation).await;
        let reply = self.backend.generate(&history, model).await?;
        self.cache
            .append(conversation, TranscriptEntry::assistant(&reply))
            .await;
        Ok(reply)
    }
}

#[async_trait]
impl CommandHandler for ChatCommand {
    fn definition(&self) -> CommandDefinition {
        let mut definition = CommandDefinition::new(
            "chat",
            "Chat with the assistant, with short-term conversation memory",
        )
        .param(ParamSpec::required(
            "prompt",
            "What to say",
            ParamKind::String,
        ));
        if !self.models.is_empty() {
            definition = definition.param(
                ParamSpec::optional("model", "Completion model to use", ParamKind::String)
                    .with_choices(self.models.clone()),
            );
        }
        definition
    }

    async fn invoke(&self, request: CommandRequest) -> Result<String, HandlerError> {
        let prompt = request
            .str_option("prompt")
            .ok_or_else(|| HandlerError::MissingOption("prompt".to_string()))?;
        let model = request.str_option("model");
        self.complete(&request.conversation, prompt, model).await
    }
}

#[async_trait]
impl ContextHandler for ChatCommand {
    async fn respond(
        &self,
        _conversation: &ConversationId,
        transcript: &[TranscriptEntry],
    ) -> Result<String, HandlerError> {
        // The dispatcher already appended the inbound message and will
        // append the reply; only the generation happens here.
        self.backend.generate(transcript, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Interaction, Role};
    use serde_json::json;
    use std::collections::HashMap;

    struct EchoBackend;

    #[async_trait]
    impl CompletionBackend for EchoBackend {
        async fn generate(
            &self,
            history: &[TranscriptEntry],
            model: Option<&str>,
        ) -> Result<String, HandlerError> {
            let last = history
                .last()
                .map(|e| e.content.as_str())
                .unwrap_or_default();
            Ok(match model {
                Some(model) => format!("[{model}] {last}"),
                None => last.to_string(),
            })
        }
    }

    fn command(models: Vec<String>) -> (ChatCommand, Arc<ContextCache>) {
        let cache = Arc::new(ContextCache::new(8).unwrap());
        let command = ChatCommand::new(Arc::new(EchoBackend), cache.clone(), models);
        (command, cache)
    }

    fn request(command: &ChatCommand, options: HashMap<String, serde_json::Value>) -> CommandRequest {
        let interaction = Interaction {
            name: "chat".to_string(),
            conversation: ConversationId::from("thread-1"),
            sender: "alice".to_string(),
            options,
        };
        CommandRequest::decode(&command.definition(), &interaction).unwrap()
    }

    #[test]
    fn model_choices_only_appear_when_configured() {
        let (without, _) = command(Vec::new());
        assert_eq!(without.definition().params.len(), 1);

        let (with, _) = command(vec!["gpt-4".to_string()]);
        let definition = with.definition();
        assert_eq!(definition.params.len(), 2);
        assert_eq!(definition.params[1].choices, ["gpt-4"]);
    }

    #[tokio::test]
    async fn invoke_appends_both_turns_in_order() {
        let (command, cache) = command(Vec::new());
        let mut options = HashMap::new();
        options.insert("prompt".to_string(), json!("hello there"));

        let reply = command.invoke(request(&command, options)).await.unwrap();
        assert_eq!(reply, "hello there");

        let transcript = cache.transcript(&ConversationId::from("thread-1")).await;
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].role, Role::User);
        assert_eq!(transcript[0].content, "hello there");
        assert_eq!(transcript[1].role, Role::Assistant);
        assert_eq!(transcript[1].content, "hello there");
    }

    #[tokio::test]
    async fn invoke_passes_selected_model_to_backend() {
        let (command, _) = command(vec!["gpt-4".to_string()]);
        let mut options = HashMap::new();
        options.insert("prompt".to_string(), json!("hi"));
        options.insert("model".to_string(), json!("gpt-4"));

        let reply = command.invoke(request(&command, options)).await.unwrap();
        assert_eq!(reply, "[gpt-4] hi");
    }

    #[tokio::test]
    async fn respond_generates_without_touching_the_cache() {
        let (command, cache) = command(Vec::new());
        let transcript = vec![TranscriptEntry::user("ping")];

        let reply = command
            .respond(&ConversationId::from("thread-1"), &transcript)
            .await
            .unwrap();
        assert_eq!(reply, "ping");
        assert_eq!(cache.tracked().await, 0);
    }
}
