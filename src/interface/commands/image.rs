//! # Image Command
//!
//! One-shot image generation. Stateless: it never touches the context
//! cache, the reply is just the rendered image's URL.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::errors::HandlerError;
use crate::domain::traits::{CommandHandler, ImageBackend};
use crate::domain::types::{CommandDefinition, CommandRequest, ParamKind, ParamSpec};

const SIZES: [&str; 3] = ["256x256", "512x512", "1024x1024"];

pub struct ImageCommand {
    backend: Arc<dyn ImageBackend>,
}

impl ImageCommand {
    pub fn new(backend: Arc<dyn ImageBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl CommandHandler for ImageCommand {
    fn definition(&self) -> CommandDefinition {
        CommandDefinition::new("image", "Generate an image from a text prompt")
            .param(ParamSpec::required(
                "prompt",
                "What to draw",
                ParamKind::String,
            ))
            .param(
                ParamSpec::optional("size", "Image size", ParamKind::String)
                    .with_choices(SIZES.iter().map(|s| s.to_string()).collect()),
            )
    }

    async fn invoke(&self, request: CommandRequest) -> Result<String, HandlerError> {
        let prompt = request
            .str_option("prompt")
            .ok_or_else(|| HandlerError::MissingOption("prompt".to_string()))?;
        let size = request.str_option("size");
        self.backend.generate(prompt, size).await
    }
}
