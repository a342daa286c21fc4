//! # Core Types
//!
//! Command definitions and their parameter schemas, the gateway's view of a
//! registered command, inbound events, and conversation transcripts.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use crate::domain::errors::HandlerError;

/// Opaque key naming a channel, thread, or DM in the gateway's namespace.
/// Used as the cache key and ignored-set member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ConversationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Remote registration domain for commands: every conversation the bot can
/// see, or a single guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Global,
    Guild(String),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => f.write_str("global"),
            Scope::Guild(id) => write!(f, "guild {id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
    Boolean,
}

/// One typed, possibly-required command parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub description: String,
    pub kind: ParamKind,
    pub required: bool,
    /// Allowed values for string parameters; empty means unconstrained.
    pub choices: Vec<String>,
}

impl ParamSpec {
    pub fn required(
        name: impl Into<String>,
        description: impl Into<String>,
        kind: ParamKind,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: true,
            choices: Vec::new(),
        }
    }

    pub fn optional(
        name: impl Into<String>,
        description: impl Into<String>,
        kind: ParamKind,
    ) -> Self {
        Self {
            required: false,
            ..Self::required(name, description, kind)
        }
    }

    pub fn with_choices(mut self, choices: Vec<String>) -> Self {
        self.choices = choices;
        self
    }
}

/// Declarative description of a remote-invocable command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandDefinition {
    pub name: String,
    pub description: String,
    pub params: Vec<ParamSpec>,
}

impl CommandDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }
}

/// The gateway's view of a registered command. Only used during sync.
#[derive(Debug, Clone)]
pub struct RemoteCommand {
    pub id: String,
    pub name: String,
    pub description: String,
    pub params: Vec<ParamSpec>,
}

impl RemoteCommand {
    /// Whether the remote record already matches a local definition, making
    /// a remote update unnecessary.
    pub fn matches(&self, definition: &CommandDefinition) -> bool {
        self.name == definition.name
            && self.description == definition.description
            && self.params == definition.params
    }
}

/// Speaker of a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

/// One conversational turn. Insertion order is conversational order and
/// must be preserved exactly.
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl TranscriptEntry {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// A structured, schema-validated remote command invocation.
#[derive(Debug, Clone)]
pub struct Interaction {
    pub name: String,
    pub conversation: ConversationId,
    pub sender: String,
    /// Raw option values as delivered by the gateway, keyed by name.
    pub options: HashMap<String, Value>,
}

/// A free-form chat message.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub conversation: ConversationId,
    pub sender: String,
    pub content: String,
    /// Set by the gateway adapter when the bot authored the message itself.
    pub self_authored: bool,
    /// Set when the message is a direct reply to one of the bot's messages.
    pub reply_to_bot: bool,
}

/// The two event kinds the dispatcher receives from the gateway.
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    Interaction(Interaction),
    Message(InboundMessage),
}

/// A decoded option value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    String(String),
    Integer(i64),
    Boolean(bool),
}

/// Normalized handler request: the interaction's options validated against
/// the command's parameter schema.
#[derive(Debug, Clone)]
pub struct CommandRequest {
    pub conversation: ConversationId,
    pub sender: String,
    options: HashMap<String, OptionValue>,
}

impl CommandRequest {
    /// Validates the interaction's raw options against `definition`.
    /// Missing required options, type mismatches, and values outside a
    /// parameter's choice list are all rejected. Options the schema does
    /// not know are dropped.
    pub fn decode(
        definition: &CommandDefinition,
        interaction: &Interaction,
    ) -> Result<Self, HandlerError> {
        let mut options = HashMap::new();
        for spec in &definition.params {
            let Some(raw) = interaction.options.get(&spec.name) else {
                if spec.required {
                    return Err(HandlerError::MissingOption(spec.name.clone()));
                }
                continue;
            };

            let value = match spec.kind {
                ParamKind::String => raw.as_str().map(|s| OptionValue::String(s.to_string())),
                ParamKind::Integer => raw.as_i64().map(OptionValue::Integer),
                ParamKind::Boolean => raw.as_bool().map(OptionValue::Boolean),
            }
            .ok_or_else(|| HandlerError::BadOption(spec.name.clone()))?;

            if !spec.choices.is_empty() {
                if let OptionValue::String(s) = &value {
                    if !spec.choices.iter().any(|choice| choice == s) {
                        return Err(HandlerError::BadOption(spec.name.clone()));
                    }
                }
            }

            options.insert(spec.name.clone(), value);
        }

        Ok(Self {
            conversation: interaction.conversation.clone(),
            sender: interaction.sender.clone(),
            options,
        })
    }

    pub fn str_option(&self, name: &str) -> Option<&str> {
        match self.options.get(name) {
            Some(OptionValue::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn int_option(&self, name: &str) -> Option<i64> {
        match self.options.get(name) {
            Some(OptionValue::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn bool_option(&self, name: &str) -> Option<bool> {
        match self.options.get(name) {
            Some(OptionValue::Boolean(b)) => Some(*b),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn definition() -> CommandDefinition {
        CommandDefinition::new("chat", "Chat with the assistant")
            .param(ParamSpec::required("prompt", "What to say", ParamKind::String))
            .param(
                ParamSpec::optional("model", "Model to use", ParamKind::String)
                    .with_choices(vec!["gpt-4".to_string(), "gpt-3.5-turbo".to_string()]),
            )
            .param(ParamSpec::optional("count", "How many", ParamKind::Integer))
    }

    fn interaction(options: HashMap<String, Value>) -> Interaction {
        Interaction {
            name: "chat".to_string(),
            conversation: ConversationId::from("thread-1"),
            sender: "alice".to_string(),
            options,
        }
    }

    #[test]
    fn decode_reads_typed_options() {
        let mut options = HashMap::new();
        options.insert("prompt".to_string(), json!("hello"));
        options.insert("model".to_string(), json!("gpt-4"));
        options.insert("count".to_string(), json!(3));

        let request = CommandRequest::decode(&definition(), &interaction(options)).unwrap();
        assert_eq!(request.str_option("prompt"), Some("hello"));
        assert_eq!(request.str_option("model"), Some("gpt-4"));
        assert_eq!(request.int_option("count"), Some(3));
    }

    #[test]
    fn decode_rejects_missing_required_option() {
        let err = CommandRequest::decode(&definition(), &interaction(HashMap::new())).unwrap_err();
        assert!(matches!(err, HandlerError::MissingOption(name) if name == "prompt"));
    }

    #[test]
    fn decode_rejects_wrong_type() {
        let mut options = HashMap::new();
        options.insert("prompt".to_string(), json!(42));

        let err = CommandRequest::decode(&definition(), &interaction(options)).unwrap_err();
        assert!(matches!(err, HandlerError::BadOption(name) if name == "prompt"));
    }

    #[test]
    fn decode_enforces_choices() {
        let mut options = HashMap::new();
        options.insert("prompt".to_string(), json!("hello"));
        options.insert("model".to_string(), json!("llama-7b"));

        let err = CommandRequest::decode(&definition(), &interaction(options)).unwrap_err();
        assert!(matches!(err, HandlerError::BadOption(name) if name == "model"));
    }

    #[test]
    fn decode_drops_unknown_options() {
        let mut options = HashMap::new();
        options.insert("prompt".to_string(), json!("hello"));
        options.insert("bogus".to_string(), json!("value"));

        let request = CommandRequest::decode(&definition(), &interaction(options)).unwrap();
        assert_eq!(request.str_option("bogus"), None);
    }

    #[test]
    fn remote_command_matches_on_name_description_and_schema() {
        let definition = definition();
        let remote = RemoteCommand {
            id: "1".to_string(),
            name: definition.name.clone(),
            description: definition.description.clone(),
            params: definition.params.clone(),
        };
        assert!(remote.matches(&definition));

        let renamed = CommandDefinition {
            description: "Something else".to_string(),
            ..definition
        };
        assert!(!remote.matches(&renamed));
    }
}
