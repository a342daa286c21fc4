//! # Messages
//!
//! User-facing reply strings and format functions.

pub const HANDLER_FAILED: &str = "Something went wrong while handling that. Please try again.";
pub const CONVERSATION_MUTED: &str = "Okay, staying quiet in this conversation.";
pub const CONVERSATION_UNMUTED: &str = "Back in the conversation.";

pub fn unknown_command(name: &str) -> String {
    format!("Unknown command `/{name}`.")
}

pub fn invalid_request(reason: &str) -> String {
    format!("Could not run that command: {reason}.")
}
