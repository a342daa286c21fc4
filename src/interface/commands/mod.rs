//! # Command Handlers
//!
//! The built-in commands registered with the router at startup.

pub mod chat;
pub mod ignore;
pub mod image;
pub mod info;

pub use chat::ChatCommand;
pub use ignore::IgnoreCommand;
pub use image::ImageCommand;
pub use info::InfoCommand;
