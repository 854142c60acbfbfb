//! Slash command relay: authenticate the callback, pick a disguise, and
//! re-post the text through the incoming webhook.

pub mod command;
pub mod handler;
pub mod message;
pub mod webhook;

pub use command::SlashCommand;
pub use handler::{Delivery, Relay};
pub use message::OutboundMessage;
pub use webhook::WebhookClient;
