//! Minimal OpenAI-compatible chat-completions client.

mod client;
mod types;

pub use client::{truncate, LlmClient};
pub use types::{ChatRequest, Message};
