//! Anthropic provider implementation
//!
//! Messages-API client with client-side throttling.

pub mod client;
pub mod completion;
pub mod types;

pub use client::AnthropicClient;
pub use completion::AnthropicCompletionClient;
