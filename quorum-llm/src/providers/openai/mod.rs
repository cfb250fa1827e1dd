//! OpenAI provider implementation
//!
//! Chat-completions client with client-side throttling.

pub mod client;
pub mod completion;
pub mod types;

pub use client::OpenAIClient;
pub use completion::OpenAICompletionClient;
