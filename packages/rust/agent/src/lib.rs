//! LLM agent runtime for the blog outline builder.
//!
//! An [`Agent`] packages a model identity, a persona (role + description),
//! instructions and optional [`Tool`]s, and exposes a single `run` operation
//! against an OpenAI-compatible chat completions API. [`SerpApiSearch`]
//! provides the `search_google` tool used by the research step.

mod agent;
pub mod openai;
mod serpapi;
mod tool;

pub use agent::{Agent, DEFAULT_MAX_TOOL_ROUNDS};
pub use openai::{ChatMessage, ChatRequest, OpenAiClient, Role};
pub use serpapi::SerpApiSearch;
pub use tool::Tool;
