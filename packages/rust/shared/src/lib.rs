//! Shared types, error model, and configuration for the blog outline builder.
//!
//! This crate is the foundation depended on by all other workspace crates.
//! It provides:
//! - [`BlogOutlineError`]: the unified error type
//! - Domain types ([`BlogPreferences`], [`Credentials`], [`OutlineDocument`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AgentConfig, AppConfig, OpenAiConfig, OutputConfig, SerpApiConfig, config_dir,
    config_file_path, credentials_from_env, init_config, load_config, load_config_from,
};
pub use error::{BlogOutlineError, Result};
pub use types::{
    ApiKeys, BlogPreferences, Credential, Credentials, Domain, Intent, OutlineDocument,
    PointOfView, PreferencesBlock, ResearchResult, SessionId, Tone, WordCount,
};
