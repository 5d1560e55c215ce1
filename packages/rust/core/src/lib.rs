//! Core pipeline orchestration and domain logic for the blog outline builder.
//!
//! This crate ties the preferences form, the research and outline agents, and
//! the session state into one generation workflow.

pub mod pipeline;
pub mod preferences;
pub mod prompts;
pub mod render;
pub mod session;

pub use pipeline::{
    AgentOutlineStep, AgentResearchStep, OutlineStep, ProgressReporter, ResearchStep,
    SilentProgress,
};
pub use preferences::compose_block;
pub use session::{Download, Session, SessionState};
