//! The two pipeline steps: preferences → research → outline.
//!
//! Each step is a narrow async trait so the session handler can be driven by
//! the real agents or by deterministic fakes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, instrument};

use blogoutline_agent::{Agent, OpenAiClient, SerpApiSearch};
use blogoutline_shared::{
    ApiKeys, AppConfig, OutlineDocument, PreferencesBlock, ResearchResult, Result,
};

use crate::prompts;

// ---------------------------------------------------------------------------
// Step traits
// ---------------------------------------------------------------------------

/// Finds reference articles for the given preferences.
#[async_trait]
pub trait ResearchStep: Send + Sync {
    async fn submit(&self, keys: &ApiKeys, preferences: &PreferencesBlock)
    -> Result<ResearchResult>;
}

/// Drafts the outline from preferences and research.
#[async_trait]
pub trait OutlineStep: Send + Sync {
    async fn submit(
        &self,
        keys: &ApiKeys,
        preferences: &PreferencesBlock,
        research: &ResearchResult,
    ) -> Result<OutlineDocument>;
}

// ---------------------------------------------------------------------------
// Progress trait
// ---------------------------------------------------------------------------

/// Progress callback for generation.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called once the outline is stored.
    fn done(&self, outline: &OutlineDocument);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _outline: &OutlineDocument) {}
}

// ---------------------------------------------------------------------------
// Agent-backed steps
// ---------------------------------------------------------------------------

fn request_timeout(config: &AppConfig) -> Option<Duration> {
    config.openai.request_timeout_secs.map(Duration::from_secs)
}

fn llm_client(config: &AppConfig, keys: &ApiKeys) -> Result<OpenAiClient> {
    OpenAiClient::new(
        keys.openai.clone(),
        &config.openai.base_url,
        request_timeout(config),
    )
}

/// Research step backed by the "Blog Researcher" agent with a web search tool.
#[derive(Debug, Clone)]
pub struct AgentResearchStep {
    config: AppConfig,
}

impl AgentResearchStep {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Build the researcher for one run. Agents are rebuilt per generation so
    /// freshly entered keys take effect immediately.
    pub fn build_agent(&self, keys: &ApiKeys) -> Result<Agent> {
        let search = SerpApiSearch::new(
            keys.serpapi.clone(),
            &self.config.serpapi.base_url,
            self.config.serpapi.num_results,
            request_timeout(&self.config),
        )?;

        Ok(Agent::new(
            prompts::RESEARCHER_NAME,
            &self.config.openai.research_model,
            llm_client(&self.config, keys)?,
        )
        .role(prompts::RESEARCHER_ROLE)
        .description(prompts::RESEARCHER_DESCRIPTION)
        .instructions(prompts::RESEARCHER_INSTRUCTIONS.iter().copied())
        .tool(Arc::new(search))
        .add_datetime(self.config.agent.add_datetime)
        .max_tool_rounds(self.config.agent.max_tool_rounds))
    }
}

#[async_trait]
impl ResearchStep for AgentResearchStep {
    #[instrument(skip_all, fields(model = %self.config.openai.research_model))]
    async fn submit(
        &self,
        keys: &ApiKeys,
        preferences: &PreferencesBlock,
    ) -> Result<ResearchResult> {
        let agent = self.build_agent(keys)?;
        let text = agent.run(preferences.as_str()).await?;
        info!(chars = text.len(), "research complete");
        Ok(ResearchResult(text))
    }
}

/// Outline step backed by the "Blog Outliner" agent on a reasoning model.
#[derive(Debug, Clone)]
pub struct AgentOutlineStep {
    config: AppConfig,
}

impl AgentOutlineStep {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn build_agent(&self, keys: &ApiKeys) -> Result<Agent> {
        Ok(Agent::new(
            prompts::OUTLINER_NAME,
            &self.config.openai.outline_model,
            llm_client(&self.config, keys)?,
        )
        .role(prompts::OUTLINER_ROLE)
        .description(prompts::OUTLINER_DESCRIPTION)
        .instructions(prompts::outliner_instructions())
        .add_datetime(self.config.agent.add_datetime)
        .max_tool_rounds(self.config.agent.max_tool_rounds))
    }
}

#[async_trait]
impl OutlineStep for AgentOutlineStep {
    #[instrument(skip_all, fields(model = %self.config.openai.outline_model))]
    async fn submit(
        &self,
        keys: &ApiKeys,
        preferences: &PreferencesBlock,
        research: &ResearchResult,
    ) -> Result<OutlineDocument> {
        let agent = self.build_agent(keys)?;
        let input = prompts::outliner_input(preferences, research);
        let text = agent.run(&input).await?;
        info!(chars = text.len(), "outline drafted");
        Ok(OutlineDocument::new(text))
    }
}
