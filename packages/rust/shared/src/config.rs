//! Application configuration for the blog outline builder.
//!
//! User config lives at `~/.blogoutline/blogoutline.toml`.
//! CLI flags override config file values, which override defaults.
//! API keys are never stored here; the config only names the environment
//! variables that hold them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{BlogOutlineError, Result};
use crate::types::Credentials;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "blogoutline.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".blogoutline";

// ---------------------------------------------------------------------------
// Config structs (matching blogoutline.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// LLM API settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Web search API settings.
    #[serde(default)]
    pub serpapi: SerpApiConfig,

    /// Agent runtime settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Download settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[openai]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_openai_key_env")]
    pub api_key_env: String,

    /// Base URL of the chat completions API.
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Model used by the research agent.
    #[serde(default = "default_research_model")]
    pub research_model: String,

    /// Reasoning model used by the outline agent.
    #[serde(default = "default_outline_model")]
    pub outline_model: String,

    /// Per-request timeout. Unset means the HTTP client default (none).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_openai_key_env(),
            base_url: default_openai_base_url(),
            research_model: default_research_model(),
            outline_model: default_outline_model(),
            request_timeout_secs: None,
        }
    }
}

fn default_openai_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_research_model() -> String {
    "gpt-4o".into()
}
fn default_outline_model() -> String {
    "o3-mini".into()
}

/// `[serpapi]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerpApiConfig {
    /// Name of the env var holding the API key.
    #[serde(default = "default_serp_key_env")]
    pub api_key_env: String,

    /// Base URL of the search API.
    #[serde(default = "default_serp_base_url")]
    pub base_url: String,

    /// Results requested per search.
    #[serde(default = "default_num_results")]
    pub num_results: u32,
}

impl Default for SerpApiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_serp_key_env(),
            base_url: default_serp_base_url(),
            num_results: default_num_results(),
        }
    }
}

fn default_serp_key_env() -> String {
    "SERPAPI_API_KEY".into()
}
fn default_serp_base_url() -> String {
    "https://serpapi.com".into()
}
fn default_num_results() -> u32 {
    10
}

/// `[agent]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Upper bound on model → tool → model round trips per agent run.
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: u32,

    /// Append the current date and time to agent instructions.
    #[serde(default = "default_true")]
    pub add_datetime: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: default_max_tool_rounds(),
            add_datetime: true,
        }
    }
}

fn default_max_tool_rounds() -> u32 {
    5
}
fn default_true() -> bool {
    true
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File name offered for the outline download.
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
        }
    }
}

fn default_file_name() -> String {
    "blog_outline.txt".into()
}

impl AppConfig {
    /// Check that configured URLs parse and numeric limits are usable.
    pub fn validate(&self) -> Result<()> {
        for (name, raw) in [
            ("openai.base_url", &self.openai.base_url),
            ("serpapi.base_url", &self.serpapi.base_url),
        ] {
            Url::parse(raw)
                .map_err(|e| BlogOutlineError::config(format!("invalid {name} '{raw}': {e}")))?;
        }
        if self.agent.max_tool_rounds == 0 {
            return Err(BlogOutlineError::config(
                "agent.max_tool_rounds must be at least 1",
            ));
        }
        if self.output.file_name.trim().is_empty() {
            return Err(BlogOutlineError::config("output.file_name must not be empty"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.blogoutline/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| BlogOutlineError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.blogoutline/blogoutline.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BlogOutlineError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        BlogOutlineError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| BlogOutlineError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| BlogOutlineError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| BlogOutlineError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Seed session credentials from the configured environment variables.
///
/// Unset or empty variables simply leave the matching key absent.
pub fn credentials_from_env(config: &AppConfig) -> Credentials {
    let mut creds = Credentials::default();
    if let Ok(val) = std::env::var(&config.openai.api_key_env) {
        creds.set_openai_key(&val);
    }
    if let Ok(val) = std::env::var(&config.serpapi.api_key_env) {
        creds.set_serp_key(&val);
    }
    creds
}
