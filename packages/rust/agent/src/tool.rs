//! Tools an agent may hand to the model.

use async_trait::async_trait;

use blogoutline_shared::Result;

use crate::openai::{FunctionSpec, ToolSpec};

/// A function the model can call during an agent run.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Function name the model refers to.
    fn name(&self) -> &str;

    /// One-line description shown to the model.
    fn description(&self) -> &str;

    /// JSON schema of the arguments object.
    fn parameters(&self) -> serde_json::Value;

    /// Execute with already-decoded arguments and return text for the model.
    async fn call(&self, arguments: serde_json::Value) -> Result<String>;

    /// Wire description advertised in the chat request.
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            kind: "function",
            function: FunctionSpec {
                name: self.name().to_string(),
                description: self.description().to_string(),
                parameters: self.parameters(),
            },
        }
    }
}
