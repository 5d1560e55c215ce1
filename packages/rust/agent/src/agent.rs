//! The agent abstraction: model identity, persona, instructions and tools
//! behind a single `run(input) -> text` operation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use blogoutline_shared::{BlogOutlineError, Result};

use crate::openai::{ChatMessage, ChatRequest, OpenAiClient, ToolCall};
use crate::tool::Tool;

/// Default bound on model → tool → model round trips.
pub const DEFAULT_MAX_TOOL_ROUNDS: u32 = 5;

/// A configured LLM agent.
#[derive(Clone)]
pub struct Agent {
    name: String,
    model: String,
    role: Option<String>,
    description: Option<String>,
    instructions: Vec<String>,
    tools: Vec<Arc<dyn Tool>>,
    add_datetime: bool,
    max_tool_rounds: u32,
    client: OpenAiClient,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("tools", &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Agent {
    pub fn new(name: impl Into<String>, model: impl Into<String>, client: OpenAiClient) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            role: None,
            description: None,
            instructions: Vec::new(),
            tools: Vec::new(),
            add_datetime: false,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            client,
        }
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn instructions<I, S>(mut self, instructions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instructions.extend(instructions.into_iter().map(Into::into));
        self
    }

    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn add_datetime(mut self, enabled: bool) -> Self {
        self.add_datetime = enabled;
        self
    }

    pub fn max_tool_rounds(mut self, rounds: u32) -> Self {
        self.max_tool_rounds = rounds.max(1);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// System message for a run starting at `now`.
    pub fn system_prompt(&self, now: DateTime<Utc>) -> String {
        let mut sections = Vec::new();

        if let Some(description) = &self.description {
            sections.push(description.trim().to_string());
        }
        if let Some(role) = &self.role {
            sections.push(format!("<your_role>\n{}\n</your_role>", role.trim()));
        }
        if !self.instructions.is_empty() {
            let lines: Vec<String> = self
                .instructions
                .iter()
                .map(|i| format!("- {}", i.trim()))
                .collect();
            sections.push(format!("<instructions>\n{}\n</instructions>", lines.join("\n")));
        }
        if self.add_datetime {
            sections.push(format!(
                "<additional_information>\n- The current time is {}.\n</additional_information>",
                now.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }

        sections.join("\n\n")
    }

    /// Run the agent on `input` until the model answers without tool calls.
    ///
    /// Tool failures caused by bad model arguments are reported back to the
    /// model; transport and API failures abort the run.
    #[instrument(skip_all, fields(agent = %self.name, model = %self.model))]
    pub async fn run(&self, input: &str) -> Result<String> {
        let mut messages = vec![
            ChatMessage::system(self.system_prompt(Utc::now())),
            ChatMessage::user(input),
        ];
        let tools = self.tools.iter().map(|t| t.spec()).collect::<Vec<_>>();

        info!("agent run started");

        for round in 0..=self.max_tool_rounds {
            let request = ChatRequest {
                model: self.model.clone(),
                messages: messages.clone(),
                tools: tools.clone(),
            };
            let reply = self.client.chat(&request).await?;

            if reply.requested_tools().is_empty() {
                let content = reply.content.ok_or_else(|| {
                    BlogOutlineError::Agent(format!("{} returned no content", self.name))
                })?;
                info!(rounds = round, chars = content.len(), "agent run finished");
                return Ok(content);
            }

            if round == self.max_tool_rounds {
                break;
            }

            let calls = reply.requested_tools().to_vec();
            messages.push(reply);
            for call in &calls {
                let output = self.dispatch(call).await?;
                messages.push(ChatMessage::tool(&call.id, output));
            }
        }

        Err(BlogOutlineError::Agent(format!(
            "{} exceeded {} tool rounds without answering",
            self.name, self.max_tool_rounds
        )))
    }

    async fn dispatch(&self, call: &ToolCall) -> Result<String> {
        let name = call.function.name.as_str();
        let Some(tool) = self.tools.iter().find(|t| t.name() == name) else {
            warn!(tool = name, "model requested unknown tool");
            return Ok(format!("error: unknown tool '{name}'"));
        };

        let arguments: serde_json::Value = match serde_json::from_str(&call.function.arguments) {
            Ok(v) => v,
            Err(e) => {
                warn!(tool = name, error = %e, "model sent malformed tool arguments");
                return Ok(format!("error: arguments are not valid JSON: {e}"));
            }
        };

        debug!(tool = name, %arguments, "calling tool");
        match tool.call(arguments).await {
            Ok(output) => Ok(output),
            Err(BlogOutlineError::Validation { message }) => Ok(format!("error: {message}")),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use serde_json::json;
    use std::sync::Mutex;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Records every query it receives.
    struct EchoSearch {
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Tool for EchoSearch {
        fn name(&self) -> &str {
            "search_google"
        }
        fn description(&self) -> &str {
            "test search"
        }
        fn parameters(&self) -> serde_json::Value {
            json!({ "type": "object", "properties": { "query": { "type": "string" } } })
        }
        async fn call(&self, arguments: serde_json::Value) -> Result<String> {
            let q = arguments["query"].as_str().unwrap_or_default().to_string();
            self.queries.lock().unwrap().push(q.clone());
            Ok(format!("[{{\"title\":\"Result for {q}\",\"link\":\"https://example.com/a\"}}]"))
        }
    }

    fn client(server: &MockServer) -> OpenAiClient {
        OpenAiClient::new("sk-test", &format!("{}/v1", server.uri()), None).unwrap()
    }

    fn tool_call_reply() -> serde_json::Value {
        json!({
            "choices": [{
                "finish_reason": "tool_calls",
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "search_google",
                            "arguments": "{\"query\":\"habit blogs for professionals\"}"
                        }
                    }]
                }
            }]
        })
    }

    fn final_reply(text: &str) -> serde_json::Value {
        json!({
            "choices": [{
                "finish_reason": "stop",
                "message": { "role": "assistant", "content": text }
            }]
        })
    }

    #[test]
    fn system_prompt_layout() {
        let server_less = OpenAiClient::new("k", "https://api.openai.com/v1", None).unwrap();
        let agent = Agent::new("Blog Researcher", "gpt-4o", server_less)
            .description("You are a research expert.")
            .role("Finds articles.")
            .instructions(["Read the preferences.", "Use `search_google`."])
            .add_datetime(true);

        let now = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
        let prompt = agent.system_prompt(now);
        assert!(prompt.starts_with("You are a research expert."));
        assert!(prompt.contains("<your_role>\nFinds articles.\n</your_role>"));
        assert!(prompt.contains("- Read the preferences.\n- Use `search_google`."));
        assert!(prompt.contains("The current time is 2026-10-16 09:30:00 UTC."));
    }

    #[test]
    fn system_prompt_omits_datetime_when_disabled() {
        let c = OpenAiClient::new("k", "https://api.openai.com/v1", None).unwrap();
        let agent = Agent::new("Blog Outliner", "o3-mini", c).instructions(["One."]);
        let prompt = agent.system_prompt(Utc::now());
        assert!(!prompt.contains("additional_information"));
        assert_eq!(prompt, "<instructions>\n- One.\n</instructions>");
    }

    #[tokio::test]
    async fn run_without_tools_returns_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_string_contains("draft this"))
            .respond_with(ResponseTemplate::new(200).set_body_json(final_reply("## Outline")))
            .expect(1)
            .mount(&server)
            .await;

        let agent = Agent::new("Blog Outliner", "o3-mini", client(&server));
        let out = agent.run("draft this").await.unwrap();
        assert_eq!(out, "## Outline");
    }

    #[tokio::test]
    async fn run_executes_tool_calls_then_answers() {
        let server = MockServer::start().await;

        // First request has no tool result yet.
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tool_call_reply()))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_string_contains("\"tool_call_id\":\"call_1\""))
            .and(body_string_contains("Result for habit blogs for professionals"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(final_reply("1. https://example.com/a")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let search = Arc::new(EchoSearch {
            queries: Mutex::new(Vec::new()),
        });
        let agent = Agent::new("Blog Researcher", "gpt-4o", client(&server)).tool(search.clone());

        let out = agent.run("preferences").await.unwrap();
        assert_eq!(out, "1. https://example.com/a");
        assert_eq!(
            *search.queries.lock().unwrap(),
            vec!["habit blogs for professionals".to_string()]
        );
    }

    #[tokio::test]
    async fn run_stops_after_max_tool_rounds() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tool_call_reply()))
            .expect(3)
            .mount(&server)
            .await;

        let search = Arc::new(EchoSearch {
            queries: Mutex::new(Vec::new()),
        });
        let agent = Agent::new("Blog Researcher", "gpt-4o", client(&server))
            .tool(search.clone())
            .max_tool_rounds(2);

        let err = agent.run("preferences").await.unwrap_err();
        assert!(err.to_string().contains("exceeded 2 tool rounds"));
        assert_eq!(search.queries.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unknown_tool_is_reported_to_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tool_call_reply()))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_string_contains("unknown tool 'search_google'"))
            .respond_with(ResponseTemplate::new(200).set_body_json(final_reply("no search")))
            .expect(1)
            .mount(&server)
            .await;

        let agent = Agent::new("Blog Researcher", "gpt-4o", client(&server));
        assert_eq!(agent.run("preferences").await.unwrap(), "no search");
    }

    #[tokio::test]
    async fn null_content_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": null } }]
            })))
            .mount(&server)
            .await;

        let agent = Agent::new("Blog Outliner", "o3-mini", client(&server));
        let err = agent.run("x").await.unwrap_err();
        assert!(matches!(err, BlogOutlineError::Agent(_)));
    }
}
