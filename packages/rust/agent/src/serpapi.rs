//! `search_google` tool backed by SerpAPI.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{info, instrument};
use url::Url;

use blogoutline_shared::{BlogOutlineError, Result};

use crate::openai::{api_error, build_http_client, parse_base_url};
use crate::tool::Tool;

/// Google search through SerpAPI, exposed to the model as `search_google`.
#[derive(Clone)]
pub struct SerpApiSearch {
    http: Client,
    endpoint: Url,
    api_key: String,
    default_num_results: u32,
}

impl std::fmt::Debug for SerpApiSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpApiSearch")
            .field("endpoint", &self.endpoint.as_str())
            .field("default_num_results", &self.default_num_results)
            .finish_non_exhaustive()
    }
}

impl SerpApiSearch {
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        default_num_results: u32,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let base = parse_base_url(base_url, "SerpAPI")?;
        let endpoint = parse_base_url(
            &format!("{}/search.json", base.as_str().trim_end_matches('/')),
            "SerpAPI",
        )?;
        Ok(Self {
            http: build_http_client(timeout)?,
            endpoint,
            api_key: api_key.into(),
            default_num_results,
        })
    }

    /// Run one Google search and return the condensed result document.
    ///
    /// The key travels in the query string, so transport errors are reported
    /// without their URL.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, num_results: u32) -> Result<Value> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("engine", "google")
            .append_pair("q", query)
            .append_pair("num", &num_results.to_string())
            .append_pair("api_key", &self.api_key);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| {
                BlogOutlineError::Network(format!("SerpAPI request failed: {}", e.without_url()))
            })?;

        if !response.status().is_success() {
            return Err(api_error("SerpAPI", response).await);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| {
                BlogOutlineError::parse(format!("invalid SerpAPI response: {}", e.without_url()))
            })?;

        let condensed = condense_results(&body);
        info!(
            results = condensed["search_results"].as_array().map_or(0, Vec::len),
            "search complete"
        );
        Ok(condensed)
    }
}

/// Keep the parts of a SerpAPI payload that help pick reference articles.
fn condense_results(body: &Value) -> Value {
    let organic: Vec<Value> = body["organic_results"]
        .as_array()
        .map(|results| {
            results
                .iter()
                .map(|r| {
                    json!({
                        "position": r["position"],
                        "title": r["title"],
                        "link": r["link"],
                        "snippet": r["snippet"],
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let mut out = json!({ "search_results": organic });
    for key in ["knowledge_graph", "related_questions"] {
        if let Some(v) = body.get(key) {
            out[key] = v.clone();
        }
    }
    out
}

#[async_trait]
impl Tool for SerpApiSearch {
    fn name(&self) -> &str {
        "search_google"
    }

    fn description(&self) -> &str {
        "Search Google for a query and return the top results with titles, links and snippets."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The query to search for."
                },
                "num_results": {
                    "type": "integer",
                    "description": "Number of results to return."
                }
            },
            "required": ["query"]
        })
    }

    async fn call(&self, arguments: Value) -> Result<String> {
        let query = arguments["query"]
            .as_str()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| BlogOutlineError::validation("search_google requires a non-empty query"))?;
        let num_results = arguments["num_results"]
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(self.default_num_results);

        let results = self.search(query, num_results).await?;
        serde_json::to_string_pretty(&results)
            .map_err(|e| BlogOutlineError::parse(format!("failed to encode search results: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn serp_payload() -> Value {
        json!({
            "search_metadata": { "status": "Success" },
            "organic_results": [
                {
                    "position": 1,
                    "title": "How to Build Better Habits in 4 Simple Steps",
                    "link": "https://jamesclear.com/three-steps-habit-change",
                    "snippet": "A guide to habit formation.",
                    "favicon": "ignored"
                },
                {
                    "position": 2,
                    "title": "Healthy Habits for Busy Professionals",
                    "link": "https://blog.hubspot.com/healthy-habits",
                    "snippet": "Practical routines."
                }
            ],
            "related_questions": [{ "question": "What are 5 healthy habits?" }]
        })
    }

    #[test]
    fn condense_keeps_links_and_drops_noise() {
        let out = condense_results(&serp_payload());
        let results = out["search_results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["link"], "https://jamesclear.com/three-steps-habit-change");
        assert!(results[0].get("favicon").is_none());
        assert!(out.get("related_questions").is_some());
        assert!(out.get("knowledge_graph").is_none());
        assert!(out.get("search_metadata").is_none());
    }

    #[test]
    fn condense_tolerates_missing_results() {
        let out = condense_results(&json!({ "error": "no results" }));
        assert_eq!(out["search_results"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn call_sends_query_and_key() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("engine", "google"))
            .and(query_param("q", "healthy habits for busy professionals"))
            .and(query_param("num", "10"))
            .and(query_param("api_key", "serp-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serp_payload()))
            .expect(1)
            .mount(&server)
            .await;

        let tool = SerpApiSearch::new("serp-test", &server.uri(), 10, None).unwrap();
        let out = tool
            .call(json!({ "query": "healthy habits for busy professionals" }))
            .await
            .unwrap();
        assert!(out.contains("https://blog.hubspot.com/healthy-habits"));
    }

    #[tokio::test]
    async fn call_honours_requested_result_count() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("num", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serp_payload()))
            .expect(1)
            .mount(&server)
            .await;

        let tool = SerpApiSearch::new("serp-test", &server.uri(), 10, None).unwrap();
        tool.call(json!({ "query": "habits", "num_results": 5 }))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn call_propagates_http_errors() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search.json"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key."))
            .mount(&server)
            .await;

        let tool = SerpApiSearch::new("bad", &server.uri(), 10, None).unwrap();
        let err = tool.call(json!({ "query": "habits" })).await.unwrap_err();
        assert!(matches!(err, BlogOutlineError::Api { status: 401, .. }));
    }

    #[test]
    fn endpoint_keeps_base_path() {
        for base in ["https://proxy.internal/serp", "https://proxy.internal/serp/"] {
            let tool = SerpApiSearch::new("k", base, 10, None).unwrap();
            assert_eq!(tool.endpoint.as_str(), "https://proxy.internal/serp/search.json");
        }
        let tool = SerpApiSearch::new("k", "https://serpapi.com", 10, None).unwrap();
        assert_eq!(tool.endpoint.as_str(), "https://serpapi.com/search.json");
    }

    #[tokio::test]
    async fn unreachable_host_error_hides_key() {
        let secret = "serp-SECRET-123";
        let tool = SerpApiSearch::new(secret, "http://127.0.0.1:1", 10, None).unwrap();
        let err = tool.call(json!({ "query": "habits" })).await.unwrap_err();

        assert!(matches!(err, BlogOutlineError::Network(_)));
        assert!(!err.to_string().contains(secret));
        assert!(err.user_messages().iter().all(|m| !m.contains(secret)));
        assert!(!format!("{err:?}").contains(secret));
    }

    #[tokio::test]
    async fn malformed_body_error_hides_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let secret = "serp-SECRET-456";
        let tool = SerpApiSearch::new(secret, &server.uri(), 10, None).unwrap();
        let err = tool.call(json!({ "query": "habits" })).await.unwrap_err();

        assert!(err.to_string().contains("invalid SerpAPI response"));
        assert!(!err.to_string().contains(secret));
    }

    #[tokio::test]
    async fn call_rejects_blank_query() {
        let tool = SerpApiSearch::new("k", "https://serpapi.com", 10, None).unwrap();
        let err = tool.call(json!({ "query": "  " })).await.unwrap_err();
        assert!(err.to_string().contains("non-empty query"));
    }
}
