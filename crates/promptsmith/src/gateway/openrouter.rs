//! OpenRouter chat completions client.

use super::retry::RetryPolicy;
use super::{Completion, CompletionFuture, CompletionGateway, UsageInfo};
use crate::error::CompletionError;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model for enhancement calls.
pub const DEFAULT_MODEL: &str = "anthropic/claude-sonnet-4";

/// Default response budget. Enhanced prompts are short.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;

// ── Config ─────────────────────────────────────────────────────────

/// Generation settings applied to every completion call.
///
/// ```
/// use promptsmith::gateway::GatewayConfig;
///
/// let config = GatewayConfig::new("openai/gpt-4o")
///     .with_max_tokens(2048)
///     .with_temperature(0.2)
///     .with_retries(2);
/// assert_eq!(config.retry.max_retries, 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub retry: RetryPolicy,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            retry: RetryPolicy::default(),
        }
    }
}

impl GatewayConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Retry transient failures up to `retries` times.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retry.max_retries = retries;
        self
    }
}

// ── Wire types ─────────────────────────────────────────────────────

/// Chat completion request body.
#[derive(Serialize, Debug)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub max_tokens: u32,
    pub temperature: f32,
}

fn is_zero_u32(v: &u32) -> bool {
    *v == 0
}

/// Role of a message in the conversation.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

#[derive(Serialize, Debug)]
pub struct Message<'a> {
    pub role: MessageRole,
    pub content: &'a str,
}

impl<'a> Message<'a> {
    pub fn system(content: &'a str) -> Self {
        Self {
            role: MessageRole::System,
            content,
        }
    }

    pub fn user(content: &'a str) -> Self {
        Self {
            role: MessageRole::User,
            content,
        }
    }
}

#[derive(Deserialize, Debug)]
struct RawChatResponse {
    choices: Option<Vec<RawChoice>>,
    error: Option<ApiErrorResponse>,
    model: Option<String>,
    #[serde(default)]
    usage: Option<UsageInfo>,
}

#[derive(Deserialize, Debug)]
struct RawChoice {
    message: RawResponseMessage,
}

#[derive(Deserialize, Debug)]
struct RawResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorResponse {
    message: String,
}

// ── Client ─────────────────────────────────────────────────────────

/// Async HTTP client for the OpenRouter chat completions API.
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    referer: String,
    title: String,
    config: GatewayConfig,
}

impl OpenRouterClient {
    /// Create a client with default headers and [`GatewayConfig::default`].
    pub fn new(api_key: impl Into<String>) -> Result<Self, CompletionError> {
        Self::with_headers(api_key, "https://github.com/promptsmith-rs", "promptsmith")
    }

    /// Create a client with custom Referer and X-Title headers.
    pub fn with_headers(
        api_key: impl Into<String>,
        referer: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("promptsmith/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| CompletionError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: OPENROUTER_URL.to_string(),
            referer: referer.into(),
            title: title.into(),
            config: GatewayConfig::default(),
        })
    }

    pub fn with_config(mut self, config: GatewayConfig) -> Self {
        self.config = config;
        self
    }

    /// Point the client at another OpenAI-compatible chat completions URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Build the request body for one enhancement call.
    pub fn request_body<'a>(&'a self, system: &'a str, user: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![Message::system(system), Message::user(user)],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }

    /// Send one request, no retries.
    async fn send(&self, body: &ChatRequest<'_>) -> Result<Completion, CompletionError> {
        debug!(
            "LLM request: model={}, messages={}, max_tokens={}, temp={}",
            body.model,
            body.messages.len(),
            body.max_tokens,
            body.temperature,
        );
        trace!(
            "Request payload size: {} bytes",
            serde_json::to_string(body).map_or(0, |s| s.len())
        );

        let start = Instant::now();

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(body)
            .send()
            .await
            .map_err(|e| CompletionError::Request(e.to_string()))?;

        let status = resp.status();
        let retry_after = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        let text = resp
            .text()
            .await
            .map_err(|e| CompletionError::Request(format!("failed to read response: {e}")))?;

        debug!(
            "LLM response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        parse_response(status.as_u16(), retry_after, &text)
    }

    async fn complete_with_retry(&self, system: &str, user: &str) -> Result<Completion, CompletionError> {
        let body = self.request_body(system, user);
        let mut attempt = 0;
        loop {
            let err = match self.send(&body).await {
                Ok(completion) => return Ok(completion),
                Err(e) => e,
            };
            let Some(delay) = self.config.retry.next_delay(attempt, &err) else {
                return Err(err);
            };
            warn!(
                "Completion attempt {} failed ({err}), retrying in {:.1}s",
                attempt + 1,
                delay.as_secs_f64()
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

impl CompletionGateway for OpenRouterClient {
    fn complete<'a>(&'a self, system: &'a str, user: &'a str) -> CompletionFuture<'a> {
        Box::pin(self.complete_with_retry(system, user))
    }
}

/// Turn an HTTP status, `Retry-After` value and body into a [`Completion`]
/// or an error.
pub fn parse_response(
    status: u16,
    retry_after: Option<Duration>,
    text: &str,
) -> Result<Completion, CompletionError> {
    if status == 429 {
        return Err(CompletionError::RateLimited {
            retry_after,
            body: text.to_string(),
        });
    }
    if !(200..300).contains(&status) {
        return Err(CompletionError::Http {
            status,
            body: text.to_string(),
        });
    }

    let parsed: RawChatResponse =
        serde_json::from_str(text).map_err(|e| CompletionError::Parse(e.to_string()))?;

    if let Some(err) = parsed.error {
        return Err(CompletionError::Api(err.message));
    }

    if let Some(ref usage) = parsed.usage {
        debug!(
            "Token usage: prompt={}, completion={}, total={}",
            usage.prompt_tokens.unwrap_or(0),
            usage.completion_tokens.unwrap_or(0),
            usage.total_tokens.unwrap_or(0),
        );
    }

    let text = parsed
        .choices
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.message.content)
        .filter(|t| !t.trim().is_empty())
        .ok_or(CompletionError::EmptyResponse)?;

    Ok(Completion {
        text,
        model: parsed.model,
        usage: parsed.usage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_has_system_then_user() {
        let client = OpenRouterClient::new("key")
            .unwrap()
            .with_config(GatewayConfig::new("test-model").with_max_tokens(100));
        let body = client.request_body("instruction", "raw prompt");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "test-model");
        assert_eq!(json["max_tokens"], 100);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "instruction");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "raw prompt");
    }

    #[test]
    fn zero_max_tokens_is_omitted() {
        let client = OpenRouterClient::new("key")
            .unwrap()
            .with_config(GatewayConfig::default().with_max_tokens(0));
        let json = serde_json::to_value(client.request_body("s", "u")).unwrap();
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn parses_successful_response() {
        let body = r#"{
            "model": "anthropic/claude-sonnet-4",
            "choices": [{"message": {"role": "assistant", "content": "Better prompt"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13}
        }"#;
        let completion = parse_response(200, None, body).unwrap();
        assert_eq!(completion.text, "Better prompt");
        assert_eq!(completion.model.as_deref(), Some("anthropic/claude-sonnet-4"));
        assert_eq!(completion.usage.unwrap().total_tokens, Some(13));
    }

    #[test]
    fn non_success_status_is_http_error() {
        let err = parse_response(503, None, "overloaded").unwrap_err();
        assert_eq!(
            err,
            CompletionError::Http {
                status: 503,
                body: "overloaded".into()
            }
        );
        assert!(err.is_transient());
    }

    #[test]
    fn too_many_requests_is_rate_limited() {
        let err = parse_response(429, Some(Duration::from_secs(3)), "slow down").unwrap_err();
        assert_eq!(
            err,
            CompletionError::RateLimited {
                retry_after: Some(Duration::from_secs(3)),
                body: "slow down".into()
            }
        );
    }

    #[test]
    fn api_error_body_is_api_error() {
        let err = parse_response(200, None, r#"{"error": {"message": "no credits"}}"#).unwrap_err();
        assert_eq!(err, CompletionError::Api("no credits".into()));
    }

    #[test]
    fn missing_or_blank_content_is_empty_response() {
        assert_eq!(
            parse_response(200, None, r#"{"choices": []}"#).unwrap_err(),
            CompletionError::EmptyResponse
        );
        assert_eq!(
            parse_response(200, None, r#"{"choices": [{"message": {"content": "  "}}]}"#).unwrap_err(),
            CompletionError::EmptyResponse
        );
    }

    #[test]
    fn garbage_is_parse_error() {
        assert!(matches!(
            parse_response(200, None, "<html>").unwrap_err(),
            CompletionError::Parse(_)
        ));
    }

    /// Answer one connection per canned `(status, extra headers, body)`,
    /// in order.
    async fn canned_server(responses: Vec<(u16, &'static str, &'static str)>) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            for (status, headers, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();

                // Drain the request so closing the socket doesn't reset it.
                let mut request = Vec::new();
                let mut chunk = [0u8; 4096];
                loop {
                    let n = socket.read(&mut chunk).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&chunk[..n]);
                    let text = String::from_utf8_lossy(&request).to_lowercase();
                    if let Some(end) = text.find("\r\n\r\n") {
                        let length = text
                            .lines()
                            .find_map(|l| l.strip_prefix("content-length:"))
                            .and_then(|v| v.trim().parse::<usize>().ok())
                            .unwrap_or(0);
                        if request.len() >= end + 4 + length {
                            break;
                        }
                    }
                }

                let response = format!(
                    "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\n{headers}connection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
        });
        format!("http://{addr}/v1/chat/completions")
    }

    fn client_with_retry(endpoint: String, retry: RetryPolicy) -> OpenRouterClient {
        let mut config = GatewayConfig::new("test-model");
        config.retry = retry;
        OpenRouterClient::new("key")
            .unwrap()
            .with_config(config)
            .with_endpoint(endpoint)
    }

    fn fast_retry_client(endpoint: String, retries: u32) -> OpenRouterClient {
        client_with_retry(
            endpoint,
            RetryPolicy {
                base_delay: Duration::from_millis(1),
                ..RetryPolicy::new(retries)
            },
        )
    }

    const OK_BODY: &str = r#"{"model":"test-model","choices":[{"message":{"content":"Sharper prompt"}}]}"#;

    #[tokio::test]
    async fn retries_transient_failure_then_succeeds() {
        let endpoint = canned_server(vec![(503, "", "busy"), (200, "", OK_BODY)]).await;
        let client = fast_retry_client(endpoint, 1);
        assert_eq!(client.config().retry.max_retries, 1);

        let completion = client.complete("system", "user").await.unwrap();
        assert_eq!(completion.text, "Sharper prompt");
        assert_eq!(completion.model.as_deref(), Some("test-model"));
    }

    #[tokio::test]
    async fn permanent_failure_is_not_retried() {
        let endpoint = canned_server(vec![(400, "", "bad request"), (200, "", OK_BODY)]).await;
        let client = fast_retry_client(endpoint, 3);

        let err = client.complete("system", "user").await.unwrap_err();
        assert_eq!(
            err,
            CompletionError::Http {
                status: 400,
                body: "bad request".into()
            }
        );
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let endpoint = canned_server(vec![(502, "", "down"), (502, "", "still down")]).await;
        let client = fast_retry_client(endpoint, 1);

        let err = client.complete("system", "user").await.unwrap_err();
        assert_eq!(
            err,
            CompletionError::Http {
                status: 502,
                body: "still down".into()
            }
        );
    }

    #[tokio::test]
    async fn waits_out_retry_after_instead_of_backoff() {
        let endpoint = canned_server(vec![
            (429, "retry-after: 0\r\n", "slow down"),
            (200, "", OK_BODY),
        ])
        .await;
        // A backoff this long would stall the test; Retry-After: 0 must win.
        let client = client_with_retry(
            endpoint,
            RetryPolicy {
                base_delay: Duration::from_secs(60),
                max_delay: Duration::from_secs(60),
                ..RetryPolicy::new(1)
            },
        );

        let completion = client.complete("system", "user").await.unwrap();
        assert_eq!(completion.text, "Sharper prompt");
    }

    #[tokio::test]
    async fn rate_limit_longer_than_cap_fails_fast() {
        let endpoint = canned_server(vec![(429, "retry-after: 120\r\n", "later"), (200, "", OK_BODY)]).await;
        let client = fast_retry_client(endpoint, 3);

        let err = client.complete("system", "user").await.unwrap_err();
        assert_eq!(
            err,
            CompletionError::RateLimited {
                retry_after: Some(Duration::from_secs(120)),
                body: "later".into()
            }
        );
    }

    #[test]
    fn config_builder() {
        let config = GatewayConfig::new("m").with_temperature(0.1).with_retries(4);
        assert_eq!(config.model, "m");
        assert!((config.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.retry.max_retries, 4);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
    }
}
