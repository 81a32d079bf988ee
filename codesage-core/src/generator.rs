//! Question generation over an OpenAI-compatible chat-completion API.
//!
//! One request per call, one user message, fixed temperature. The first
//! choice's content is returned untouched; the model's free text is never
//! parsed.

use crate::error::{GenerationError, GenerationResult};
use crate::prompt::build_prompt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Sampling temperature sent with every request.
pub const TEMPERATURE: f64 = 0.7;

/// Longest provider error body kept in an [`GenerationError::Upstream`].
const MAX_ERROR_BODY: usize = 2048;

/// Appended to a provider error body that was cut at [`MAX_ERROR_BODY`].
const TRUNCATION_MARKER: &str = "... (truncated)";

/// Everything needed to reach the LLM provider.
#[derive(Clone)]
pub struct GeneratorConfig {
    /// Bearer token for the provider
    pub api_key: String,
    /// Full URL of the chat-completions endpoint
    pub api_url: String,
    /// Model identifier passed through to the provider
    pub model: String,
    /// Deadline for the whole outbound call, body included
    pub timeout: Duration,
    /// Optional `X-Title` attribution header
    pub app_title: Option<String>,
    /// Optional `HTTP-Referer` attribution header
    pub app_referer: Option<String>,
}

impl GeneratorConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            app_title: None,
            app_referer: None,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_attribution(mut self, title: Option<String>, referer: Option<String>) -> Self {
        self.app_title = title;
        self.app_referer = referer;
        self
    }
}

// The key must never end up in logs.
impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("app_title", &self.app_title)
            .field("app_referer", &self.app_referer)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
}

/// Client for the question-generation call.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct QuestionGenerator {
    client: reqwest::Client,
    config: GeneratorConfig,
}

// The client's Debug prints its default headers, bearer token included.
impl fmt::Debug for QuestionGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuestionGenerator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl QuestionGenerator {
    pub fn new(config: GeneratorConfig) -> GenerationResult<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| GenerationError::InvalidApiKey)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(referer) = config.app_referer.as_deref() {
            let value = HeaderValue::from_str(referer)
                .map_err(|_| GenerationError::InvalidHeader("HTTP-Referer"))?;
            headers.insert(HeaderName::from_static("http-referer"), value);
        }
        if let Some(title) = config.app_title.as_deref() {
            let value = HeaderValue::from_str(title)
                .map_err(|_| GenerationError::InvalidHeader("X-Title"))?;
            headers.insert(HeaderName::from_static("x-title"), value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Ask the model for questions about `text`. Exactly one attempt is made.
    pub async fn generate(&self, text: &str) -> GenerationResult<String> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(text),
            }],
            temperature: TEMPERATURE,
        };

        debug!(
            "Requesting questions from {} (model {}, {} chars of text)",
            self.config.api_url,
            self.config.model,
            text.len()
        );

        let response = self
            .client
            .post(&self.config.api_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            warn!("LLM provider returned HTTP {}", status.as_u16());
            return Err(GenerationError::Upstream {
                status: status.as_u16(),
                body: truncate(body, MAX_ERROR_BODY),
            });
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Completion used {:?} prompt and {:?} completion tokens",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GenerationError::MalformedResponse("no choices returned".to_string()))?
            .message
            .content
            .ok_or_else(|| {
                GenerationError::MalformedResponse("first choice has no content".to_string())
            })
    }

    fn transport_error(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            warn!("LLM request exceeded {:?}", self.config.timeout);
            GenerationError::Timeout(self.config.timeout)
        } else {
            warn!("LLM request failed: {}", err);
            GenerationError::Transport(err.to_string())
        }
    }
}

/// Cut `body` to at most `max` bytes, marking the cut so it never reads as complete.
fn truncate(mut body: String, max: usize) -> String {
    if body.len() > max {
        let mut end = max;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
        body.push_str(TRUNCATION_MARKER);
    }
    body
}
