//! Model gateway: the single point of entry for all inference-server calls.
//!
//! ARCHITECTURAL RULE: No other module may talk to the inference server directly.
//! Scoring, RAG and chat go through the `ModelGateway` trait so they can be
//! exercised against a fake in tests.
//!
//! Calls are single-attempt. Bounded retrying is opt-in via `RetryingGateway`.

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::BoxStream;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::GatewayConfig;

pub mod prompts;
pub mod retry;
pub mod stream;
#[cfg(test)]
pub mod testing;
pub mod tools;

pub use retry::RetryingGateway;
pub use tools::ToolSchema;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Response is missing '{0}'")]
    MissingField(&'static str),

    #[error("Embedding has {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Stream error: {0}")]
    Stream(String),
}

impl GatewayError {
    /// Rate limiting, server errors and connection failures may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Http(e) => e.is_connect() || e.is_timeout(),
            GatewayError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of a conversation. Order within a conversation is chronological.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Text fragments in generation order. Finite and not restartable.
pub type FragmentStream = BoxStream<'static, Result<String, GatewayError>>;

#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Embeds `text` into a vector of the gateway's declared dimensionality.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, GatewayError>;

    /// Opens one streaming generation. Fragments are read from the network
    /// only as the returned stream is polled.
    async fn generate_stream(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<FragmentStream, GatewayError>;

    /// Non-streaming chat offering exactly one tool, which the model is forced to call.
    /// Returns the raw response body.
    async fn chat_with_tools(
        &self,
        system_prompt: &str,
        user_message: &str,
        tool: &ToolSchema,
    ) -> Result<Value, GatewayError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<Value>,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP implementation of `ModelGateway` for an Ollama-compatible server.
#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    config: GatewayConfig,
    embedding_dim: usize,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig, embedding_dim: usize) -> Result<Self, GatewayError> {
        let client = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;
        Ok(Self {
            client,
            config,
            embedding_dim,
        })
    }

    pub fn model_id(&self) -> &str {
        &self.config.model_id
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        timeout: Option<Duration>,
    ) -> Result<Response, GatewayError> {
        let mut request = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.config.api_key)
            .json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("Inference server returned {} for {}: {}", status, path, body);
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        Err(GatewayError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ModelGateway for GatewayClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, GatewayError> {
        let body = EmbedRequest {
            model: &self.config.model_id,
            input: [text],
        };
        let response: EmbedResponse = self
            .post("/api/embed", &body, Some(REQUEST_TIMEOUT))
            .await?
            .json()
            .await?;

        let embedding = response
            .embeddings
            .into_iter()
            .next()
            .ok_or(GatewayError::MissingField("embeddings[0]"))?;
        check_dimension(embedding, self.embedding_dim)
    }

    async fn generate_stream(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<FragmentStream, GatewayError> {
        let body = ChatRequest {
            model: &self.config.model_id,
            messages: &messages,
            stream: true,
            tools: None,
            tool_choice: None,
        };
        // No overall timeout: a long generation is not a stalled one.
        let response = self.post("/api/chat", &body, None).await?;
        debug!("Opened generation stream ({} messages)", messages.len());
        Ok(stream::decode_chat_stream(response.bytes_stream()))
    }

    async fn chat_with_tools(
        &self,
        system_prompt: &str,
        user_message: &str,
        tool: &ToolSchema,
    ) -> Result<Value, GatewayError> {
        let system = format!("{system_prompt}\n\n{}", prompts::FUNCTION_CALL_ONLY);
        let messages = [
            ChatMessage::system(system),
            ChatMessage::user(user_message),
        ];
        let body = ChatRequest {
            model: &self.config.model_id,
            messages: &messages,
            stream: false,
            tools: Some(vec![tool.to_wire()]),
            tool_choice: Some(tool.forced_choice()),
        };

        let raw: Value = self
            .post("/api/chat", &body, Some(REQUEST_TIMEOUT))
            .await?
            .json()
            .await?;
        debug!("Tool chat '{}' completed", tool.name);
        Ok(raw)
    }
}

fn check_dimension(embedding: Vec<f32>, expected: usize) -> Result<Vec<f32>, GatewayError> {
    if embedding.len() != expected {
        return Err(GatewayError::DimensionMismatch {
            expected,
            actual: embedding.len(),
        });
    }
    Ok(embedding)
}
