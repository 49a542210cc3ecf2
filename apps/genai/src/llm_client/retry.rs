//! Opt-in bounded retry around gateway calls.
//!
//! Only the opening of a generation stream is retried, never a stream that
//! has already produced fragments.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use super::{ChatMessage, FragmentStream, GatewayError, ModelGateway, ToolSchema};

const BASE_DELAY: Duration = Duration::from_millis(1000);

/// Runs `op` up to `max_attempts` times, backing off 1s, 2s, 4s, ... between
/// attempts. Non-retryable errors are returned immediately.
pub async fn with_retry<T, F, Fut>(max_attempts: u32, mut op: F) -> Result<T, GatewayError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GatewayError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt + 1 < max_attempts => {
                // Exponential backoff: 1s, 2s, 4s
                let delay = BASE_DELAY * (1 << attempt.min(16));
                attempt += 1;
                warn!(
                    "Gateway call attempt {} failed ({}), retrying after {}ms...",
                    attempt,
                    e,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// `ModelGateway` decorator applying `with_retry` to every call.
pub struct RetryingGateway {
    inner: Arc<dyn ModelGateway>,
    max_attempts: u32,
}

impl RetryingGateway {
    pub fn new(inner: Arc<dyn ModelGateway>, max_attempts: u32) -> Self {
        Self {
            inner,
            max_attempts,
        }
    }
}

#[async_trait]
impl ModelGateway for RetryingGateway {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, GatewayError> {
        with_retry(self.max_attempts, || self.inner.embed(text)).await
    }

    async fn generate_stream(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<FragmentStream, GatewayError> {
        with_retry(self.max_attempts, || {
            self.inner.generate_stream(messages.clone())
        })
        .await
    }

    async fn chat_with_tools(
        &self,
        system_prompt: &str,
        user_message: &str,
        tool: &ToolSchema,
    ) -> Result<Value, GatewayError> {
        with_retry(self.max_attempts, || {
            self.inner.chat_with_tools(system_prompt, user_message, tool)
        })
        .await
    }
}
