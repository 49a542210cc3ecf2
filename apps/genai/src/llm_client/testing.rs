//! In-process `ModelGateway` fake for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream;
use serde_json::Value;

use super::{ChatMessage, FragmentStream, GatewayError, ModelGateway, ToolSchema};

pub const FAKE_DIM: usize = 64;

/// Deterministic bag-of-words embedding: identical text gives identical vectors.
pub fn hashed_embedding(text: &str) -> Vec<f32> {
    let mut v = vec![0.0_f32; FAKE_DIM];
    for word in text.split_whitespace() {
        let word = word.to_lowercase();
        // FNV-1a
        let mut hash: u64 = 0xcbf29ce484222325;
        for b in word.bytes() {
            hash ^= b as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
        v[(hash % FAKE_DIM as u64) as usize] += 1.0;
    }
    v
}

/// Records every call and answers from canned data.
#[derive(Default)]
pub struct FakeGateway {
    /// Raw body returned by `chat_with_tools`.
    pub tool_response: Option<Value>,
    /// Fragments returned by `generate_stream`.
    pub fragments: Vec<String>,
    pub embed_calls: AtomicUsize,
    pub generated: Mutex<Vec<Vec<ChatMessage>>>,
    pub tool_calls: Mutex<Vec<(String, String, &'static str)>>,
}

impl FakeGateway {
    pub fn with_tool_response(raw: Value) -> Self {
        Self {
            tool_response: Some(raw),
            ..Self::default()
        }
    }

    pub fn with_fragments(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Wraps `arguments` in an Ollama-style tool call response.
    pub fn tool_call_response(name: &str, arguments: Value) -> Value {
        serde_json::json!({
            "model": "fake",
            "message": {
                "role": "assistant",
                "content": "",
                "tool_calls": [
                    { "function": { "name": name, "arguments": arguments } }
                ]
            },
            "done": true
        })
    }

    pub fn last_prompt(&self) -> Option<Vec<ChatMessage>> {
        self.generated.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ModelGateway for FakeGateway {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, GatewayError> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        Ok(hashed_embedding(text))
    }

    async fn generate_stream(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<FragmentStream, GatewayError> {
        self.generated.lock().unwrap().push(messages);
        let items: Vec<Result<String, GatewayError>> =
            self.fragments.iter().cloned().map(Ok).collect();
        Ok(Box::pin(stream::iter(items)))
    }

    async fn chat_with_tools(
        &self,
        system_prompt: &str,
        user_message: &str,
        tool: &ToolSchema,
    ) -> Result<Value, GatewayError> {
        self.tool_calls.lock().unwrap().push((
            system_prompt.to_string(),
            user_message.to_string(),
            tool.name,
        ));
        self.tool_response.clone().ok_or(GatewayError::Api {
            status: 503,
            message: "no canned response".to_string(),
        })
    }
}
