//! Question answering over the retrieval corpus.
//!
//! Grounded answers put the closest documents into the prompt. Ungrounded
//! answers skip retrieval entirely and ask the model directly.

use tracing::debug;

use crate::chat::stream_chat;
use crate::llm_client::prompts::render_template;
use crate::llm_client::{ChatMessage, FragmentStream, ModelGateway};
use crate::retrieval::{RetrievalError, Retriever, ScoredDocument};

pub mod handlers;
pub mod prompts;

use prompts::{GROUNDED_TEMPLATE, UNGROUNDED_TEMPLATE};

/// Documents placed into a grounded prompt.
pub const GROUNDED_TOP_K: usize = 2;

pub fn grounded_prompt(query: &str, documents: &[ScoredDocument]) -> String {
    let context = documents
        .iter()
        .map(|d| d.document.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    render_template(GROUNDED_TEMPLATE, &[("query", query), ("context", context.as_str())])
}

pub fn ungrounded_prompt(query: &str) -> String {
    render_template(UNGROUNDED_TEMPLATE, &[("query", query)])
}

pub async fn answer_stream(
    retriever: &Retriever,
    gateway: &dyn ModelGateway,
    query: &str,
    grounded: bool,
) -> Result<FragmentStream, RetrievalError> {
    let prompt = if grounded {
        let documents = retriever.search(query, GROUNDED_TOP_K).await?;
        debug!("Grounding answer in {} documents", documents.len());
        grounded_prompt(query, &documents)
    } else {
        ungrounded_prompt(query)
    };

    Ok(stream_chat(gateway, vec![ChatMessage::user(prompt)]).await?)
}
