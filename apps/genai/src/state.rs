use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ModelGateway;
use crate::retrieval::Retriever;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Gateway to the inference server, possibly wrapped in a retry decorator.
    pub gateway: Arc<dyn ModelGateway>,
    /// Retrieval corpus behind the question-answering routes.
    pub retriever: Arc<Retriever>,
}
