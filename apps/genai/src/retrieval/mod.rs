//! Vector index over ingested document sections.
//!
//! Ingestion splits a source text on `##`, embeds every section through the
//! model gateway and stores one document per section. Search embeds the query
//! and returns the `k` most similar documents, best first.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::llm_client::{GatewayError, ModelGateway};

pub mod document;
pub mod handlers;
pub mod loader;
pub mod pgvector;
pub mod store;

pub use document::{DocumentMetadata, RetrievalDocument, ScoredDocument};
pub use store::{InMemoryVectorStore, VectorStore};

use document::split_sections;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("k must be at least 1, got {0}")]
    InvalidK(usize),

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Shared by all requests; safe for concurrent ingestion and search.
pub struct Retriever {
    gateway: Arc<dyn ModelGateway>,
    store: Arc<dyn VectorStore>,
}

impl Retriever {
    pub fn new(gateway: Arc<dyn ModelGateway>, store: Arc<dyn VectorStore>) -> Self {
        Self { gateway, store }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Ingests every non-empty section of `full_text`, tagged with `name` as source.
    ///
    /// All sections are embedded before the first insert, so a gateway failure
    /// leaves the index untouched.
    pub async fn ingest(
        &self,
        name: &str,
        full_text: &str,
    ) -> Result<Vec<RetrievalDocument>, RetrievalError> {
        let sections = split_sections(full_text);

        let mut embedded = Vec::with_capacity(sections.len());
        for section in sections {
            let embedding = self.gateway.embed(section).await?;
            embedded.push((section, embedding));
        }

        let mut documents = Vec::with_capacity(embedded.len());
        for (section, embedding) in embedded {
            let metadata = DocumentMetadata {
                source: name.to_string(),
            };
            let document = self
                .store
                .insert(section.to_string(), metadata, embedding)
                .await?;
            documents.push(document);
        }

        info!(
            source = name,
            documents = documents.len(),
            backend = self.store.backend(),
            "Ingested source text"
        );
        Ok(documents)
    }

    /// Top-`k` documents by cosine similarity to `query`. An empty index yields
    /// an empty result without calling the gateway.
    pub async fn search(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredDocument>, RetrievalError> {
        if k == 0 {
            return Err(RetrievalError::InvalidK(k));
        }
        if self.store.is_empty().await? {
            debug!("Search on empty index");
            return Ok(Vec::new());
        }

        let embedding = self.gateway.embed(query).await?;
        let results = self.store.search(&embedding, k).await?;
        debug!("Search returned {} of at most {} documents", results.len(), k);
        Ok(results)
    }
}
