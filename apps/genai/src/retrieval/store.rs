//! Vector store seam and the in-memory backend.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::document::{DocumentId, DocumentMetadata, RetrievalDocument, ScoredDocument};
use super::RetrievalError;

/// Storage for `(embedding, document)` pairs shared by all requests.
///
/// Implementations must allocate ids from a single index-wide source and
/// insert each document atomically. `search` orders by similarity descending,
/// breaking ties by insertion order.
#[async_trait]
pub trait VectorStore: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn insert(
        &self,
        content: String,
        metadata: DocumentMetadata,
        embedding: Vec<f32>,
    ) -> Result<RetrievalDocument, RetrievalError>;

    async fn search(
        &self,
        embedding: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredDocument>, RetrievalError>;

    async fn len(&self) -> Result<usize, RetrievalError>;

    async fn is_empty(&self) -> Result<bool, RetrievalError> {
        Ok(self.len().await? == 0)
    }
}

struct Entry {
    document: RetrievalDocument,
    embedding: Vec<f32>,
}

/// Brute-force cosine store. Entries are kept in insertion order.
#[derive(Default)]
pub struct InMemoryVectorStore {
    entries: RwLock<Vec<Entry>>,
    next_id: AtomicU64,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Returns 0.0 if either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert(
        &self,
        content: String,
        metadata: DocumentMetadata,
        embedding: Vec<f32>,
    ) -> Result<RetrievalDocument, RetrievalError> {
        let id = DocumentId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let document = RetrievalDocument {
            id,
            content,
            metadata,
        };

        self.entries.write().await.push(Entry {
            document: document.clone(),
            embedding,
        });
        Ok(document)
    }

    async fn search(
        &self,
        embedding: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredDocument>, RetrievalError> {
        let entries = self.entries.read().await;

        let mut scored: Vec<ScoredDocument> = entries
            .iter()
            .map(|entry| ScoredDocument {
                document: entry.document.clone(),
                score: cosine_similarity(&entry.embedding, embedding),
            })
            .collect();

        // Stable sort: equal scores stay in insertion order.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);
        Ok(scored)
    }

    async fn len(&self) -> Result<usize, RetrievalError> {
        Ok(self.entries.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn meta(source: &str) -> DocumentMetadata {
        DocumentMetadata {
            source: source.to_string(),
        }
    }

    #[test]
    fn test_cosine_identical_and_orthogonal() {
        assert!((cosine_similarity(&[1.0, 2.0], &[1.0, 2.0]) - 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[tokio::test]
    async fn test_search_orders_by_similarity() {
        let store = InMemoryVectorStore::new();
        store.insert("far".into(), meta("a"), vec![0.0, 1.0]).await.unwrap();
        store.insert("near".into(), meta("a"), vec![1.0, 0.1]).await.unwrap();
        store.insert("mid".into(), meta("a"), vec![1.0, 1.0]).await.unwrap();

        let results = store.search(&[1.0, 0.0], 3).await.unwrap();
        let order: Vec<&str> = results.iter().map(|r| r.document.content.as_str()).collect();
        assert_eq!(order, vec!["near", "mid", "far"]);
        assert!(results[0].score >= results[1].score);
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order() {
        let store = InMemoryVectorStore::new();
        for name in ["first", "second", "third"] {
            store.insert(name.into(), meta("a"), vec![1.0, 0.0]).await.unwrap();
        }
        let results = store.search(&[1.0, 0.0], 2).await.unwrap();
        let order: Vec<&str> = results.iter().map(|r| r.document.content.as_str()).collect();
        assert_eq!(order, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_search_truncates_to_k() {
        let store = InMemoryVectorStore::new();
        for i in 0..5 {
            store
                .insert(format!("doc {i}"), meta("a"), vec![1.0, i as f32])
                .await
                .unwrap();
        }
        assert_eq!(store.search(&[1.0, 0.0], 2).await.unwrap().len(), 2);
        assert_eq!(store.search(&[1.0, 0.0], 10).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = InMemoryVectorStore::new();
        assert!(store.is_empty().await.unwrap());
        assert!(store.search(&[1.0], 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_inserts_get_unique_ids() {
        let store = Arc::new(InMemoryVectorStore::new());
        let mut handles = Vec::new();
        for task in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let mut ids = Vec::new();
                for i in 0..25 {
                    let doc = store
                        .insert(format!("{task}-{i}"), meta("concurrent"), vec![1.0])
                        .await
                        .unwrap();
                    ids.push(doc.id);
                }
                ids
            }));
        }

        let mut all = HashSet::new();
        for handle in handles {
            for id in handle.await.unwrap() {
                assert!(all.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(all.len(), 200);
        assert_eq!(store.len().await.unwrap(), 200);
    }
}
