//! PostgreSQL + pgvector backend.
//!
//! Ids come from the table's `BIGSERIAL` sequence, so they are unique across
//! every source and every process sharing the database.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::{debug, info};

use super::document::{DocumentId, DocumentMetadata, RetrievalDocument, ScoredDocument};
use super::store::VectorStore;
use super::RetrievalError;

const TABLE: &str = "rag_documents";

pub struct PgVectorStore {
    pool: PgPool,
}

impl PgVectorStore {
    /// Wraps `pool`, creating the extension and table if they do not exist.
    pub async fn connect(pool: PgPool, dimensions: usize) -> Result<Self, RetrievalError> {
        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&pool)
            .await?;

        let create_sql = format!(
            "CREATE TABLE IF NOT EXISTS {TABLE} (\
                id BIGSERIAL PRIMARY KEY, \
                content TEXT NOT NULL, \
                source TEXT NOT NULL, \
                embedding vector({dimensions}) NOT NULL\
            )"
        );
        sqlx::query(&create_sql).execute(&pool).await?;

        info!("pgvector table '{TABLE}' ready ({dimensions} dimensions)");
        Ok(Self { pool })
    }
}

/// pgvector expects the vector as a string like '[1,2,3]'.
fn vector_literal(embedding: &[f32]) -> String {
    format!(
        "[{}]",
        embedding
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",")
    )
}

fn document_id(raw: i64) -> DocumentId {
    // BIGSERIAL starts at 1
    DocumentId(raw.max(0) as u64)
}

#[async_trait]
impl VectorStore for PgVectorStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn insert(
        &self,
        content: String,
        metadata: DocumentMetadata,
        embedding: Vec<f32>,
    ) -> Result<RetrievalDocument, RetrievalError> {
        let insert_sql = format!(
            "INSERT INTO {TABLE} (content, source, embedding) \
             VALUES ($1, $2, $3::vector) \
             RETURNING id"
        );

        let row = sqlx::query(&insert_sql)
            .bind(&content)
            .bind(&metadata.source)
            .bind(vector_literal(&embedding))
            .fetch_one(&self.pool)
            .await?;
        let id = document_id(row.try_get("id")?);

        debug!("Inserted document {id} from '{}'", metadata.source);
        Ok(RetrievalDocument {
            id,
            content,
            metadata,
        })
    }

    async fn search(
        &self,
        embedding: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredDocument>, RetrievalError> {
        // Cosine distance operator <=>: 0 = identical, so score = 1 - distance.
        let search_sql = format!(
            "SELECT id, content, source, 1 - (embedding <=> $1::vector) AS score \
             FROM {TABLE} \
             ORDER BY embedding <=> $1::vector, id \
             LIMIT $2"
        );

        let rows = sqlx::query(&search_sql)
            .bind(vector_literal(embedding))
            .bind(k as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| -> Result<ScoredDocument, RetrievalError> {
                let score: f64 = row.try_get("score")?;
                Ok(ScoredDocument {
                    document: RetrievalDocument {
                        id: document_id(row.try_get("id")?),
                        content: row.try_get("content")?,
                        metadata: DocumentMetadata {
                            source: row.try_get("source")?,
                        },
                    },
                    score: score as f32,
                })
            })
            .collect()
    }

    async fn len(&self) -> Result<usize, RetrievalError> {
        let count_sql = format!("SELECT COUNT(*) AS n FROM {TABLE}");
        let row = sqlx::query(&count_sql).fetch_one(&self.pool).await?;
        let n: i64 = row.try_get("n")?;
        Ok(n.max(0) as usize)
    }
}
