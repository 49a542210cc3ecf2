mod chat;
mod config;
mod db;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod rag;
mod retrieval;
mod routes;
mod scoring;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LogFormat, VectorStoreKind};
use crate::db::create_pool;
use crate::llm_client::{GatewayClient, ModelGateway, RetryingGateway};
use crate::retrieval::loader::ingest_dir;
use crate::retrieval::pgvector::PgVectorStore;
use crate::retrieval::{InMemoryVectorStore, Retriever, VectorStore};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; a missing required variable aborts startup
    let config = Config::from_env()?;

    // Initialize structured logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
    });
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    info!("Starting GenAI service v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the model gateway
    let client = GatewayClient::new(config.gateway.clone(), config.embedding_dim)?;
    info!("Gateway client initialized (model: {})", client.model_id());
    let gateway: Arc<dyn ModelGateway> = if config.gateway_max_attempts > 1 {
        info!("Retrying gateway calls up to {} times", config.gateway_max_attempts);
        Arc::new(RetryingGateway::new(
            Arc::new(client),
            config.gateway_max_attempts,
        ))
    } else {
        Arc::new(client)
    };

    // Initialize the vector store
    let store: Arc<dyn VectorStore> = match (config.vector_store, &config.database_url) {
        (VectorStoreKind::Postgres, Some(url)) => {
            let max_connections = u32::try_from(config.max_concurrent_requests).unwrap_or(u32::MAX);
            let pool = create_pool(url, max_connections).await?;
            Arc::new(PgVectorStore::connect(pool, config.embedding_dim).await?)
        }
        _ => Arc::new(InMemoryVectorStore::new()),
    };
    let retriever = Arc::new(Retriever::new(gateway.clone(), store));
    info!("Retrieval store initialized ({})", retriever.backend());

    if let Some(dir) = &config.docs_dir {
        ingest_dir(&retriever, dir).await?;
    }

    // Build app state
    let state = AppState {
        config: config.clone(),
        gateway,
        retriever,
    };

    // Build router
    let app = build_router(state)
        .layer(GlobalConcurrencyLimitLayer::new(config.max_concurrent_requests))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
