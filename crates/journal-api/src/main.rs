//! Journal API server: /journal/submit, /journal/memory.

use journal_api::server::{self, AppState};
use journal_graph::{GraphConfig, Neo4jGraphStore};
use journal_llm::OllamaAnalyzer;
use journal_pipeline::EntryPipeline;
use journal_types::{GraphStore, Journal};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // An unreachable store is fatal: fail here, before accepting requests.
    let graph_config = GraphConfig::from_env();
    let graph = Neo4jGraphStore::connect(&graph_config).await?;
    graph.verify_connectivity().await?;
    graph.ensure_constraints().await?;
    tracing::info!(uri = %graph_config.uri, database = %graph_config.database, "connected to graph store");

    let analyzer = OllamaAnalyzer::from_env();
    let journal: Arc<dyn Journal> = Arc::new(EntryPipeline::new(graph, analyzer));
    let state = Arc::new(AppState { journal });

    let app = server::router(state);
    let addr: SocketAddr = std::env::var("JOURNAL_LISTEN")
        .unwrap_or_else(|_| "0.0.0.0:7860".to_string())
        .parse()?;
    tracing::info!("journal API listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(addr).await?,
        app.into_make_service(),
    )
    .await?;
    Ok(())
}
