//! RAG Server binary
//!
//! Run with: cargo run -p medrag --bin medrag-server

use medrag::{
    config::RagConfig,
    server::{state::AppState, RagServer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medrag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                        MedRAG                             ║
║      Medical Textbook Q&A with Numbered References        ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    let config = RagConfig::from_env_or_default()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - Embedding dimensions: {}", config.embeddings.dimensions);
    tracing::info!("  - LLM model: {} ({:?})", config.llm.generate_model, config.llm.backend);
    tracing::info!("  - Index: {}", config.vector_db.index_path.display());

    let state = AppState::new(config)?;

    tracing::info!("Checking Ollama at {}...", state.config().llm.base_url);
    let health = state.pipeline().health().await;
    if health.llm && health.embedder {
        tracing::info!("Ollama is running");
    } else {
        tracing::warn!("Ollama not available at {}", state.config().llm.base_url);
        tracing::warn!("Please start Ollama:");
        tracing::warn!("  1. Start: ollama serve");
        tracing::warn!(
            "  2. Pull models: ollama pull {} && ollama pull {}",
            state.config().llm.embed_model,
            state.config().llm.generate_model
        );
    }
    tracing::info!("{} indexed chunks", health.indexed_records);

    let server = RagServer::with_state(state);

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/query    - Ask questions");
    println!("  POST /api/retrieve - Browse re-ranked hits");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
