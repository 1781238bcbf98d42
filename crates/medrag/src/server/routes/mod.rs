//! API routes for the RAG server

pub mod query;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/query", post(query::query_rag))
        .route("/retrieve", post(query::retrieve))
        .route("/info", get(info))
}

/// API info endpoint
pub async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let pipeline = state.pipeline();
    Json(serde_json::json!({
        "name": "medrag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Medical textbook RAG with reranking and numbered citations",
        "llm": {
            "provider": pipeline.llm().name(),
            "model": pipeline.llm().model(),
        },
        "embedder": {
            "provider": pipeline.embedder().name(),
            "dimensions": pipeline.embedder().dimensions(),
        },
        "vector_store": pipeline.vector_store().name(),
        "default_top_k": state.config().retrieval.default_top_k,
        "endpoints": {
            "GET /health": "Collaborator health",
            "POST /api/query": "Grounded answer with numbered references",
            "POST /api/retrieve": "Re-ranked hits without generation",
            "GET /api/info": "This document"
        }
    }))
}
