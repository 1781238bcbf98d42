//! Query and retrieval endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{format_hits_markdown, Hit, QueryRequest, QueryResponse};

/// Hits plus their result-browser rendering
#[derive(Debug, Serialize)]
pub struct RetrieveResponse {
    pub hits: Vec<Hit>,
    pub markdown: String,
}

/// POST /api/query - Answer a question with citations
pub async fn query_rag(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    let top_k = state.top_k(request.top_k);
    let response = state.pipeline().answer(&request.question, top_k).await?;
    Ok(Json(response))
}

/// POST /api/retrieve - Re-ranked hits only
pub async fn retrieve(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<RetrieveResponse>> {
    let top_k = state.top_k(request.top_k);
    let hits = state.pipeline().retrieve(&request.question, top_k).await?;

    tracing::info!("Retrieved {} hits for \"{}\"", hits.len(), request.question);

    let markdown = format_hits_markdown(&hits);
    Ok(Json(RetrieveResponse { hits, markdown }))
}
