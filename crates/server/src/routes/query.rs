//! Question answering endpoint.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{extract::State, Json};
use docqa_knowledge::{answer, AnswerOptions};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: Option<String>,

    /// Overrides the configured number of context chunks
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub text_response: String,
    pub summary: String,
    /// Speech synthesis is not offered; always null
    pub audio_url: Option<String>,
}

/// POST /api/query
pub async fn query_documents(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> ApiResult<Json<QueryResponse>> {
    let query = request
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("No query provided"))?;

    let options = AnswerOptions::new(query, state.model())
        .with_top_k(request.top_k.unwrap_or_else(|| state.top_k()));

    let result = answer(state.store(), state.llm(), state.prompt(), &options).await?;

    Ok(Json(QueryResponse {
        text_response: result.text_response,
        summary: result.summary,
        audio_url: None,
    }))
}
