use std::path::{Component, Path};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ProjectState;
use crate::search::ScoredEntry;
use crate::state::StateHandle;

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// State
// ============================================================

/// The complete current aggregate. Always a consistent snapshot: updates
/// swap the whole state, so a response never mixes old and new files.
pub async fn get_state(State(handle): State<StateHandle>) -> Json<ProjectState> {
    Json(ProjectState::clone(&handle.snapshot()))
}

// ============================================================
// Search
// ============================================================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Search terms; an absent or blank query yields zero results.
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<ScoredEntry>,
}

pub async fn search(
    State(handle): State<StateHandle>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let results = handle.search(&params.q);
    Json(SearchResponse {
        query: params.q,
        count: results.len(),
        results,
    })
}

// ============================================================
// Document
// ============================================================

#[derive(Debug, Deserialize)]
pub struct DocumentParams {
    /// Path relative to the planning root, as stored in state and search
    /// entries.
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Path escapes the planning directory")]
    Traversal,
    #[error("Document not found")]
    NotFound,
}

impl IntoResponse for DocumentError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::Traversal => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
        };
        (status, self.to_string()).into_response()
    }
}

/// Raw file fetch for paths handed out by the state and search endpoints.
pub async fn get_document(
    State(handle): State<StateHandle>,
    Query(params): Query<DocumentParams>,
) -> Result<Json<DocumentResponse>, DocumentError> {
    let requested = Path::new(&params.path);
    if !is_contained(requested) {
        tracing::warn!(path = %params.path, "rejected document path");
        return Err(DocumentError::Traversal);
    }

    let full_path = handle.planning_root().join(requested);
    let content = tokio::fs::read_to_string(&full_path)
        .await
        .map_err(|_| DocumentError::NotFound)?;

    Ok(Json(DocumentResponse {
        path: params.path,
        content,
    }))
}

/// A document path must stay inside the planning root: relative, and with
/// no parent traversal at any depth.
fn is_contained(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
