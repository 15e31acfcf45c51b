//! Handlers for the `/characters` resource.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use dialogue_core::character::{Character, CharacterDraft};
use dialogue_db::repositories::ImportSummary;

use crate::error::{AppError, AppResult};
use crate::handlers::attachment;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/characters
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Character>>>> {
    let characters = state.characters.list().await?;
    Ok(Json(DataResponse { data: characters }))
}

/// POST /api/v1/characters
///
/// Creates when the draft has no id (201), otherwise replaces (200).
pub async fn save(
    State(state): State<AppState>,
    Json(draft): Json<CharacterDraft>,
) -> AppResult<(StatusCode, Json<DataResponse<Character>>)> {
    let is_new = draft.id.as_deref().map_or(true, |id| id.trim().is_empty());
    let character = state.characters.upsert(draft.into_character()?).await?;
    let status = if is_new {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(DataResponse { data: character })))
}

/// GET /api/v1/characters/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Character>>> {
    let character = state.characters.get(&id).await?;
    Ok(Json(DataResponse { data: character }))
}

/// DELETE /api/v1/characters/{id}
///
/// Idempotent: deleting an unknown id also returns 204.
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    state.characters.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/characters/export
pub async fn export(State(state): State<AppState>) -> AppResult<Response> {
    let export = state.characters.export().await?;
    attachment("application/json", &export.filename, export.json)
}

/// POST /api/v1/characters/import
///
/// The body is the raw contents of an exported file.
pub async fn import(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<DataResponse<ImportSummary>>> {
    let raw: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::MalformedInput(format!("Import file is not valid JSON: {e}")))?;
    let summary = state.characters.import_merge(&raw).await?;
    Ok(Json(DataResponse { data: summary }))
}
