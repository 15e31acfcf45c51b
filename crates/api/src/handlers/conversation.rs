//! Handlers for the `/conversations` resource.

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use dialogue_core::export::{chat_export_filename, export_chat_html};
use dialogue_core::render::{ConversationView, Participant};
use dialogue_core::transcript::Message;
use dialogue_pipeline::{parse_conversation, GeneratedConversation, GenerationRequest};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::attachment;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub transcript: String,
    pub first: Participant,
    pub second: Participant,
    #[serde(default)]
    pub topic: String,
}

#[derive(Debug, Serialize)]
pub struct ParsedConversation {
    pub messages: Vec<Message>,
    pub view: ConversationView,
}

/// POST /api/v1/conversations/generate
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> AppResult<Json<DataResponse<GeneratedConversation>>> {
    let conversation = state.orchestrator.generate(&request).await?;
    Ok(Json(DataResponse { data: conversation }))
}

/// POST /api/v1/conversations/parse
pub async fn parse(Json(req): Json<ParseRequest>) -> Json<DataResponse<ParsedConversation>> {
    let (messages, view) = parse_conversation(&req.transcript, &req.first, &req.second, &req.topic);
    Json(DataResponse {
        data: ParsedConversation { messages, view },
    })
}

/// POST /api/v1/conversations/export
///
/// Renders the posted view as a standalone HTML download.
pub async fn export(Json(view): Json<ConversationView>) -> AppResult<Response> {
    let html = export_chat_html(&view, Utc::now());
    let filename = chat_export_filename(&view.first.name, &view.second.name, &view.topic);
    attachment("text/html; charset=utf-8", &filename, html)
}
