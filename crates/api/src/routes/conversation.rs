use axum::routing::post;
use axum::Router;

use crate::handlers::conversation;
use crate::state::AppState;

/// Routes mounted at `/conversations`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(conversation::generate))
        .route("/parse", post(conversation::parse))
        .route("/export", post(conversation::export))
}
