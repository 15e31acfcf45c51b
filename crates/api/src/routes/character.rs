use axum::routing::{get, post};
use axum::Router;

use crate::handlers::character;
use crate::state::AppState;

/// Routes mounted at `/characters`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(character::list).post(character::save))
        .route("/export", get(character::export))
        .route("/import", post(character::import))
        .route("/{id}", get(character::get_by_id).delete(character::delete))
}
