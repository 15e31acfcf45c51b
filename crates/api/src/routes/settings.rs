use axum::routing::get;
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

/// Routes mounted at `/settings`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(settings::get).put(settings::save))
        .route("/catalog", get(settings::catalog))
}
