//! Placeholder avatar images, e.g. `/api/placeholder/40/40`.

use axum::extract::Path;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::{routing::get, Router};

use crate::state::AppState;

const MAX_DIMENSION: u32 = 512;

/// GET /api/placeholder/{width}/{height}
///
/// A flat grey SVG with a circle; dimensions are clamped to 1..=512.
async fn placeholder(Path((width, height)): Path<(u32, u32)>) -> impl IntoResponse {
    let w = width.clamp(1, MAX_DIMENSION);
    let h = height.clamp(1, MAX_DIMENSION);
    let r = w.min(h) / 2;
    let svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><rect width="100%" height="100%" fill="#4f545c"/><circle cx="{cx}" cy="{cy}" r="{r}" fill="#72767d"/></svg>"##,
        cx = w / 2,
        cy = h / 2,
    );
    (
        [
            (CONTENT_TYPE, "image/svg+xml"),
            (CACHE_CONTROL, "public, max-age=86400"),
        ],
        svg,
    )
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/placeholder/{width}/{height}", get(placeholder))
}
