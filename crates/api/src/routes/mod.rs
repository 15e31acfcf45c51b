pub mod character;
pub mod conversation;
pub mod health;
pub mod placeholder;
pub mod settings;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /characters                      list, upsert
/// /characters/export               download all as JSON
/// /characters/import               merge a JSON array
/// /characters/{id}                 get, delete
///
/// /settings                        load, save
/// /settings/catalog                named endpoints and models
///
/// /conversations/generate          generate, parse and render
/// /conversations/parse             parse a transcript
/// /conversations/export            download as standalone HTML
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/characters", character::router())
        .nest("/settings", settings::router())
        .nest("/conversations", conversation::router())
}
