//! Handlers for the `/settings` resource.

use axum::extract::State;
use axum::Json;
use dialogue_core::settings::{
    ApiSettings, NamedEndpoint, CUSTOM_ENDPOINT, KNOWN_ENDPOINTS, KNOWN_MODELS, TEST_MODE_ENDPOINT,
};
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsCatalog {
    pub endpoints: &'static [NamedEndpoint],
    pub models: &'static [&'static str],
    pub test_mode_endpoint: &'static str,
    pub custom_endpoint: &'static str,
}

/// GET /api/v1/settings
pub async fn get(State(state): State<AppState>) -> AppResult<Json<DataResponse<ApiSettings>>> {
    let settings = state.settings.load().await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/v1/settings
pub async fn save(
    State(state): State<AppState>,
    Json(settings): Json<ApiSettings>,
) -> AppResult<Json<DataResponse<ApiSettings>>> {
    state.settings.save(&settings).await?;
    Ok(Json(DataResponse { data: settings }))
}

/// GET /api/v1/settings/catalog
pub async fn catalog() -> Json<DataResponse<SettingsCatalog>> {
    Json(DataResponse {
        data: SettingsCatalog {
            endpoints: KNOWN_ENDPOINTS,
            models: KNOWN_MODELS,
            test_mode_endpoint: TEST_MODE_ENDPOINT,
            custom_endpoint: CUSTOM_ENDPOINT,
        },
    })
}
