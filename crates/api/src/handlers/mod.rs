//! Request handlers. Each delegates to a repository or the orchestrator
//! and maps errors via [`AppError`](crate::error::AppError).

pub mod character;
pub mod conversation;
pub mod settings;

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;

/// Build a file-download response.
pub(crate) fn attachment(
    content_type: &'static str,
    filename: &str,
    body: String,
) -> Result<Response, AppError> {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .map_err(|e| AppError::InternalError(format!("Invalid download filename: {e}")))?;
    Ok((
        [
            (CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
