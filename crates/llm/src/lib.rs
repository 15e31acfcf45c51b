//! Remote conversation generation.
//!
//! - [`client::ChatCompletionClient`]: one POST to an OpenAI-compatible
//!   chat-completion endpoint, with failure classification.
//! - [`remote::RemoteGenerationClient`]: resolves the configured endpoint
//!   and either calls the HTTP client or, in test mode, the offline mock
//!   generator.

pub mod client;
pub mod remote;

use dialogue_core::error::CoreError;

pub use client::ChatCompletionClient;
pub use remote::RemoteGenerationClient;

/// Errors from the generation layer.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The endpoint could not be reached at all (DNS, refused connection,
    /// timeout).
    #[error(
        "Could not reach the API at {endpoint}. The domain may be wrong, the service may be \
         down, or the request was blocked (for example by a proxy or CORS policy): {source}"
    )]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-2xx status.
    #[error(
        "API request failed with status {status}: {body}. Please check your API key and endpoint."
    )]
    Api { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("Unexpected API response: {0}")]
    Parse(String),

    /// Any other HTTP client failure.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<LlmError> for CoreError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Core(core) => core,
            LlmError::Api { status, body } => CoreError::Api {
                status,
                message: format!("{body}. Please check your API key and endpoint."),
            },
            LlmError::Parse(msg) => CoreError::Parse(msg),
            e @ (LlmError::Network { .. } | LlmError::Request(_)) => {
                CoreError::Network(e.to_string())
            }
        }
    }
}
