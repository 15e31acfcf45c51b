//! API settings for remote conversation generation.
//!
//! Settings are user data: loaded from the persistence store at startup,
//! edited, and explicitly saved. [`ApiSettings::resolve_target`] turns them
//! into the concrete destination of a generation request.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Endpoint sentinel selecting offline, template-based generation.
pub const TEST_MODE_ENDPOINT: &str = "test-mode";

/// Endpoint sentinel selecting the user-supplied `customEndpoint` URL.
pub const CUSTOM_ENDPOINT: &str = "custom";

/// A named chat-completion endpoint offered in the settings catalog.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NamedEndpoint {
    pub label: &'static str,
    pub url: &'static str,
}

/// Chat-completion endpoints known to speak the OpenAI wire format.
pub const KNOWN_ENDPOINTS: &[NamedEndpoint] = &[
    NamedEndpoint {
        label: "xAI (Grok)",
        url: "https://api.x.ai/v1/chat/completions",
    },
    NamedEndpoint {
        label: "OpenAI",
        url: "https://api.openai.com/v1/chat/completions",
    },
    NamedEndpoint {
        label: "OpenRouter",
        url: "https://openrouter.ai/api/v1/chat/completions",
    },
    NamedEndpoint {
        label: "Groq",
        url: "https://api.groq.com/openai/v1/chat/completions",
    },
];

/// Model identifiers offered in the settings catalog. Any other string is
/// accepted as a custom model.
pub const KNOWN_MODELS: &[&str] = &[
    "grok-3",
    "grok-3-mini",
    "gpt-4o",
    "gpt-4o-mini",
    "llama-3.3-70b-versatile",
];

// ---------------------------------------------------------------------------
// ApiSettings
// ---------------------------------------------------------------------------

/// Persisted API settings.
///
/// Missing fields deserialize to their defaults so an absent or partial
/// settings record still loads.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    /// Bearer token sent to the remote endpoint. Never validated locally.
    pub api_key: String,
    /// A named endpoint URL, [`CUSTOM_ENDPOINT`], or [`TEST_MODE_ENDPOINT`].
    pub endpoint: String,
    /// Literal URL used when `endpoint` is [`CUSTOM_ENDPOINT`].
    pub custom_endpoint: String,
    pub model: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: TEST_MODE_ENDPOINT.to_string(),
            custom_endpoint: String::new(),
            model: String::new(),
        }
    }
}

// Keeps the key out of logs and panic messages.
impl std::fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSettings")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("endpoint", &self.endpoint)
            .field("custom_endpoint", &self.custom_endpoint)
            .field("model", &self.model)
            .finish()
    }
}

/// Where a generation request should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointTarget {
    /// Generate locally from templates; no network call.
    TestMode,
    /// POST to `url` using `model`.
    Remote { url: String, model: String },
}

impl ApiSettings {
    pub fn is_test_mode(&self) -> bool {
        self.endpoint == TEST_MODE_ENDPOINT
    }

    /// Resolve the target of a generation request.
    ///
    /// Fails with [`CoreError::Configuration`] when the custom URL is empty,
    /// no endpoint is selected, or no model is set.
    pub fn resolve_target(&self) -> Result<EndpointTarget, CoreError> {
        if self.is_test_mode() {
            return Ok(EndpointTarget::TestMode);
        }

        let url = if self.endpoint == CUSTOM_ENDPOINT {
            let custom = self.custom_endpoint.trim();
            if custom.is_empty() {
                return Err(CoreError::Configuration(
                    "Please enter a custom API endpoint URL".to_string(),
                ));
            }
            custom.to_string()
        } else {
            let named = self.endpoint.trim();
            if named.is_empty() {
                return Err(CoreError::Configuration(
                    "Please select an API endpoint".to_string(),
                ));
            }
            named.to_string()
        };

        let model = self.model.trim();
        if model.is_empty() {
            return Err(CoreError::Configuration(
                "Please select a model".to_string(),
            ));
        }

        Ok(EndpointTarget::Remote {
            url,
            model: model.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
