//! OpenAI-compatible chat-completion client.

use serde::{Deserialize, Serialize};

use crate::LlmError;

/// Sampling temperature sent with every request.
pub const TEMPERATURE: f32 = 0.7;

/// Completion length cap sent with every request.
pub const MAX_TOKENS: u32 = 4000;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Sends one system + user exchange to a chat-completion endpoint.
///
/// Makes a single attempt per call; there is no retry.
#[derive(Clone, Default)]
pub struct ChatCompletionClient {
    client: reqwest::Client,
}

impl ChatCompletionClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing [`reqwest::Client`] and its connection pool.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// POST the exchange to `endpoint` and return the first completion's
    /// message content.
    pub async fn complete(
        &self,
        endpoint: &str,
        api_key: &str,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, LlmError> {
        let body = ChatRequest {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        tracing::debug!(endpoint, model, "Sending chat completion request");

        let response = self
            .client
            .post(endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify(endpoint, e))?;

        let response = Self::ensure_success(response).await?;
        let text = response.text().await?;
        extract_content(&text)
    }

    /// Return the response unchanged on 2xx, otherwise an
    /// [`LlmError::Api`] carrying the status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = status.as_u16(), "Chat completion request rejected");
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

/// Transport failures become [`LlmError::Network`]; everything else is
/// passed through as [`LlmError::Request`].
fn classify(endpoint: &str, err: reqwest::Error) -> LlmError {
    if err.is_connect() || err.is_timeout() || (err.is_request() && !err.is_builder()) {
        tracing::warn!(endpoint, error = %err, "Chat completion endpoint unreachable");
        LlmError::Network {
            endpoint: endpoint.to_string(),
            source: err,
        }
    } else {
        LlmError::Request(err)
    }
}

/// Pull `choices[0].message.content` out of a response body.
fn extract_content(body: &str) -> Result<String, LlmError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| LlmError::Parse(format!("invalid JSON: {e}")))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| LlmError::Parse("missing choices[0].message.content".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn extracts_first_choice_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"A | 1:00 PM | hi"}},
                       {"message":{"content":"ignored"}}]}"#;
        assert_eq!(extract_content(body).unwrap(), "A | 1:00 PM | hi");
    }

    #[test]
    fn missing_fields_are_parse_errors() {
        for body in [
            r#"{}"#,
            r#"{"choices":[]}"#,
            r#"{"choices":[{}]}"#,
            r#"{"choices":[{"message":{}}]}"#,
            "not json",
        ] {
            assert_matches!(extract_content(body), Err(LlmError::Parse(_)), "{body}");
        }
    }

    #[test]
    fn request_body_has_fixed_sampling_parameters() {
        let body = ChatRequest {
            model: "m",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "s",
                },
                ChatMessage {
                    role: "user",
                    content: "u",
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "u");
        assert_eq!(json["max_tokens"], 4000);
        assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }
}
