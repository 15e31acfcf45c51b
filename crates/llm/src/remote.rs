//! Generation entry point: test mode or a remote endpoint.

use std::time::Duration;

use dialogue_core::mock::MockConversationGenerator;
use dialogue_core::prompt::ConversationPrompt;
use dialogue_core::settings::{ApiSettings, EndpointTarget};
use tokio::sync::Mutex;

use crate::client::ChatCompletionClient;
use crate::LlmError;

/// Produces transcript text for a prompt according to [`ApiSettings`].
pub struct RemoteGenerationClient {
    http: ChatCompletionClient,
    mock: Mutex<MockConversationGenerator>,
    simulated_latency: Duration,
}

impl Default for RemoteGenerationClient {
    fn default() -> Self {
        Self::new(ChatCompletionClient::new())
    }
}

impl RemoteGenerationClient {
    pub fn new(http: ChatCompletionClient) -> Self {
        Self::with_mock(http, MockConversationGenerator::new())
    }

    /// Use a specific (e.g. seeded) mock generator for test mode.
    pub fn with_mock(http: ChatCompletionClient, mock: MockConversationGenerator) -> Self {
        Self {
            http,
            mock: Mutex::new(mock),
            simulated_latency: Duration::ZERO,
        }
    }

    /// Delay test-mode responses to mimic a network round trip.
    pub fn with_simulated_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = latency;
        self
    }

    /// Generate a transcript.
    ///
    /// In test mode no request is made and the mock generator answers.
    /// Otherwise the endpoint and model are resolved first, so
    /// configuration errors surface before any network traffic.
    pub async fn generate(
        &self,
        prompt: &ConversationPrompt,
        settings: &ApiSettings,
    ) -> Result<String, LlmError> {
        match settings.resolve_target()? {
            EndpointTarget::TestMode => {
                if !self.simulated_latency.is_zero() {
                    tokio::time::sleep(self.simulated_latency).await;
                }
                let transcript = self.mock.lock().await.generate(
                    &prompt.first_name,
                    &prompt.second_name,
                    &prompt.topic,
                    prompt.message_count as usize,
                );
                tracing::info!(topic = %prompt.topic, "Generated test-mode transcript");
                Ok(transcript)
            }
            EndpointTarget::Remote { url, model } => {
                let transcript = self
                    .http
                    .complete(
                        &url,
                        &settings.api_key,
                        &model,
                        &prompt.system_prompt,
                        &prompt.user_prompt,
                    )
                    .await?;
                tracing::info!(endpoint = %url, model = %model, "Generated remote transcript");
                Ok(transcript)
            }
        }
    }
}
