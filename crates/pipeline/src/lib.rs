//! Generation orchestration.
//!
//! Turns a [`GenerationRequest`] into a parsed and rendered conversation:
//! validate, resolve characters and settings, build the prompt, generate,
//! parse, render.

pub mod orchestrator;
pub mod request;

use dialogue_core::error::CoreError;
use dialogue_db::DbError;
use dialogue_llm::LlmError;

pub use orchestrator::{parse_conversation, GeneratedConversation, GenerationOrchestrator};
pub use request::GenerationRequest;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<LlmError> for PipelineError {
    fn from(err: LlmError) -> Self {
        PipelineError::Core(err.into())
    }
}
