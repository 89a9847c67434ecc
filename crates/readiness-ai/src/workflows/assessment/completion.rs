use std::sync::Arc;

use tracing::warn;

use super::config::GenerationSettings;

/// A two-message exchange: fixed system instruction plus a templated user prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("no API key configured for the completion service")]
    MissingApiKey,
    #[error("completion transport failed: {0}")]
    Transport(String),
    #[error("completion service returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unable to decode completion response: {0}")]
    Decode(String),
    #[error("completion response contained no message content")]
    EmptyChoices,
}

/// Opaque text-completion backend.
pub trait CompletionService: Send + Sync {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

/// Boundary that turns every completion failure into an absent result.
///
/// One failed call costs one section; it never aborts a scoring run. There is no retry.
pub struct ScoringServiceAdapter<C> {
    service: Arc<C>,
}

impl<C> Clone for ScoringServiceAdapter<C> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<C> ScoringServiceAdapter<C>
where
    C: CompletionService,
{
    pub fn new(service: Arc<C>) -> Self {
        Self { service }
    }

    pub fn request(
        &self,
        system: &str,
        prompt: String,
        settings: &GenerationSettings,
    ) -> Option<String> {
        let request = CompletionRequest {
            system: system.to_string(),
            prompt,
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        };

        match self.service.complete(&request) {
            Ok(text) => Some(text),
            Err(error) => {
                warn!(%error, "completion request failed");
                None
            }
        }
    }
}
