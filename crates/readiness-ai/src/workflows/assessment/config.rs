use super::prompts::PromptCatalog;

/// Sampling controls for one kind of completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    /// `None` leaves the budget at the service default.
    pub max_tokens: Option<u32>,
}

/// Everything the scoring pipeline needs besides storage and the completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub scoring: GenerationSettings,
    pub plan: GenerationSettings,
    pub prompts: PromptCatalog,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            scoring: GenerationSettings {
                temperature: 0.3,
                max_tokens: None,
            },
            plan: GenerationSettings {
                temperature: 0.4,
                max_tokens: Some(1500),
            },
            prompts: PromptCatalog::builtin(),
        }
    }
}
