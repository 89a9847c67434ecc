use super::completion::{CompletionService, ScoringServiceAdapter};
use super::config::ScoringConfig;
use super::extract::extract_score;
use super::formatter::{format_responses, SectionResponse};
use super::prompts::{
    COMPANY_TYPE_PLACEHOLDER, PLAN_SYSTEM_INSTRUCTION, RESPONSES_PLACEHOLDER, SCORE_PLACEHOLDER,
    SCORING_SYSTEM_INSTRUCTION,
};
use super::sections::Section;

const UNKNOWN_COMPANY_TYPE: &str = "Unknown";

pub fn build_scoring_prompt(template: &str, responses: &[SectionResponse]) -> String {
    template.replace(RESPONSES_PLACEHOLDER, &format_responses(responses))
}

pub fn build_plan_prompt(
    template: &str,
    responses: &[SectionResponse],
    score: i64,
    company_type: Option<&str>,
) -> String {
    let company_type = company_type
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .unwrap_or(UNKNOWN_COMPANY_TYPE);

    template
        .replace(RESPONSES_PLACEHOLDER, &format_responses(responses))
        .replace(SCORE_PLACEHOLDER, &score.to_string())
        .replace(COMPANY_TYPE_PLACEHOLDER, company_type)
}

/// Asks the completion service for a section score. `None` covers both a failed call
/// and a reply with nothing score-like in it.
pub fn score_section<C>(
    adapter: &ScoringServiceAdapter<C>,
    config: &ScoringConfig,
    section: Section,
    responses: &[SectionResponse],
) -> Option<i64>
where
    C: CompletionService,
{
    let template = config.prompts.scoring_template(section)?;
    let prompt = build_scoring_prompt(template, responses);
    let reply = adapter.request(SCORING_SYSTEM_INSTRUCTION, prompt, &config.scoring)?;
    extract_score(&reply)
}

/// Generates the get-well plan for a scored section, trimmed. Blank replies count as failures.
pub fn generate_plan<C>(
    adapter: &ScoringServiceAdapter<C>,
    config: &ScoringConfig,
    section: Section,
    responses: &[SectionResponse],
    score: i64,
    company_type: Option<&str>,
) -> Option<String>
where
    C: CompletionService,
{
    let template = config.prompts.plan_template(section)?;
    let prompt = build_plan_prompt(template, responses, score, company_type);
    let reply = adapter.request(PLAN_SYSTEM_INSTRUCTION, prompt, &config.plan)?;
    let trimmed = reply.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::assessment::completion::{
        CompletionError, CompletionRequest, CompletionService,
    };
    use crate::workflows::assessment::prompts::PromptCatalog;
    use std::sync::{Arc, Mutex};

    struct Scripted {
        reply: &'static str,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl Scripted {
        fn new(reply: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl CompletionService for Scripted {
        fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
            self.seen.lock().expect("log").push(request.clone());
            Ok(self.reply.to_string())
        }
    }

    fn responses() -> Vec<SectionResponse> {
        vec![SectionResponse {
            question: "Who owns AI strategy?".to_string(),
            answer: "The CTO".to_string(),
        }]
    }

    #[test]
    fn plan_prompt_substitutes_every_placeholder() {
        let prompt = build_plan_prompt(
            "{{company_type}} at {{score}}/10\n{{responses}}",
            &responses(),
            4,
            Some("Healthcare"),
        );
        assert_eq!(
            prompt,
            "Healthcare at 4/10\nQ: Who owns AI strategy?\nA: The CTO"
        );
    }

    #[test]
    fn missing_company_type_reads_unknown() {
        let prompt = build_plan_prompt("{{company_type}}", &[], 5, None);
        assert_eq!(prompt, "Unknown");
        let prompt = build_plan_prompt("{{company_type}}", &[], 5, Some("  "));
        assert_eq!(prompt, "Unknown");
    }

    #[test]
    fn plan_is_trimmed_and_uses_plan_settings() {
        let service = Scripted::new("\n\n### Current State\nEarly.\n  ");
        let adapter = ScoringServiceAdapter::new(service.clone());
        let config = ScoringConfig::default();

        let plan = generate_plan(
            &adapter,
            &config,
            Section::CompanyProfile,
            &responses(),
            3,
            Some("Basic"),
        );

        assert_eq!(plan.as_deref(), Some("### Current State\nEarly."));
        let seen = service.seen.lock().expect("log");
        assert_eq!(seen[0].system, PLAN_SYSTEM_INSTRUCTION);
        assert_eq!(seen[0].max_tokens, Some(1500));
        assert!(seen[0].prompt.contains("3/10"));
        assert!(seen[0].prompt.contains("Basic"));
    }

    #[test]
    fn blank_plan_reply_is_no_result() {
        let adapter = ScoringServiceAdapter::new(Scripted::new("   \n"));
        let plan = generate_plan(
            &adapter,
            &ScoringConfig::default(),
            Section::Partnerships,
            &responses(),
            7,
            None,
        );
        assert!(plan.is_none());
    }

    #[test]
    fn scoring_uses_scoring_instruction_and_extracts() {
        let service = Scripted::new(r#"{"score": 6, "justification": "partial"}"#);
        let adapter = ScoringServiceAdapter::new(service.clone());

        let score = score_section(
            &adapter,
            &ScoringConfig::default(),
            Section::TechnicalMaturity,
            &responses(),
        );

        assert_eq!(score, Some(6));
        let seen = service.seen.lock().expect("log");
        assert_eq!(seen[0].system, SCORING_SYSTEM_INSTRUCTION);
        assert_eq!(seen[0].max_tokens, None);
        assert!(seen[0].prompt.contains("Q: Who owns AI strategy?\nA: The CTO"));
    }

    #[test]
    fn missing_template_skips_the_service() {
        let service = Scripted::new(r#"{"score": 9}"#);
        let adapter = ScoringServiceAdapter::new(service.clone());
        let config = ScoringConfig {
            prompts: PromptCatalog::empty(),
            ..ScoringConfig::default()
        };

        assert!(score_section(&adapter, &config, Section::TalentCulture, &responses()).is_none());
        assert!(service.seen.lock().expect("log").is_empty());
    }
}
