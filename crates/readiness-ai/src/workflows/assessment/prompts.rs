//! Hand-authored scoring and get-well plan templates, one pair per section.
//!
//! Scoring templates take `{{responses}}`; plan templates additionally take
//! `{{score}}` and `{{company_type}}`.

use std::collections::HashMap;

use super::sections::Section;

pub const RESPONSES_PLACEHOLDER: &str = "{{responses}}";
pub const SCORE_PLACEHOLDER: &str = "{{score}}";
pub const COMPANY_TYPE_PLACEHOLDER: &str = "{{company_type}}";

pub const SCORING_SYSTEM_INSTRUCTION: &str = "You are an AI assessment expert. Provide only a JSON response with 'score' (integer 1-10) and 'justification' (string).";

pub const PLAN_SYSTEM_INSTRUCTION: &str = "You are an expert AI consultant specializing in strategic planning and organizational development. Provide comprehensive, actionable Get-Well Plans with specific recommendations, timelines, and success metrics.";

const SCORING_FRAME: &str = r#"Evaluate the company's responses for "{{section}}".

Focus: {{focus}}

Scoring scale:
- 1-3: little or no evidence; ad hoc or aspirational answers
- 4-6: partial capability; some structure but gaps in ownership, evidence, or scale
- 7-8: established capability with clear ownership and measurable results
- 9-10: leading capability, repeatable, externally validated

Responses:
{{responses}}

Return JSON only: {"score": <integer 1-10>, "justification": "<two or three sentences>"}"#;

const PLAN_FRAME: &str = r#"Create a Get-Well Plan for "{{section}}".

Company type: {{company_type}}
Current section score: {{score}}/10
Focus: {{focus}}

Assessment responses:
{{responses}}

Structure the plan in markdown:
### Current State
A short diagnosis grounded in the responses above.
### Priority Actions
- **30 days:** quick wins
- **90 days:** foundational investments
- **6-12 months:** scaling and differentiation
### Success Metrics
- measurable indicators tied to each action
### Risks & Dependencies
- what could block progress and how to mitigate it

Tailor every recommendation to a {{company_type}} organization scoring {{score}}/10."#;

fn focus(section: Section) -> &'static str {
    match section {
        Section::CompanyProfile => {
            "strategic alignment of AI with the mission, executive ownership, a documented roadmap, investment posture, and clarity of intended business outcomes"
        }
        Section::TechnicalMaturity => {
            "depth of AI/ML engineering capability, model lifecycle management, tooling and frameworks, data infrastructure, and how impact is measured"
        }
        Section::GovernmentIntegration => {
            "AI delivered on government contracts, contract vehicles, security environments, responsible AI practices for federal use, and public sector go-to-market"
        }
        Section::HealthcareCompliance => {
            "AI delivered in clinical and healthcare settings, HIPAA/FDA/ONC compliance, clinical validation, EHR integration, and healthcare go-to-market"
        }
        Section::FinancialServices => {
            "AI in financial products and workflows, regulatory readiness (SEC, FINRA, PCI DSS), model governance, explainability of decisions, and financial services go-to-market"
        }
        Section::BusinessOperations => {
            "AI embedded in day-to-day operations, process automation, data readiness, governance of AI tools, and measurable operational outcomes"
        }
        Section::Partnerships => {
            "cloud and hardware partnerships, consortia participation, academic relationships, and collaboration with foundation model providers"
        }
        Section::TalentCulture => {
            "AI headcount and hiring goals, upskilling programs, responsible AI training, and adoption of AI across internal business functions"
        }
        Section::FutureReadiness => {
            "investment in emerging AI capabilities, competitive differentiation, scaling challenges, and the company's intended role in the AI ecosystem"
        }
    }
}

fn render_frame(frame: &str, section: Section) -> String {
    frame
        .replace("{{section}}", section.label())
        .replace("{{focus}}", focus(section))
}

/// Prompt templates keyed by section. Built-ins cover every [`Section`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptCatalog {
    scoring: HashMap<Section, String>,
    plans: HashMap<Section, String>,
}

impl PromptCatalog {
    pub fn builtin() -> Self {
        let scoring = Section::ALL
            .into_iter()
            .map(|section| (section, render_frame(SCORING_FRAME, section)))
            .collect();
        let plans = Section::ALL
            .into_iter()
            .map(|section| (section, render_frame(PLAN_FRAME, section)))
            .collect();
        Self { scoring, plans }
    }

    pub fn empty() -> Self {
        Self {
            scoring: HashMap::new(),
            plans: HashMap::new(),
        }
    }

    pub fn with_scoring_template(mut self, section: Section, template: impl Into<String>) -> Self {
        self.scoring.insert(section, template.into());
        self
    }

    pub fn with_plan_template(mut self, section: Section, template: impl Into<String>) -> Self {
        self.plans.insert(section, template.into());
        self
    }

    pub fn scoring_template(&self, section: Section) -> Option<&str> {
        self.scoring.get(&section).map(String::as_str)
    }

    pub fn plan_template(&self, section: Section) -> Option<&str> {
        self.plans.get(&section).map(String::as_str)
    }
}

impl Default for PromptCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
