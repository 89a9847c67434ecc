//! Section scoring and Get-Well plan generation for uploaded company assessments.

mod completion;
mod config;
pub mod domain;
mod extract;
mod formatter;
mod memory;
mod openai;
pub mod orchestrator;
mod plan;
pub mod prompts;
pub mod repository;
pub mod router;
mod scores;
mod sections;
pub mod service;
mod sqlite;
pub mod views;

#[cfg(test)]
mod tests;

pub use completion::{CompletionError, CompletionRequest, CompletionService};
pub use config::{GenerationSettings, ScoringConfig};
pub use domain::{
    is_plan_marker, Assessment, AssessmentId, Company, CompanyId, CompanyProfile, NewAssessment,
    NewPlan, Plan, PlanId, PLAN_MARKER,
};
pub use extract::extract_score;
pub use formatter::{format_responses, SectionResponse};
pub use memory::InMemoryAssessmentRepository;
pub use openai::OpenAiCompletionClient;
pub use orchestrator::{
    AssessmentOrchestrator, OrchestratorError, ScoringRun, ScoringScope, SectionOutcome,
    SectionState,
};
pub use prompts::PromptCatalog;
pub use repository::{AssessmentRepository, RepositoryError, ScoringChangeSet};
pub use router::assessment_router;
pub use scores::{overall_score, section_score, ScoreBand};
pub use sections::{resolve_sections, CompanyCategory, Section};
pub use service::{
    AssessmentService, AssessmentServiceError, ImportResult, ImportedQuestionnaire,
};
pub use sqlite::SqliteAssessmentRepository;
pub use views::{
    display_sections, AnswerUpdateView, CompanyDetailView, DashboardEntry, PlansView,
};
