use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::completion::{CompletionService, ScoringServiceAdapter};
use super::config::ScoringConfig;
use super::domain::{Assessment, AssessmentId, Company, CompanyId};
use super::formatter::gather_responses;
use super::plan::{generate_plan, score_section};
use super::repository::{
    AnswerEdit, AssessmentRepository, PlanUpsert, RepositoryError, ScoringChangeSet,
    SectionScoreUpdate,
};
use super::sections::{resolve_sections, Section};

/// Which sections one invocation covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoringScope {
    /// Every section resolved from the company's category.
    All,
    /// A single section label, as stored on its assessments.
    Section(String),
}

/// Per-section lifecycle. `Persisted`, `Skipped` and `ScoreFailed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionState {
    Pending,
    ResponsesGathered,
    Scored,
    PlanGenerated,
    Persisted,
    Skipped,
    ScoreFailed,
}

impl SectionState {
    pub fn label(self) -> &'static str {
        match self {
            SectionState::Pending => "pending",
            SectionState::ResponsesGathered => "responses_gathered",
            SectionState::Scored => "scored",
            SectionState::PlanGenerated => "plan_generated",
            SectionState::Persisted => "persisted",
            SectionState::Skipped => "skipped",
            SectionState::ScoreFailed => "score_failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionOutcome {
    pub section: String,
    pub state: SectionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    pub plan_generated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoringRun {
    pub company_id: CompanyId,
    pub outcomes: Vec<SectionOutcome>,
}

impl ScoringRun {
    pub fn scored_sections(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.state == SectionState::Persisted)
            .count()
    }

    pub fn outcome(&self, section: &str) -> Option<&SectionOutcome> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.section == section)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("company {0} not found")]
    CompanyNotFound(CompanyId),
    #[error("assessment {0} not found")]
    AssessmentNotFound(AssessmentId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Drives gather, score, plan and persist for a company's sections.
///
/// Sections run one after another. Every write of an invocation goes into one
/// [`ScoringChangeSet`] committed after the last section is attempted.
pub struct AssessmentOrchestrator<R, C> {
    repository: Arc<R>,
    adapter: ScoringServiceAdapter<C>,
    config: Arc<ScoringConfig>,
}

impl<R, C> AssessmentOrchestrator<R, C>
where
    R: AssessmentRepository + 'static,
    C: CompletionService + 'static,
{
    pub fn new(repository: Arc<R>, completions: Arc<C>, config: Arc<ScoringConfig>) -> Self {
        Self {
            repository,
            adapter: ScoringServiceAdapter::new(completions),
            config,
        }
    }

    /// Bulk scoring over the company's resolved sections.
    pub fn score_company(&self, company_id: CompanyId) -> Result<ScoringRun, OrchestratorError> {
        self.run(
            company_id,
            ScoringScope::All,
            ScoringChangeSet::new(company_id),
        )
    }

    /// Stores a new answer and rescores its section in the same commit.
    pub fn apply_answer(
        &self,
        assessment_id: AssessmentId,
        answer: Option<String>,
    ) -> Result<(Assessment, ScoringRun), OrchestratorError> {
        let assessment = self
            .repository
            .assessment(assessment_id)?
            .ok_or(OrchestratorError::AssessmentNotFound(assessment_id))?;

        let mut changes = ScoringChangeSet::new(assessment.company_id);
        changes.answer_edits.push(AnswerEdit {
            assessment_id,
            answer,
        });

        let run = self.run(
            assessment.company_id,
            ScoringScope::Section(assessment.section.clone()),
            changes,
        )?;
        Ok((assessment, run))
    }

    pub fn run(
        &self,
        company_id: CompanyId,
        scope: ScoringScope,
        mut changes: ScoringChangeSet,
    ) -> Result<ScoringRun, OrchestratorError> {
        let company = self
            .repository
            .company(company_id)?
            .ok_or(OrchestratorError::CompanyNotFound(company_id))?;

        let sections = match scope {
            ScoringScope::All => resolve_sections(company.company_type.as_deref())
                .into_iter()
                .map(|section| section.label().to_string())
                .collect(),
            ScoringScope::Section(label) => vec![label],
        };

        let mut outcomes = Vec::with_capacity(sections.len());
        for label in sections {
            info!(company = %company.name, section = %label, "scoring section");
            let outcome = self.process_section(&company, label, &mut changes)?;
            info!(
                section = %outcome.section,
                state = outcome.state.label(),
                score = ?outcome.score,
                "section finished"
            );
            outcomes.push(outcome);
        }

        if !changes.is_empty() {
            self.repository.commit(&changes)?;
        }

        Ok(ScoringRun {
            company_id,
            outcomes,
        })
    }

    fn process_section(
        &self,
        company: &Company,
        label: String,
        changes: &mut ScoringChangeSet,
    ) -> Result<SectionOutcome, OrchestratorError> {
        let mut outcome = SectionOutcome {
            section: label,
            state: SectionState::Pending,
            score: None,
            plan_generated: false,
        };

        let mut rows = self
            .repository
            .section_assessments(company.id, &outcome.section)?;
        for row in &mut rows {
            if let Some(edit) = changes
                .answer_edits
                .iter()
                .find(|edit| edit.assessment_id == row.id)
            {
                row.answer = edit.answer.clone();
            }
        }

        let responses = gather_responses(&rows);
        if responses.is_empty() {
            transition(&mut outcome, SectionState::Skipped);
            return Ok(outcome);
        }
        transition(&mut outcome, SectionState::ResponsesGathered);

        let Some(section) = Section::from_label(&outcome.section) else {
            warn!(section = %outcome.section, "no prompts for section label");
            transition(&mut outcome, SectionState::ScoreFailed);
            return Ok(outcome);
        };

        let Some(score) = score_section(&self.adapter, &self.config, section, &responses) else {
            transition(&mut outcome, SectionState::ScoreFailed);
            return Ok(outcome);
        };
        outcome.score = Some(score);
        changes.section_scores.push(SectionScoreUpdate {
            section: outcome.section.clone(),
            score,
        });
        transition(&mut outcome, SectionState::Scored);

        match generate_plan(
            &self.adapter,
            &self.config,
            section,
            &responses,
            score,
            company.company_type.as_deref(),
        ) {
            Some(plan_text) => {
                changes.plans.push(PlanUpsert {
                    section: outcome.section.clone(),
                    plan_text,
                });
                outcome.plan_generated = true;
                transition(&mut outcome, SectionState::PlanGenerated);
            }
            None => warn!(section = %outcome.section, "get-well plan generation failed"),
        }

        transition(&mut outcome, SectionState::Persisted);
        Ok(outcome)
    }
}

fn transition(outcome: &mut SectionOutcome, next: SectionState) {
    debug!(
        section = %outcome.section,
        from = outcome.state.label(),
        to = next.label(),
        "section state"
    );
    outcome.state = next;
}
