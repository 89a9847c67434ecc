use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tracing::{info, warn};

use super::completion::CompletionService;
use super::config::ScoringConfig;
use super::domain::{AssessmentId, Company, CompanyId};
use super::orchestrator::{AssessmentOrchestrator, OrchestratorError, ScoringRun};
use super::repository::{AssessmentRepository, RepositoryError};
use super::views::{AnswerUpdateView, CompanyDetailView, DashboardEntry, PlansView};
use crate::workflows::questionnaire::{
    template_csv, ImportError, ImportOptions, ImportOutcome, ImportSummary,
    QuestionnaireImporter,
};
use crate::workflows::report::AssessmentReport;

/// Facade over import, scoring, and the read views used by the API and CLI.
pub struct AssessmentService<R, C> {
    repository: Arc<R>,
    importer: QuestionnaireImporter<R>,
    orchestrator: AssessmentOrchestrator<R, C>,
}

/// A stored upload, plus the automatic scoring run when one was attempted.
#[derive(Debug, Clone, Serialize)]
pub struct ImportedQuestionnaire {
    #[serde(flatten)]
    pub summary: ImportSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringRun>,
    /// Set when the upload was stored but scoring did not complete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ImportResult {
    AlreadyExists { company_name: String },
    Imported(ImportedQuestionnaire),
}

impl<R, C> AssessmentService<R, C>
where
    R: AssessmentRepository + 'static,
    C: CompletionService + 'static,
{
    pub fn new(repository: Arc<R>, completions: Arc<C>, config: ScoringConfig) -> Self {
        let orchestrator =
            AssessmentOrchestrator::new(repository.clone(), completions, Arc::new(config));
        Self {
            importer: QuestionnaireImporter::new(repository.clone()),
            repository,
            orchestrator,
        }
    }

    pub fn dashboard(&self) -> Result<Vec<DashboardEntry>, AssessmentServiceError> {
        let companies = self.repository.companies()?;
        let mut entries = Vec::with_capacity(companies.len());
        for company in &companies {
            let assessments = self.repository.assessments(company.id)?;
            entries.push(DashboardEntry::build(company, &assessments));
        }
        Ok(entries)
    }

    pub fn company_detail(
        &self,
        company_id: CompanyId,
    ) -> Result<CompanyDetailView, AssessmentServiceError> {
        let company = self.company(company_id)?;
        let assessments = self.repository.assessments(company_id)?;
        let plans = self.repository.plans(company_id)?;
        Ok(CompanyDetailView::build(company, &assessments, &plans))
    }

    pub fn plans(&self, company_id: CompanyId) -> Result<PlansView, AssessmentServiceError> {
        let company = self.company(company_id)?;
        let assessments = self.repository.assessments(company_id)?;
        let plans = self.repository.plans(company_id)?;
        Ok(PlansView::build(&company, &assessments, &plans))
    }

    pub fn score_company(&self, company_id: CompanyId) -> Result<ScoringRun, AssessmentServiceError> {
        let run = self.orchestrator.score_company(company_id)?;
        info!(
            company_id = %company_id,
            scored = run.scored_sections(),
            attempted = run.outcomes.len(),
            "bulk scoring finished"
        );
        Ok(run)
    }

    /// Stores the edited answer, rescores its section, and returns the refreshed scores.
    pub fn update_answer(
        &self,
        assessment_id: AssessmentId,
        answer: Option<String>,
    ) -> Result<AnswerUpdateView, AssessmentServiceError> {
        let answer = answer
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        let (assessment, run) = self.orchestrator.apply_answer(assessment_id, answer)?;

        let company = self.company(assessment.company_id)?;
        let assessments = self.repository.assessments(company.id)?;
        Ok(AnswerUpdateView::build(
            assessment_id,
            assessment.section,
            company.company_type.as_deref(),
            &assessments,
            run,
        ))
    }

    /// Imports an upload and, when `score` is set, runs bulk scoring on the result.
    pub fn import_questionnaire<Rd: Read>(
        &self,
        reader: Rd,
        filename: &str,
        options: ImportOptions,
        score: bool,
    ) -> Result<ImportResult, AssessmentServiceError> {
        let outcome = self.importer.import(reader, filename, options)?;
        Ok(self.after_import(outcome, score))
    }

    pub fn import_path<P: AsRef<Path>>(
        &self,
        path: P,
        options: ImportOptions,
        score: bool,
    ) -> Result<ImportResult, AssessmentServiceError> {
        let outcome = self.importer.from_path(path, options)?;
        Ok(self.after_import(outcome, score))
    }

    fn after_import(&self, outcome: ImportOutcome, score: bool) -> ImportResult {
        let summary = match outcome {
            ImportOutcome::AlreadyExists { company_name } => {
                return ImportResult::AlreadyExists { company_name }
            }
            ImportOutcome::Imported(summary) => summary,
        };

        if !score {
            return ImportResult::Imported(ImportedQuestionnaire {
                summary,
                scoring: None,
                warning: None,
            });
        }

        let (scoring, warning) = match self.orchestrator.score_company(summary.company_id) {
            Ok(run) if run.scored_sections() == 0 && !run.outcomes.is_empty() => {
                warn!(company = %summary.company_name, "no section could be scored after import");
                (
                    Some(run),
                    Some("Upload successful but no section could be scored".to_string()),
                )
            }
            Ok(run) => (Some(run), None),
            Err(err) => {
                warn!(company = %summary.company_name, error = %err, "scoring after import failed");
                (
                    None,
                    Some(format!("Upload successful but AI scoring failed: {err}")),
                )
            }
        };

        ImportResult::Imported(ImportedQuestionnaire {
            summary,
            scoring,
            warning,
        })
    }

    pub fn template(&self) -> Result<Vec<u8>, AssessmentServiceError> {
        Ok(template_csv()?)
    }

    pub fn report(&self, company_id: CompanyId) -> Result<AssessmentReport, AssessmentServiceError> {
        self.report_at(company_id, Local::now().naive_local())
    }

    pub fn report_at(
        &self,
        company_id: CompanyId,
        generated_at: NaiveDateTime,
    ) -> Result<AssessmentReport, AssessmentServiceError> {
        let company = self.company(company_id)?;
        let assessments = self.repository.assessments(company_id)?;
        let plans = self.repository.plans(company_id)?;
        Ok(AssessmentReport::build(
            &company,
            &assessments,
            &plans,
            generated_at,
        ))
    }

    fn company(&self, company_id: CompanyId) -> Result<Company, AssessmentServiceError> {
        self.repository
            .company(company_id)?
            .ok_or(AssessmentServiceError::CompanyNotFound(company_id))
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error("company {0} not found")]
    CompanyNotFound(CompanyId),
    #[error("assessment {0} not found")]
    AssessmentNotFound(AssessmentId),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("failed to render questionnaire template: {0}")]
    Template(#[from] csv::Error),
}

impl AssessmentServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AssessmentServiceError::CompanyNotFound(_)
                | AssessmentServiceError::AssessmentNotFound(_)
                | AssessmentServiceError::Repository(RepositoryError::NotFound)
        )
    }

    /// Problems with the caller's upload rather than with storage.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            AssessmentServiceError::Import(
                ImportError::Csv(_)
                    | ImportError::Io(_)
                    | ImportError::MissingCompanyName
                    | ImportError::MalformedRow { .. }
            )
        )
    }
}

impl From<OrchestratorError> for AssessmentServiceError {
    fn from(err: OrchestratorError) -> Self {
        match err {
            OrchestratorError::CompanyNotFound(id) => Self::CompanyNotFound(id),
            OrchestratorError::AssessmentNotFound(id) => Self::AssessmentNotFound(id),
            OrchestratorError::Repository(err) => Self::Repository(err),
        }
    }
}
