mod parser;
mod profile;
pub mod template;

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::workflows::assessment::{
    is_plan_marker, AssessmentRepository, CompanyId, NewAssessment, NewPlan, RepositoryError,
};

pub use profile::{
    COMPANY_NAME, COMPANY_TYPE, COMPANY_TYPE_LEGACY, EMPLOYEE_COUNT, NAICS_CODES, REVENUE,
};
pub use template::{template_csv, template_rows, write_template, TemplateRow, TEMPLATE_FILE_NAME};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read questionnaire upload: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid questionnaire CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("Company Name not found in CSV")]
    MissingCompanyName,
    #[error("malformed questionnaire row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: &'static str },
    #[error("could not store questionnaire data: {0}")]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Replace an existing company's data instead of stopping at the duplicate guard.
    pub confirmed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub company_id: CompanyId,
    pub company_name: String,
    pub replaced_existing: bool,
    pub derived_name: bool,
    pub assessments: usize,
    pub plans: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The company exists and the upload was not confirmed. Nothing was written.
    AlreadyExists { company_name: String },
    Imported(ImportSummary),
}

/// Loads a `Section,Question,Answer` upload into the repository.
pub struct QuestionnaireImporter<R> {
    repository: Arc<R>,
}

impl<R> QuestionnaireImporter<R>
where
    R: AssessmentRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn from_path<P: AsRef<Path>>(
        &self,
        path: P,
        options: ImportOptions,
    ) -> Result<ImportOutcome, ImportError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.import(file, &filename, options)
    }

    /// Profile extraction and the duplicate guard run before any write. The company row
    /// is saved before assessment rows are validated, so a malformed row after that point
    /// leaves the company in place with its previous records.
    pub fn import<Rd: Read>(
        &self,
        reader: Rd,
        filename: &str,
        options: ImportOptions,
    ) -> Result<ImportOutcome, ImportError> {
        let rows = parser::parse_rows(reader)?;
        let extracted =
            profile::extract_profile(&rows, filename).ok_or(ImportError::MissingCompanyName)?;
        if extracted.derived_name {
            info!(
                filename,
                company = %extracted.profile.name,
                "derived company name from file name"
            );
        }

        let existing = self
            .repository
            .company_by_name(&extracted.profile.name)?;
        if existing.is_some() && !options.confirmed {
            warn!(company = %extracted.profile.name, "company already exists; import not confirmed");
            return Ok(ImportOutcome::AlreadyExists {
                company_name: extracted.profile.name,
            });
        }

        let company = self.repository.save_company(&extracted.profile)?;

        let mut assessments = Vec::new();
        let mut plans = Vec::new();
        for row in rows {
            let question = match row.question {
                Some(question) if profile::is_profile_question(&question) => continue,
                Some(question) => question,
                None => {
                    return Err(ImportError::MalformedRow {
                        line: row.line,
                        reason: "missing question",
                    })
                }
            };
            let section = row.section.ok_or(ImportError::MalformedRow {
                line: row.line,
                reason: "missing section",
            })?;

            if is_plan_marker(&question) {
                if let Some(plan_text) = row.answer {
                    plans.push(NewPlan { section, plan_text });
                }
            } else {
                assessments.push(NewAssessment {
                    section,
                    question,
                    answer: row.answer,
                });
            }
        }

        let summary = ImportSummary {
            company_id: company.id,
            company_name: company.name,
            replaced_existing: existing.is_some(),
            derived_name: extracted.derived_name,
            assessments: assessments.len(),
            plans: plans.len(),
        };
        self.repository
            .replace_records(company.id, assessments, plans)?;

        info!(
            company = %summary.company_name,
            assessments = summary.assessments,
            plans = summary.plans,
            replaced = summary.replaced_existing,
            "questionnaire imported"
        );
        Ok(ImportOutcome::Imported(summary))
    }
}
