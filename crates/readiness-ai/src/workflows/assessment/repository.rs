use super::domain::{
    Assessment, AssessmentId, Company, CompanyId, CompanyProfile, NewAssessment, NewPlan, Plan,
};

/// Storage abstraction so the orchestrator and service can be exercised in isolation.
pub trait AssessmentRepository: Send + Sync {
    /// All companies in insertion order.
    fn companies(&self) -> Result<Vec<Company>, RepositoryError>;
    fn company(&self, id: CompanyId) -> Result<Option<Company>, RepositoryError>;
    fn company_by_name(&self, name: &str) -> Result<Option<Company>, RepositoryError>;

    /// Creates the company or updates the one with the same name. Only `Some` profile
    /// fields overwrite stored values.
    fn save_company(&self, profile: &CompanyProfile) -> Result<Company, RepositoryError>;

    /// Atomically drops every assessment and plan of the company and inserts the new rows.
    fn replace_records(
        &self,
        company_id: CompanyId,
        assessments: Vec<NewAssessment>,
        plans: Vec<NewPlan>,
    ) -> Result<(), RepositoryError>;

    /// Assessments of one company in insertion order.
    fn assessments(&self, company_id: CompanyId) -> Result<Vec<Assessment>, RepositoryError>;

    fn section_assessments(
        &self,
        company_id: CompanyId,
        section: &str,
    ) -> Result<Vec<Assessment>, RepositoryError> {
        Ok(self
            .assessments(company_id)?
            .into_iter()
            .filter(|assessment| assessment.section == section)
            .collect())
    }

    fn assessment(&self, id: AssessmentId) -> Result<Option<Assessment>, RepositoryError>;
    fn plans(&self, company_id: CompanyId) -> Result<Vec<Plan>, RepositoryError>;

    /// Applies the whole change set or nothing.
    fn commit(&self, changes: &ScoringChangeSet) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerEdit {
    pub assessment_id: AssessmentId,
    pub answer: Option<String>,
}

/// Score written onto every non-plan assessment of the section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionScoreUpdate {
    pub section: String,
    pub score: i64,
}

/// Insert-or-overwrite of the single plan kept per (company, section).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanUpsert {
    pub section: String,
    pub plan_text: String,
}

/// Writes accumulated by one orchestrator invocation, committed as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringChangeSet {
    pub company_id: CompanyId,
    pub answer_edits: Vec<AnswerEdit>,
    pub section_scores: Vec<SectionScoreUpdate>,
    pub plans: Vec<PlanUpsert>,
}

impl ScoringChangeSet {
    pub fn new(company_id: CompanyId) -> Self {
        Self {
            company_id,
            answer_edits: Vec::new(),
            section_scores: Vec::new(),
            plans: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.answer_edits.is_empty() && self.section_scores.is_empty() && self.plans.is_empty()
    }
}
