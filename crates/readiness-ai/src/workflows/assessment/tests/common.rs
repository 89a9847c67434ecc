use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::assessment::prompts::{PLAN_SYSTEM_INSTRUCTION, SCORING_SYSTEM_INSTRUCTION};
use crate::workflows::assessment::repository::{AssessmentRepository, RepositoryError};
use crate::workflows::assessment::{
    assessment_router, Assessment, AssessmentId, AssessmentOrchestrator, AssessmentService,
    Company, CompanyId, CompanyProfile, CompletionError, CompletionRequest, CompletionService,
    InMemoryAssessmentRepository, NewAssessment, NewPlan, Plan, ScoringChangeSet, ScoringConfig,
    Section,
};

/// Answers containing this text make the scoring call fail.
pub(super) const FAIL_SCORE: &str = "[fail-score]";
/// Answers containing this text make the plan call fail.
pub(super) const FAIL_PLAN: &str = "[fail-plan]";

/// Completion backend keyed on the system instruction of each request.
pub(super) struct ScriptedCompletions {
    default_score: i64,
    scores: Vec<(&'static str, i64)>,
    calls: Mutex<Vec<CompletionRequest>>,
    plans_written: AtomicUsize,
}

impl ScriptedCompletions {
    pub(super) fn new(default_score: i64) -> Self {
        Self {
            default_score,
            scores: Vec::new(),
            calls: Mutex::new(Vec::new()),
            plans_written: AtomicUsize::new(0),
        }
    }

    /// Prompts containing `marker` score `score` instead of the default.
    pub(super) fn with_score(mut self, marker: &'static str, score: i64) -> Self {
        self.scores.push((marker, score));
        self
    }

    pub(super) fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    pub(super) fn scoring_calls(&self) -> Vec<CompletionRequest> {
        self.calls()
            .into_iter()
            .filter(|call| call.system == SCORING_SYSTEM_INSTRUCTION)
            .collect()
    }

    pub(super) fn plan_calls(&self) -> Vec<CompletionRequest> {
        self.calls()
            .into_iter()
            .filter(|call| call.system == PLAN_SYSTEM_INSTRUCTION)
            .collect()
    }
}

impl CompletionService for ScriptedCompletions {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(request.clone());

        if request.system == SCORING_SYSTEM_INSTRUCTION {
            if request.prompt.contains(FAIL_SCORE) {
                return Err(CompletionError::Transport("connection reset".to_string()));
            }
            let score = self
                .scores
                .iter()
                .find(|(marker, _)| request.prompt.contains(marker))
                .map(|(_, score)| *score)
                .unwrap_or(self.default_score);
            return Ok(format!(
                "Here you go: {{\"score\": {score}, \"justification\": \"scripted\"}}"
            ));
        }

        if request.prompt.contains(FAIL_PLAN) {
            return Err(CompletionError::Status {
                status: 503,
                message: "overloaded".to_string(),
            });
        }
        let version = self.plans_written.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!(
            "\n### Current State\n- **30 days:** assign an owner\n---\nRevision {version}\n"
        ))
    }
}

/// In-memory repository that counts commits and can be told to reject them.
#[derive(Default)]
pub(super) struct CountingRepository {
    inner: InMemoryAssessmentRepository,
    commits: AtomicUsize,
    reject_commits: AtomicBool,
}

impl CountingRepository {
    pub(super) fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub(super) fn reject_commits(&self) {
        self.reject_commits.store(true, Ordering::SeqCst);
    }
}

impl AssessmentRepository for CountingRepository {
    fn companies(&self) -> Result<Vec<Company>, RepositoryError> {
        self.inner.companies()
    }

    fn company(&self, id: CompanyId) -> Result<Option<Company>, RepositoryError> {
        self.inner.company(id)
    }

    fn company_by_name(&self, name: &str) -> Result<Option<Company>, RepositoryError> {
        self.inner.company_by_name(name)
    }

    fn save_company(&self, profile: &CompanyProfile) -> Result<Company, RepositoryError> {
        self.inner.save_company(profile)
    }

    fn replace_records(
        &self,
        company_id: CompanyId,
        assessments: Vec<NewAssessment>,
        plans: Vec<NewPlan>,
    ) -> Result<(), RepositoryError> {
        self.inner.replace_records(company_id, assessments, plans)
    }

    fn assessments(&self, company_id: CompanyId) -> Result<Vec<Assessment>, RepositoryError> {
        self.inner.assessments(company_id)
    }

    fn assessment(&self, id: AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        self.inner.assessment(id)
    }

    fn plans(&self, company_id: CompanyId) -> Result<Vec<Plan>, RepositoryError> {
        self.inner.plans(company_id)
    }

    fn commit(&self, changes: &ScoringChangeSet) -> Result<(), RepositoryError> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        if self.reject_commits.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("disk full".to_string()));
        }
        self.inner.commit(changes)
    }
}

pub(super) fn profile(name: &str, company_type: Option<&str>) -> CompanyProfile {
    CompanyProfile {
        name: name.to_string(),
        annual_revenue: Some("$12M".to_string()),
        employee_count: Some("85".to_string()),
        company_type: company_type.map(str::to_string),
        naics_codes: None,
    }
}

pub(super) fn row(section: Section, question: &str, answer: Option<&str>) -> NewAssessment {
    NewAssessment {
        section: section.label().to_string(),
        question: question.to_string(),
        answer: answer.map(str::to_string),
    }
}

/// Stores a company with the given assessment rows.
pub(super) fn seed_company<R: AssessmentRepository>(
    repository: &R,
    name: &str,
    company_type: Option<&str>,
    rows: Vec<NewAssessment>,
) -> Company {
    let company = repository
        .save_company(&profile(name, company_type))
        .expect("company saved");
    repository
        .replace_records(company.id, rows, Vec::new())
        .expect("rows stored");
    company
}

/// A `Basic` company with answers in sections 1, 2 and 3, a plan-marker row, and
/// unanswered sections 4 and 5.
pub(super) fn basic_company_rows() -> Vec<NewAssessment> {
    vec![
        row(
            Section::CompanyProfile,
            "What is your company's overall mission and how does AI fit into it?",
            Some("Route freight with forecasting models"),
        ),
        row(
            Section::CompanyProfile,
            "Do you have a formal AI strategy or roadmap?",
            Some("A one-page roadmap"),
        ),
        row(
            Section::CompanyProfile,
            "Get-Well Plan AI Section 1: Company Profile & Strategic Alignment",
            Some("old plan text"),
        ),
        row(
            Section::TechnicalMaturity,
            "What development frameworks and toolchains are most commonly used?",
            Some("scikit-learn and dbt"),
        ),
        row(
            Section::BusinessOperations,
            "Which core business processes currently use AI or automation?",
            Some("Invoice matching"),
        ),
        row(
            Section::Partnerships,
            "Which AI hardware or cloud partners do you actively collaborate with?",
            None,
        ),
        row(
            Section::TalentCulture,
            "Does your company offer AI training or upskilling programs internally?",
            Some("   "),
        ),
    ]
}

pub(super) fn orchestrator(
    repository: Arc<CountingRepository>,
    completions: Arc<ScriptedCompletions>,
) -> AssessmentOrchestrator<CountingRepository, ScriptedCompletions> {
    AssessmentOrchestrator::new(repository, completions, Arc::new(ScoringConfig::default()))
}

pub(super) fn build_service(
    completions: ScriptedCompletions,
) -> (
    AssessmentService<CountingRepository, ScriptedCompletions>,
    Arc<CountingRepository>,
    Arc<ScriptedCompletions>,
) {
    let repository = Arc::new(CountingRepository::default());
    let completions = Arc::new(completions);
    let service = AssessmentService::new(
        repository.clone(),
        completions.clone(),
        ScoringConfig::default(),
    );
    (service, repository, completions)
}

pub(super) fn router_with_service(
    service: AssessmentService<CountingRepository, ScriptedCompletions>,
) -> axum::Router {
    assessment_router(Arc::new(service))
}

pub(super) const UPLOAD: &str = "Section,Question,Answer
Section 1: Company Profile & Strategic Alignment,Company Name,Northwind Freight
Section 1: Company Profile & Strategic Alignment,\"Company Type: Basic, Financial Transaction Services, Healthcare, Technology & Government\",Basic
Section 1: Company Profile & Strategic Alignment,What is your company's overall mission and how does AI fit into it?,Forecast demand [s1]
Section 2: AI Capabilities & Technical Maturity,What development frameworks and toolchains are most commonly used?,PyTorch [s2]
Section 3: AI Integration & Business Operations,Which core business processes currently use AI or automation?,Invoice matching [s3]
Section 6: Future Readiness & Differentiators,What emerging AI capabilities are you investing in?,Agents
";

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}
