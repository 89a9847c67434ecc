use metrics_exporter_prometheus::PrometheusHandle;
use readiness_ai::config::{AppConfig, StorageConfig};
use readiness_ai::error::AppError;
use readiness_ai::workflows::assessment::domain::{
    Assessment, AssessmentId, Company, CompanyId, CompanyProfile, NewAssessment, NewPlan, Plan,
};
use readiness_ai::workflows::assessment::{
    AssessmentRepository, AssessmentService, InMemoryAssessmentRepository, OpenAiCompletionClient,
    RepositoryError, ScoringChangeSet, ScoringConfig, SqliteAssessmentRepository,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Storage backend picked from `APP_STORAGE`.
pub(crate) enum AppRepository {
    Memory(InMemoryAssessmentRepository),
    Sqlite(SqliteAssessmentRepository),
}

pub(crate) type AppService = AssessmentService<AppRepository, OpenAiCompletionClient>;

macro_rules! delegate {
    ($self:ident, $repo:ident => $call:expr) => {
        match $self {
            AppRepository::Memory($repo) => $call,
            AppRepository::Sqlite($repo) => $call,
        }
    };
}

impl AssessmentRepository for AppRepository {
    fn companies(&self) -> Result<Vec<Company>, RepositoryError> {
        delegate!(self, repo => repo.companies())
    }

    fn company(&self, id: CompanyId) -> Result<Option<Company>, RepositoryError> {
        delegate!(self, repo => repo.company(id))
    }

    fn company_by_name(&self, name: &str) -> Result<Option<Company>, RepositoryError> {
        delegate!(self, repo => repo.company_by_name(name))
    }

    fn save_company(&self, profile: &CompanyProfile) -> Result<Company, RepositoryError> {
        delegate!(self, repo => repo.save_company(profile))
    }

    fn replace_records(
        &self,
        company_id: CompanyId,
        assessments: Vec<NewAssessment>,
        plans: Vec<NewPlan>,
    ) -> Result<(), RepositoryError> {
        delegate!(self, repo => repo.replace_records(company_id, assessments, plans))
    }

    fn assessments(&self, company_id: CompanyId) -> Result<Vec<Assessment>, RepositoryError> {
        delegate!(self, repo => repo.assessments(company_id))
    }

    fn section_assessments(
        &self,
        company_id: CompanyId,
        section: &str,
    ) -> Result<Vec<Assessment>, RepositoryError> {
        delegate!(self, repo => repo.section_assessments(company_id, section))
    }

    fn assessment(&self, id: AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        delegate!(self, repo => repo.assessment(id))
    }

    fn plans(&self, company_id: CompanyId) -> Result<Vec<Plan>, RepositoryError> {
        delegate!(self, repo => repo.plans(company_id))
    }

    fn commit(&self, changes: &ScoringChangeSet) -> Result<(), RepositoryError> {
        delegate!(self, repo => repo.commit(changes))
    }
}

pub(crate) fn build_repository(storage: &StorageConfig) -> Result<AppRepository, RepositoryError> {
    match storage {
        StorageConfig::Memory => {
            info!("using in-memory assessment storage");
            Ok(AppRepository::Memory(InMemoryAssessmentRepository::new()))
        }
        StorageConfig::Sqlite { path } => {
            info!(path = %path.display(), "using sqlite assessment storage");
            Ok(AppRepository::Sqlite(SqliteAssessmentRepository::open(
                path,
            )?))
        }
    }
}

/// Wires storage and the completion client. The client is blocking, so callers build
/// the service off the async runtime.
pub(crate) fn build_service(config: &AppConfig) -> Result<AppService, AppError> {
    let repository = Arc::new(build_repository(&config.storage)?);
    let completions = OpenAiCompletionClient::new(&config.llm)?;
    if config.llm.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; scoring calls will fail and be skipped");
    }
    info!(model = completions.model(), "completion client ready");

    Ok(AssessmentService::new(
        repository,
        Arc::new(completions),
        ScoringConfig::default(),
    ))
}
