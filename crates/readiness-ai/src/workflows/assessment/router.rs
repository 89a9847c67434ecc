use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::completion::CompletionService;
use super::domain::{AssessmentId, CompanyId};
use super::repository::AssessmentRepository;
use super::service::{AssessmentService, AssessmentServiceError, ImportResult};
use crate::workflows::questionnaire::{ImportOptions, TEMPLATE_FILE_NAME};

/// Largest accepted questionnaire upload.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Router builder exposing company dashboards, import, scoring, plans and reports.
pub fn assessment_router<R, C>(service: Arc<AssessmentService<R, C>>) -> Router
where
    R: AssessmentRepository + 'static,
    C: CompletionService + 'static,
{
    Router::new()
        .route("/api/v1/companies", get(dashboard_handler::<R, C>))
        .route(
            "/api/v1/companies/import",
            post(import_handler::<R, C>).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/api/v1/companies/:company_id",
            get(company_handler::<R, C>),
        )
        .route(
            "/api/v1/companies/:company_id/scores",
            post(score_handler::<R, C>),
        )
        .route(
            "/api/v1/companies/:company_id/plans",
            get(plans_handler::<R, C>),
        )
        .route(
            "/api/v1/companies/:company_id/report",
            get(report_handler::<R, C>),
        )
        .route(
            "/api/v1/assessments/:assessment_id",
            put(answer_handler::<R, C>),
        )
        .route(
            "/api/v1/questionnaire/template",
            get(template_handler::<R, C>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImportQuery {
    #[serde(default)]
    pub(crate) filename: Option<String>,
    #[serde(default)]
    pub(crate) confirmed: bool,
    #[serde(default = "score_by_default")]
    pub(crate) score: bool,
}

fn score_by_default() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerPayload {
    #[serde(default)]
    pub(crate) answer: Option<String>,
}

/// Scoring and storage calls block, so they run on the blocking pool.
async fn run_blocking<R, C, T, F>(
    service: Arc<AssessmentService<R, C>>,
    job: F,
) -> Result<T, Response>
where
    R: AssessmentRepository + 'static,
    C: CompletionService + 'static,
    T: Send + 'static,
    F: FnOnce(&AssessmentService<R, C>) -> Result<T, AssessmentServiceError> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || job(&service)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(error_response(err)),
        Err(join) => {
            error!(error = %join, "blocking assessment task failed");
            let payload = json!({ "error": "assessment task failed" });
            Err((StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response())
        }
    }
}

fn error_response(err: AssessmentServiceError) -> Response {
    let status = if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else if err.is_invalid_input() {
        StatusCode::BAD_REQUEST
    } else {
        error!(error = %err, "assessment request failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}

fn attachment(content_type: &str, file_name: &str, body: impl IntoResponse) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response()
}

pub(crate) async fn dashboard_handler<R, C>(
    State(service): State<Arc<AssessmentService<R, C>>>,
) -> Response
where
    R: AssessmentRepository + 'static,
    C: CompletionService + 'static,
{
    match run_blocking(service, |service| service.dashboard()).await {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn import_handler<R, C>(
    State(service): State<Arc<AssessmentService<R, C>>>,
    Query(query): Query<ImportQuery>,
    body: Bytes,
) -> Response
where
    R: AssessmentRepository + 'static,
    C: CompletionService + 'static,
{
    let filename = query.filename.unwrap_or_else(|| "upload.csv".to_string());
    let options = ImportOptions {
        confirmed: query.confirmed,
    };
    let score = query.score;

    let result = run_blocking(service, move |service| {
        service.import_questionnaire(body.as_ref(), &filename, options, score)
    })
    .await;

    match result {
        Ok(ImportResult::Imported(imported)) => {
            (StatusCode::CREATED, axum::Json(imported)).into_response()
        }
        Ok(ImportResult::AlreadyExists { company_name }) => {
            let payload = json!({
                "status": "company_exists",
                "company_name": company_name,
                "message": "Company already exists. Re-upload with confirmed=true to replace its data.",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(response) => response,
    }
}

pub(crate) async fn company_handler<R, C>(
    State(service): State<Arc<AssessmentService<R, C>>>,
    Path(company_id): Path<i64>,
) -> Response
where
    R: AssessmentRepository + 'static,
    C: CompletionService + 'static,
{
    let id = CompanyId(company_id);
    match run_blocking(service, move |service| service.company_detail(id)).await {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn score_handler<R, C>(
    State(service): State<Arc<AssessmentService<R, C>>>,
    Path(company_id): Path<i64>,
) -> Response
where
    R: AssessmentRepository + 'static,
    C: CompletionService + 'static,
{
    let id = CompanyId(company_id);
    match run_blocking(service, move |service| service.score_company(id)).await {
        Ok(run) => {
            let payload = json!({
                "company_id": run.company_id,
                "scored_sections": run.scored_sections(),
                "outcomes": run.outcomes,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(response) => response,
    }
}

pub(crate) async fn plans_handler<R, C>(
    State(service): State<Arc<AssessmentService<R, C>>>,
    Path(company_id): Path<i64>,
) -> Response
where
    R: AssessmentRepository + 'static,
    C: CompletionService + 'static,
{
    let id = CompanyId(company_id);
    match run_blocking(service, move |service| service.plans(id)).await {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn report_handler<R, C>(
    State(service): State<Arc<AssessmentService<R, C>>>,
    Path(company_id): Path<i64>,
) -> Response
where
    R: AssessmentRepository + 'static,
    C: CompletionService + 'static,
{
    let id = CompanyId(company_id);
    match run_blocking(service, move |service| service.report(id)).await {
        Ok(report) => attachment(
            mime::TEXT_HTML_UTF_8.as_ref(),
            &report.file_name(),
            report.render_html(),
        ),
        Err(response) => response,
    }
}

pub(crate) async fn answer_handler<R, C>(
    State(service): State<Arc<AssessmentService<R, C>>>,
    Path(assessment_id): Path<i64>,
    axum::Json(payload): axum::Json<AnswerPayload>,
) -> Response
where
    R: AssessmentRepository + 'static,
    C: CompletionService + 'static,
{
    let id = AssessmentId(assessment_id);
    match run_blocking(service, move |service| {
        service.update_answer(id, payload.answer)
    })
    .await
    {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn template_handler<R, C>(
    State(service): State<Arc<AssessmentService<R, C>>>,
) -> Response
where
    R: AssessmentRepository + 'static,
    C: CompletionService + 'static,
{
    match run_blocking(service, |service| service.template()).await {
        Ok(bytes) => attachment(mime::TEXT_CSV_UTF_8.as_ref(), TEMPLATE_FILE_NAME, bytes),
        Err(response) => response,
    }
}
