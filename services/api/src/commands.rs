use crate::infra::build_service;
use clap::Args;
use readiness_ai::config::AppConfig;
use readiness_ai::error::AppError;
use readiness_ai::telemetry;
use readiness_ai::workflows::assessment::{
    AssessmentRepository, AssessmentService, AssessmentServiceError, CompanyId, CompletionService,
    ImportResult, ScoringRun,
};
use readiness_ai::workflows::questionnaire::{template_csv, ImportOptions};
use readiness_ai::workflows::report::format_score;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// Questionnaire CSV with Section, Question, Answer columns
    pub(crate) path: PathBuf,
    /// Replace the stored data when the company already exists
    #[arg(long)]
    pub(crate) confirm: bool,
    /// Store the upload without running AI scoring
    #[arg(long)]
    pub(crate) skip_scoring: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Company id as shown on the dashboard
    pub(crate) company_id: i64,
}

#[derive(Args, Debug)]
pub(crate) struct TemplateArgs {
    /// Destination file (stdout when omitted)
    #[arg(long, short)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Company id as shown on the dashboard
    pub(crate) company_id: i64,
    /// Destination file (defaults to the generated report name)
    #[arg(long, short)]
    pub(crate) output: Option<PathBuf>,
}

fn prepare() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let config = prepare()?;
    let service = build_service(&config)?;
    import_questionnaire(&service, &args, &mut std::io::stdout().lock())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = prepare()?;
    let service = build_service(&config)?;
    score_company(&service, &args, &mut std::io::stdout().lock())
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let config = prepare()?;
    let service = build_service(&config)?;
    let written = export_report(&service, &args)?;
    println!("Report written to {}", written.display());
    Ok(())
}

pub(crate) fn run_template(args: TemplateArgs) -> Result<(), AppError> {
    let bytes = template_csv().map_err(AssessmentServiceError::from)?;
    match args.output {
        Some(path) => {
            std::fs::write(&path, bytes)?;
            println!("Template written to {}", path.display());
        }
        None => std::io::stdout().lock().write_all(&bytes)?,
    }
    Ok(())
}

pub(crate) fn import_questionnaire<R, C, W>(
    service: &AssessmentService<R, C>,
    args: &ImportArgs,
    out: &mut W,
) -> Result<(), AppError>
where
    R: AssessmentRepository + 'static,
    C: CompletionService + 'static,
    W: Write,
{
    let options = ImportOptions {
        confirmed: args.confirm,
    };
    match service.import_path(&args.path, options, !args.skip_scoring)? {
        ImportResult::AlreadyExists { company_name } => {
            writeln!(
                out,
                "Company '{company_name}' already exists; re-run with --confirm to replace its data."
            )?;
        }
        ImportResult::Imported(imported) => {
            let summary = &imported.summary;
            writeln!(
                out,
                "{} {} (id {}): {} assessments, {} plans",
                if summary.replaced_existing {
                    "Replaced"
                } else {
                    "Imported"
                },
                summary.company_name,
                summary.company_id,
                summary.assessments,
                summary.plans
            )?;
            if summary.derived_name {
                writeln!(out, "Company name was derived from the file name.")?;
            }
            if let Some(run) = &imported.scoring {
                render_run(out, run)?;
            }
            if let Some(warning) = &imported.warning {
                writeln!(out, "Warning: {warning}")?;
            }
        }
    }
    Ok(())
}

pub(crate) fn score_company<R, C, W>(
    service: &AssessmentService<R, C>,
    args: &ScoreArgs,
    out: &mut W,
) -> Result<(), AppError>
where
    R: AssessmentRepository + 'static,
    C: CompletionService + 'static,
    W: Write,
{
    let run = service.score_company(CompanyId(args.company_id))?;
    render_run(out, &run)?;
    let detail = service.company_detail(run.company_id)?;
    writeln!(
        out,
        "Overall AI score: {} ({})",
        format_score(detail.overall_score),
        detail.overall_band.label()
    )?;
    Ok(())
}

pub(crate) fn export_report<R, C>(
    service: &AssessmentService<R, C>,
    args: &ReportArgs,
) -> Result<PathBuf, AppError>
where
    R: AssessmentRepository + 'static,
    C: CompletionService + 'static,
{
    let report = service.report(CompanyId(args.company_id))?;
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| Path::new(".").join(report.file_name()));
    std::fs::write(&path, report.render_html())?;
    Ok(path)
}

fn render_run<W: Write>(out: &mut W, run: &ScoringRun) -> std::io::Result<()> {
    writeln!(
        out,
        "Scored {} of {} sections",
        run.scored_sections(),
        run.outcomes.len()
    )?;
    for outcome in &run.outcomes {
        let score = outcome
            .score
            .map(|score| format!(" score {score}/10"))
            .unwrap_or_default();
        let plan = if outcome.plan_generated {
            " | plan updated"
        } else {
            ""
        };
        writeln!(
            out,
            "  - {}: {}{}{}",
            outcome.section,
            outcome.state.label(),
            score,
            plan
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use readiness_ai::workflows::assessment::prompts::SCORING_SYSTEM_INSTRUCTION;
    use readiness_ai::workflows::assessment::{
        CompletionError, CompletionRequest, InMemoryAssessmentRepository, ScoringConfig,
    };
    use std::sync::Arc;

    struct Fixed;

    impl CompletionService for Fixed {
        fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
            if request.system == SCORING_SYSTEM_INSTRUCTION {
                Ok(r#"{"score": 6, "justification": "steady"}"#.to_string())
            } else {
                Ok("### Current State\n- Pilot one workflow".to_string())
            }
        }
    }

    const UPLOAD: &str = "Section,Question,Answer
Section 1: Company Profile & Strategic Alignment,Company Name,Lakeside Labs
Section 1: Company Profile & Strategic Alignment,Company Type: GovCon Healthcare Finance or Industrial,Healthcare
Section 3: AI Adoption & Compliance in Healthcare Settings,Are your AI tools integrated with any EHRs?,Epic integration
";

    fn service() -> AssessmentService<InMemoryAssessmentRepository, Fixed> {
        AssessmentService::new(
            Arc::new(InMemoryAssessmentRepository::new()),
            Arc::new(Fixed),
            ScoringConfig::default(),
        )
    }

    fn write_upload(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("lakeside.csv");
        std::fs::write(&path, UPLOAD).expect("write upload");
        path
    }

    #[test]
    fn import_prints_summary_and_scoring() {
        let dir = tempfile::tempdir().expect("temp dir");
        let service = service();
        let args = ImportArgs {
            path: write_upload(&dir),
            confirm: false,
            skip_scoring: false,
        };

        let mut out = Vec::new();
        import_questionnaire(&service, &args, &mut out).expect("import");
        let text = String::from_utf8(out).expect("utf8");

        assert!(text.contains("Imported Lakeside Labs (id 1): 1 assessments, 0 plans"));
        assert!(text.contains("Scored 1 of 5 sections"));
        assert!(text.contains(
            "Section 3: AI Adoption & Compliance in Healthcare Settings: persisted score 6/10 | plan updated"
        ));

        let mut out = Vec::new();
        import_questionnaire(&service, &args, &mut out).expect("guarded");
        assert!(String::from_utf8(out)
            .expect("utf8")
            .contains("already exists"));
    }

    #[test]
    fn score_prints_overall_score() {
        let dir = tempfile::tempdir().expect("temp dir");
        let service = service();
        let args = ImportArgs {
            path: write_upload(&dir),
            confirm: false,
            skip_scoring: true,
        };
        import_questionnaire(&service, &args, &mut Vec::new()).expect("import");

        let mut out = Vec::new();
        score_company(&service, &ScoreArgs { company_id: 1 }, &mut out).expect("score");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("Overall AI score: 6.0/10 (yellow)"));
    }

    #[test]
    fn report_is_written_to_the_requested_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let service = service();
        let args = ImportArgs {
            path: write_upload(&dir),
            confirm: false,
            skip_scoring: false,
        };
        import_questionnaire(&service, &args, &mut Vec::new()).expect("import");

        let output = dir.path().join("lakeside.html");
        let written = export_report(
            &service,
            &ReportArgs {
                company_id: 1,
                output: Some(output.clone()),
            },
        )
        .expect("report");

        assert_eq!(written, output);
        let html = std::fs::read_to_string(output).expect("read report");
        assert!(html.contains("AI Assessment Report: Lakeside Labs"));
        assert!(html.contains("Pilot one workflow"));
    }

    #[test]
    fn unknown_company_is_an_error() {
        let service = service();
        let err = score_company(&service, &ScoreArgs { company_id: 99 }, &mut Vec::new())
            .expect_err("missing company");
        assert!(err.to_string().contains("company 99 not found"));
    }

    #[test]
    fn template_can_be_written_to_a_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("template.csv");
        run_template(TemplateArgs {
            output: Some(path.clone()),
        })
        .expect("template");
        let text = std::fs::read_to_string(path).expect("read template");
        assert!(text.starts_with("Section,Question,Answer"));
    }
}
