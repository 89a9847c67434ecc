use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{Assessment, AssessmentId, Company, CompanyId, Plan};
use super::orchestrator::ScoringRun;
use super::scores::{overall_score, section_score, ScoreBand};
use super::sections::{is_future_readiness_label, resolve_sections, Section};

/// One row of the company dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardEntry {
    pub company_id: CompanyId,
    pub name: String,
    pub company_type: Option<String>,
    pub overall_score: Option<f64>,
    pub band: ScoreBand,
    pub assessment_count: usize,
}

impl DashboardEntry {
    pub fn build(company: &Company, assessments: &[Assessment]) -> Self {
        let overall = overall_score(company.company_type.as_deref(), assessments);
        Self {
            company_id: company.id,
            name: company.name.clone(),
            company_type: company.company_type.clone(),
            overall_score: overall,
            band: ScoreBand::from_score(overall),
            assessment_count: assessments.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub section: String,
    pub score: Option<f64>,
    pub band: ScoreBand,
    /// False for Future Readiness, which is shown but never averaged.
    pub counts_toward_overall: bool,
    pub assessments: Vec<Assessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyDetailView {
    pub company: Company,
    pub overall_score: Option<f64>,
    pub overall_band: ScoreBand,
    pub sections: Vec<SectionView>,
}

/// Resolved sections followed by Future Readiness.
pub fn display_sections(company_type: Option<&str>) -> Vec<Section> {
    let mut sections = resolve_sections(company_type);
    sections.push(Section::FutureReadiness);
    sections
}

impl CompanyDetailView {
    pub fn build(company: Company, assessments: &[Assessment], plans: &[Plan]) -> Self {
        let overall = overall_score(company.company_type.as_deref(), assessments);
        let sections = display_sections(company.company_type.as_deref())
            .into_iter()
            .map(|section| {
                let label = section.label();
                let score = section_score(assessments, label);
                SectionView {
                    section: label.to_string(),
                    score,
                    band: ScoreBand::from_score(score),
                    counts_toward_overall: !section.is_future_readiness(),
                    assessments: assessments
                        .iter()
                        .filter(|assessment| assessment.section == label)
                        .cloned()
                        .collect(),
                    plan: plans
                        .iter()
                        .find(|plan| plan.section == label)
                        .map(|plan| plan.plan_text.clone()),
                }
            })
            .collect();

        Self {
            company,
            overall_score: overall,
            overall_band: ScoreBand::from_score(overall),
            sections,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanView {
    pub section: String,
    pub plan_text: String,
    pub score: Option<f64>,
    pub band: ScoreBand,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlansView {
    pub company_id: CompanyId,
    pub company_name: String,
    pub overall_score: Option<f64>,
    pub overall_band: ScoreBand,
    pub plans: Vec<PlanView>,
}

impl PlansView {
    pub fn build(company: &Company, assessments: &[Assessment], plans: &[Plan]) -> Self {
        let overall = overall_score(company.company_type.as_deref(), assessments);
        let plans = plans
            .iter()
            .map(|plan| {
                let score = if is_future_readiness_label(&plan.section) {
                    None
                } else {
                    section_score(assessments, &plan.section)
                };
                PlanView {
                    section: plan.section.clone(),
                    plan_text: plan.plan_text.clone(),
                    score,
                    band: ScoreBand::from_score(score),
                    updated_at: plan.updated_at,
                }
            })
            .collect();

        Self {
            company_id: company.id,
            company_name: company.name.clone(),
            overall_score: overall,
            overall_band: ScoreBand::from_score(overall),
            plans,
        }
    }
}

/// Scores returned after an answer edit and its section rescoring.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerUpdateView {
    pub assessment_id: AssessmentId,
    pub section_name: String,
    pub section_score: Option<f64>,
    pub section_band: ScoreBand,
    pub overall_score: Option<f64>,
    pub overall_band: ScoreBand,
    pub run: ScoringRun,
}

impl AnswerUpdateView {
    pub fn build(
        assessment_id: AssessmentId,
        section: String,
        company_type: Option<&str>,
        assessments: &[Assessment],
        run: ScoringRun,
    ) -> Self {
        let section_score = section_score(assessments, &section);
        let overall = overall_score(company_type, assessments);
        Self {
            assessment_id,
            section_name: section,
            section_score,
            section_band: ScoreBand::from_score(section_score),
            overall_score: overall,
            overall_band: ScoreBand::from_score(overall),
            run,
        }
    }
}
