//! Company assessment report: overall score, section table, answered questions, and plans.

mod html;
mod markup;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::workflows::assessment::{
    display_sections, overall_score, section_score, Assessment, Company, Plan,
};

pub use markup::{translate_plan, PlanBlock};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportQuestion {
    pub question: String,
    pub answer: Option<String>,
    pub score: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSection {
    pub section: String,
    pub score: Option<f64>,
    pub questions: Vec<ReportQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportPlan {
    pub section: String,
    pub blocks: Vec<PlanBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentReport {
    pub company_name: String,
    pub generated_at: NaiveDateTime,
    pub overall_score: Option<f64>,
    /// Resolved sections followed by Future Readiness.
    pub sections: Vec<ReportSection>,
    pub plans: Vec<ReportPlan>,
}

/// `7.3/10`, or `N/A` when nothing is scored.
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(value) => format!("{value:.1}/10"),
        None => "N/A".to_string(),
    }
}

impl AssessmentReport {
    pub fn build(
        company: &Company,
        assessments: &[Assessment],
        plans: &[Plan],
        generated_at: NaiveDateTime,
    ) -> Self {
        let sections = display_sections(company.company_type.as_deref())
            .into_iter()
            .map(|section| {
                let label = section.label();
                ReportSection {
                    section: label.to_string(),
                    score: section_score(assessments, label),
                    questions: assessments
                        .iter()
                        .filter(|assessment| {
                            assessment.section == label && !assessment.is_plan_marker()
                        })
                        .map(|assessment| ReportQuestion {
                            question: assessment.question.clone(),
                            answer: assessment.answer.clone(),
                            score: assessment.score,
                        })
                        .collect(),
                }
            })
            .collect();

        let plans = plans
            .iter()
            .map(|plan| ReportPlan {
                section: plan.section.clone(),
                blocks: translate_plan(&plan.plan_text),
            })
            .collect();

        Self {
            company_name: company.name.clone(),
            generated_at,
            overall_score: overall_score(company.company_type.as_deref(), assessments),
            sections,
            plans,
        }
    }

    pub fn file_name(&self) -> String {
        format!(
            "report_{}_{}.html",
            self.company_name.replace(' ', "_"),
            self.generated_at.format("%Y%m%d_%H%M%S")
        )
    }

    pub fn render_html(&self) -> String {
        html::render(self)
    }
}
