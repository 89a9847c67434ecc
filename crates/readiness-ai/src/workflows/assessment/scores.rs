use serde::Serialize;

use super::domain::Assessment;
use super::sections::resolve_sections;

/// Mean of the scored, non-plan assessments of one section. Recomputed on every call.
pub fn section_score(assessments: &[Assessment], section: &str) -> Option<f64> {
    let scores: Vec<i64> = assessments
        .iter()
        .filter(|assessment| assessment.section == section && !assessment.is_plan_marker())
        .filter_map(|assessment| assessment.score)
        .collect();

    if scores.is_empty() {
        return None;
    }
    Some(scores.iter().sum::<i64>() as f64 / scores.len() as f64)
}

/// Equal-weight mean of the resolved sections' scores. Unscored sections are left out,
/// and Future Readiness never counts because the resolver never returns it.
pub fn overall_score(company_type: Option<&str>, assessments: &[Assessment]) -> Option<f64> {
    let section_scores: Vec<f64> = resolve_sections(company_type)
        .into_iter()
        .filter_map(|section| section_score(assessments, section.label()))
        .collect();

    if section_scores.is_empty() {
        return None;
    }
    Some(section_scores.iter().sum::<f64>() / section_scores.len() as f64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Gray,
    Red,
    Yellow,
    Green,
}

impl ScoreBand {
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            None => ScoreBand::Gray,
            Some(value) if value <= 3.0 => ScoreBand::Red,
            Some(value) if value <= 6.0 => ScoreBand::Yellow,
            Some(_) => ScoreBand::Green,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Gray => "gray",
            ScoreBand::Red => "red",
            ScoreBand::Yellow => "yellow",
            ScoreBand::Green => "green",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::assessment::domain::{AssessmentId, CompanyId};
    use crate::workflows::assessment::sections::Section;
    use chrono::Utc;

    fn scored(id: i64, section: Section, question: &str, score: Option<i64>) -> Assessment {
        let now = Utc::now();
        Assessment {
            id: AssessmentId(id),
            company_id: CompanyId(1),
            section: section.label().to_string(),
            question: question.to_string(),
            answer: Some("answer".to_string()),
            score,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn overall_is_mean_of_section_means() {
        let rows = vec![
            scored(1, Section::CompanyProfile, "q1", Some(8)),
            scored(2, Section::CompanyProfile, "q2", Some(8)),
            scored(3, Section::TechnicalMaturity, "q3", Some(6)),
            scored(4, Section::BusinessOperations, "q4", Some(4)),
            scored(5, Section::Partnerships, "q5", None),
        ];

        let overall = overall_score(Some("Basic"), &rows).expect("scored");
        assert!((overall - 6.0).abs() < f64::EPSILON);

        let mut with_future = rows.clone();
        with_future.push(scored(6, Section::FutureReadiness, "q6", Some(9)));
        let unchanged = overall_score(Some("Basic"), &with_future).expect("scored");
        assert!((unchanged - 6.0).abs() < f64::EPSILON);
        assert_eq!(
            section_score(&with_future, Section::FutureReadiness.label()),
            Some(9.0)
        );
    }

    #[test]
    fn other_category_sections_do_not_count() {
        let rows = vec![
            scored(1, Section::CompanyProfile, "q1", Some(4)),
            scored(2, Section::HealthcareCompliance, "q2", Some(10)),
        ];
        assert_eq!(overall_score(Some("Basic"), &rows), Some(4.0));
        assert_eq!(overall_score(Some("Healthcare"), &rows), Some(7.0));
    }

    #[test]
    fn plan_marker_scores_are_ignored() {
        let rows = vec![
            scored(1, Section::TalentCulture, "Hiring plan?", Some(5)),
            scored(
                2,
                Section::TalentCulture,
                "Get-Well Plan AI Section 5: AI Talent, Culture & Organizational Readiness",
                Some(1),
            ),
        ];
        assert_eq!(section_score(&rows, Section::TalentCulture.label()), Some(5.0));
    }

    #[test]
    fn nothing_scored_means_no_score() {
        assert_eq!(overall_score(None, &[]), None);
        assert_eq!(section_score(&[], Section::CompanyProfile.label()), None);
    }

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(ScoreBand::from_score(None), ScoreBand::Gray);
        assert_eq!(ScoreBand::from_score(Some(3.0)), ScoreBand::Red);
        assert_eq!(ScoreBand::from_score(Some(3.5)), ScoreBand::Yellow);
        assert_eq!(ScoreBand::from_score(Some(6.0)), ScoreBand::Yellow);
        assert_eq!(ScoreBand::from_score(Some(6.2)), ScoreBand::Green);
        assert_eq!(ScoreBand::Green.label(), "green");
    }
}
