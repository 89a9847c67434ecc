use std::path::Path;

use super::parser::QuestionnaireRow;
use crate::workflows::assessment::CompanyProfile;

pub const COMPANY_NAME: &str = "Company Name";
pub const REVENUE: &str = "Revenue";
pub const EMPLOYEE_COUNT: &str = "Number of Employees";
pub const COMPANY_TYPE_LEGACY: &str = "Company Type: GovCon Healthcare Finance or Industrial";
pub const COMPANY_TYPE: &str =
    "Company Type: Basic, Financial Transaction Services, Healthcare, Technology & Government";
pub const NAICS_CODES: &str = "Primary NAICS Codes (Only GovCon)";

const PROFILE_QUESTIONS: [&str; 6] = [
    COMPANY_NAME,
    REVENUE,
    EMPLOYEE_COUNT,
    COMPANY_TYPE_LEGACY,
    COMPANY_TYPE,
    NAICS_CODES,
];

/// Boilerplate answers that show up in the name cell of generated sample uploads.
const SYNTHETIC_NAME_INDICATORS: [&str; 6] = [
    "Our internal R&D team",
    "We partner with AWS",
    "Minimal progress on model management",
    "We lack structured AI governance",
    "We plan to double our AI staff",
    "We are actively expanding",
];

pub(crate) fn is_profile_question(question: &str) -> bool {
    PROFILE_QUESTIONS.contains(&question)
}

pub(crate) fn is_synthetic_name(name: &str) -> bool {
    SYNTHETIC_NAME_INDICATORS
        .iter()
        .any(|indicator| name.contains(indicator))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExtractedProfile {
    pub(crate) profile: CompanyProfile,
    /// Set when the name came from the file name instead of the `Company Name` row.
    pub(crate) derived_name: bool,
}

/// Pulls the company profile out of the upload. `None` when no usable name exists.
pub(crate) fn extract_profile(
    rows: &[QuestionnaireRow],
    filename: &str,
) -> Option<ExtractedProfile> {
    let answer_for = |question: &str| {
        rows.iter()
            .find(|row| row.question.as_deref() == Some(question))
            .and_then(|row| row.answer.clone())
    };

    let name = answer_for(COMPANY_NAME)?;
    let derived_name = is_synthetic_name(&name);
    let name = if derived_name {
        name_from_filename(filename)
    } else {
        name
    };

    let profile = CompanyProfile {
        name,
        annual_revenue: answer_for(REVENUE),
        employee_count: answer_for(EMPLOYEE_COUNT),
        company_type: answer_for(COMPANY_TYPE_LEGACY).or_else(|| answer_for(COMPANY_TYPE)),
        naics_codes: answer_for(NAICS_CODES),
    };

    Some(ExtractedProfile {
        profile,
        derived_name,
    })
}

/// `company_7_survey.csv` becomes `Company 7`; anything else is title-cased with `_` as spaces.
pub(crate) fn name_from_filename(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    if stem.contains("company_") {
        let token = stem.split('_').nth(1).unwrap_or_default();
        format!("Company {token}")
    } else {
        title_case(&stem.replace('_', " "))
    }
}

fn title_case(value: &str) -> String {
    let mut previous_alphabetic = false;
    value
        .chars()
        .map(|ch| {
            let mapped: String = if ch.is_alphabetic() {
                if previous_alphabetic {
                    ch.to_lowercase().collect()
                } else {
                    ch.to_uppercase().collect()
                }
            } else {
                ch.to_string()
            };
            previous_alphabetic = ch.is_alphabetic();
            mapped
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(question: &str, answer: Option<&str>) -> QuestionnaireRow {
        QuestionnaireRow {
            line: 2,
            section: Some("Section 1: Company Profile & Strategic Alignment".to_string()),
            question: Some(question.to_string()),
            answer: answer.map(str::to_string),
        }
    }

    #[test]
    fn extracts_profile_fields() {
        let rows = vec![
            row(COMPANY_NAME, Some("Acme Analytics")),
            row(REVENUE, Some("$40M")),
            row(EMPLOYEE_COUNT, Some("180")),
            row(COMPANY_TYPE, Some("Healthcare")),
            row(NAICS_CODES, None),
        ];
        let extracted = extract_profile(&rows, "acme.csv").expect("profile");

        assert!(!extracted.derived_name);
        assert_eq!(extracted.profile.name, "Acme Analytics");
        assert_eq!(extracted.profile.annual_revenue.as_deref(), Some("$40M"));
        assert_eq!(extracted.profile.employee_count.as_deref(), Some("180"));
        assert_eq!(extracted.profile.company_type.as_deref(), Some("Healthcare"));
        assert_eq!(extracted.profile.naics_codes, None);
    }

    #[test]
    fn legacy_company_type_wins_when_both_present() {
        let rows = vec![
            row(COMPANY_NAME, Some("Acme")),
            row(COMPANY_TYPE, Some("Basic")),
            row(COMPANY_TYPE_LEGACY, Some("GovCon")),
        ];
        let extracted = extract_profile(&rows, "acme.csv").expect("profile");
        assert_eq!(extracted.profile.company_type.as_deref(), Some("GovCon"));
    }

    #[test]
    fn missing_or_blank_name_yields_nothing() {
        assert!(extract_profile(&[row(REVENUE, Some("$1M"))], "a.csv").is_none());
        assert!(extract_profile(&[row(COMPANY_NAME, None)], "a.csv").is_none());
    }

    #[test]
    fn synthetic_names_are_derived_from_the_file_name() {
        let rows = vec![row(
            COMPANY_NAME,
            Some("We partner with AWS for most of our workloads"),
        )];
        let extracted = extract_profile(&rows, "uploads/company_12_responses.csv").expect("profile");
        assert!(extracted.derived_name);
        assert_eq!(extracted.profile.name, "Company 12");

        let extracted = extract_profile(&rows, "northwind_traders.csv").expect("profile");
        assert_eq!(extracted.profile.name, "Northwind Traders");
    }

    #[test]
    fn title_case_capitalizes_each_word() {
        assert_eq!(title_case("bLUE river ai"), "Blue River Ai");
        assert_eq!(title_case("o'neil labs"), "O'Neil Labs");
    }

    #[test]
    fn profile_questions_are_recognized_exactly() {
        assert!(is_profile_question("Company Name"));
        assert!(is_profile_question(COMPANY_TYPE_LEGACY));
        assert!(!is_profile_question("Company Name?"));
    }
}
