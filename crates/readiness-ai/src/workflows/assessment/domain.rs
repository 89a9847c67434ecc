use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::sections::CompanyCategory;

/// Question text marking a row as a stored get-well plan rather than a scored question.
pub const PLAN_MARKER: &str = "Get-Well Plan";

/// Returns true when the question is a plan slot, which never takes part in scoring.
pub fn is_plan_marker(question: &str) -> bool {
    question.contains(PLAN_MARKER)
}

macro_rules! record_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(CompanyId);
record_id!(AssessmentId);
record_id!(PlanId);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub annual_revenue: Option<String>,
    pub employee_count: Option<String>,
    /// Free-text category label as uploaded (e.g. `Healthcare`, `T&G`).
    pub company_type: Option<String>,
    pub naics_codes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    pub fn category(&self) -> CompanyCategory {
        CompanyCategory::from_label(self.company_type.as_deref())
    }
}

/// Profile values extracted from an upload. `None` fields leave stored values untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyProfile {
    pub name: String,
    pub annual_revenue: Option<String>,
    pub employee_count: Option<String>,
    pub company_type: Option<String>,
    pub naics_codes: Option<String>,
}

impl CompanyProfile {
    pub fn apply_to(&self, company: &mut Company) {
        let fields = [
            (&self.annual_revenue, &mut company.annual_revenue),
            (&self.employee_count, &mut company.employee_count),
            (&self.company_type, &mut company.company_type),
            (&self.naics_codes, &mut company.naics_codes),
        ];
        for (incoming, stored) in fields {
            if let Some(value) = incoming {
                *stored = Some(value.clone());
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: AssessmentId,
    pub company_id: CompanyId,
    pub section: String,
    pub question: String,
    pub answer: Option<String>,
    pub score: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assessment {
    pub fn is_plan_marker(&self) -> bool {
        is_plan_marker(&self.question)
    }

    /// The (question, answer) pair when this row is usable as scoring input.
    pub fn response(&self) -> Option<(&str, &str)> {
        if self.is_plan_marker() {
            return None;
        }
        self.answer
            .as_deref()
            .filter(|answer| !answer.trim().is_empty())
            .map(|answer| (self.question.as_str(), answer))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub company_id: CompanyId,
    pub section: String,
    pub plan_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Assessment row awaiting insertion by an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssessment {
    pub section: String,
    pub question: String,
    pub answer: Option<String>,
}

/// Plan row awaiting insertion by an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlan {
    pub section: String,
    pub plan_text: String,
}
