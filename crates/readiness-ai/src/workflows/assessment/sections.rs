use serde::{Deserialize, Serialize};

/// Every questionnaire section the service knows how to score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    CompanyProfile,
    TechnicalMaturity,
    GovernmentIntegration,
    HealthcareCompliance,
    FinancialServices,
    BusinessOperations,
    Partnerships,
    TalentCulture,
    FutureReadiness,
}

impl Section {
    /// Questionnaire order, category variants of section 3 grouped together.
    pub const ALL: [Section; 9] = [
        Section::CompanyProfile,
        Section::TechnicalMaturity,
        Section::GovernmentIntegration,
        Section::HealthcareCompliance,
        Section::FinancialServices,
        Section::BusinessOperations,
        Section::Partnerships,
        Section::TalentCulture,
        Section::FutureReadiness,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Section::CompanyProfile => "Section 1: Company Profile & Strategic Alignment",
            Section::TechnicalMaturity => "Section 2: AI Capabilities & Technical Maturity",
            Section::GovernmentIntegration => {
                "Section 3: Government AI Integration & Contract Performance"
            }
            Section::HealthcareCompliance => {
                "Section 3: AI Adoption & Compliance in Healthcare Settings"
            }
            Section::FinancialServices => "Section 3: AI Integration & Financial Services Delivery",
            Section::BusinessOperations => "Section 3: AI Integration & Business Operations",
            Section::Partnerships => "Section 4: Partnerships, Ecosystem & Industry Engagement",
            Section::TalentCulture => "Section 5: AI Talent, Culture & Organizational Readiness",
            Section::FutureReadiness => "Section 6: Future Readiness & Differentiators",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|section| section.label() == label)
    }

    pub fn is_future_readiness(self) -> bool {
        self == Section::FutureReadiness
    }
}

/// Future Readiness is tracked and displayed but never averaged into the overall score.
pub fn is_future_readiness_label(label: &str) -> bool {
    label.contains("Future Readiness")
}

/// Company category driving the section 3 variant and the plan prompt wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyCategory {
    Basic,
    FinancialServices,
    Healthcare,
    TechnologyGovernment,
}

impl CompanyCategory {
    /// Unknown, legacy (`GovCon`, `Industrial`) and missing labels fall back to the
    /// government integration variant.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            Some("Healthcare") => Self::Healthcare,
            Some("Finance" | "FS" | "FTS" | "Financial Transaction Services") => {
                Self::FinancialServices
            }
            Some("Technology & Government" | "T&G") => Self::TechnologyGovernment,
            Some("Basic") => Self::Basic,
            _ => Self::TechnologyGovernment,
        }
    }

    pub fn section(self) -> Section {
        match self {
            Self::Basic => Section::BusinessOperations,
            Self::FinancialServices => Section::FinancialServices,
            Self::Healthcare => Section::HealthcareCompliance,
            Self::TechnologyGovernment => Section::GovernmentIntegration,
        }
    }
}

const CATEGORY_SECTION_POSITION: usize = 2;

/// Ordered sections that count toward a company's overall score.
pub fn resolve_sections(category_label: Option<&str>) -> Vec<Section> {
    let mut sections = vec![
        Section::CompanyProfile,
        Section::TechnicalMaturity,
        Section::Partnerships,
        Section::TalentCulture,
    ];
    sections.insert(
        CATEGORY_SECTION_POSITION,
        CompanyCategory::from_label(category_label).section(),
    );
    sections
}
