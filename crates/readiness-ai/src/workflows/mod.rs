pub mod assessment;
pub mod questionnaire;
pub mod report;
