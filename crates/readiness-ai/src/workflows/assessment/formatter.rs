use serde::Serialize;

use super::domain::Assessment;

/// One answered, non-plan question handed to the scoring prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionResponse {
    pub question: String,
    pub answer: String,
}

/// Answered rows in input order; plan markers and blank answers are dropped.
pub fn gather_responses<'a, I>(assessments: I) -> Vec<SectionResponse>
where
    I: IntoIterator<Item = &'a Assessment>,
{
    assessments
        .into_iter()
        .filter_map(Assessment::response)
        .map(|(question, answer)| SectionResponse {
            question: question.to_string(),
            answer: answer.to_string(),
        })
        .collect()
}

/// Renders the `{{responses}}` block. Callers pass an already filtered set.
pub fn format_responses(responses: &[SectionResponse]) -> String {
    responses
        .iter()
        .map(|response| format!("Q: {}\nA: {}", response.question, response.answer))
        .collect::<Vec<_>>()
        .join("\n")
}
