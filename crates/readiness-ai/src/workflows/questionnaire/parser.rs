use serde::{Deserialize, Deserializer};
use std::io::Read;

/// One `Section,Question,Answer` row with blank cells normalized to `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QuestionnaireRow {
    /// 1-based line in the upload, header included.
    pub(crate) line: u64,
    pub(crate) section: Option<String>,
    pub(crate) question: Option<String>,
    pub(crate) answer: Option<String>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<QuestionnaireRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |position| position.line());
        let row: RawRow = record.deserialize(Some(&headers))?;
        rows.push(QuestionnaireRow {
            line,
            section: row.section,
            question: row.question,
            answer: row.answer,
        });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Section", default, deserialize_with = "empty_string_as_none")]
    section: Option<String>,
    #[serde(rename = "Question", default, deserialize_with = "empty_string_as_none")]
    question: Option<String>,
    #[serde(rename = "Answer", default, deserialize_with = "empty_string_as_none")]
    answer: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
