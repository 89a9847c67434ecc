use std::fmt::Write;

use super::markup::PlanBlock;
use super::{format_score, AssessmentReport};

const STYLE: &str = "body{font-family:Helvetica,Arial,sans-serif;margin:2.5rem;color:#222}\
h1{font-size:1.8rem;margin-bottom:1.5rem}\
.overall{font-size:1.2rem;margin-bottom:1.5rem}\
table{border-collapse:collapse;margin-bottom:1.5rem}\
th{background:#808080;color:#f5f5f5;text-align:left;padding:.5rem .75rem}\
td{background:#f5f5dc;border:1px solid #000;padding:.4rem .75rem}\
.qa{margin-bottom:.6rem}\
.spacer{height:.4rem}";

pub(super) fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Escapes the text, then turns balanced `**bold**` runs into `<strong>`.
fn inline(value: &str) -> String {
    let escaped = escape_html(value);
    let parts: Vec<&str> = escaped.split("**").collect();
    if parts.len() < 3 || parts.len() % 2 == 0 {
        return escaped;
    }
    parts
        .iter()
        .enumerate()
        .map(|(index, part)| {
            if index % 2 == 1 {
                format!("<strong>{part}</strong>")
            } else {
                (*part).to_string()
            }
        })
        .collect()
}

fn render_block(out: &mut String, block: &PlanBlock) -> std::fmt::Result {
    match block {
        PlanBlock::Heading3(text) => writeln!(out, "<h3>{}</h3>", inline(text)),
        PlanBlock::Heading4(text) => writeln!(out, "<h4>{}</h4>", inline(text)),
        PlanBlock::BoldParagraph(text) => {
            writeln!(out, "<p><strong>{}</strong></p>", escape_html(text))
        }
        PlanBlock::BoldBullet(text) => {
            writeln!(out, "<p>&bull; <strong>{}</strong></p>", escape_html(text))
        }
        PlanBlock::Bullet(text) => writeln!(out, "<p>&bull; {}</p>", inline(text)),
        PlanBlock::Break => writeln!(out, "<hr>"),
        PlanBlock::Spacer => writeln!(out, "<div class=\"spacer\"></div>"),
        PlanBlock::Paragraph(text) => writeln!(out, "<p>{}</p>", inline(text)),
    }
}

fn write_document(out: &mut String, report: &AssessmentReport) -> std::fmt::Result {
    let title = format!("AI Assessment Report: {}", escape_html(&report.company_name));

    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "<meta charset=\"utf-8\">")?;
    writeln!(out, "<title>{title}</title>")?;
    writeln!(out, "<style>{STYLE}</style>")?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "<h1>{title}</h1>")?;
    writeln!(
        out,
        "<p class=\"overall\">Overall AI Score: {}</p>",
        format_score(report.overall_score)
    )?;
    writeln!(
        out,
        "<p class=\"generated\">Generated {}</p>",
        report.generated_at.format("%Y-%m-%d %H:%M:%S")
    )?;

    writeln!(out, "<table>")?;
    writeln!(out, "<tr><th>Section</th><th>Score</th></tr>")?;
    for section in &report.sections {
        writeln!(
            out,
            "<tr><td>{}</td><td>{}</td></tr>",
            escape_html(&section.section),
            format_score(section.score)
        )?;
    }
    writeln!(out, "</table>")?;

    for section in &report.sections {
        writeln!(out, "<h2>{}</h2>", escape_html(&section.section))?;
        for question in &section.questions {
            writeln!(out, "<div class=\"qa\">")?;
            writeln!(
                out,
                "<p><strong>Q: {}</strong></p>",
                escape_html(&question.question)
            )?;
            writeln!(
                out,
                "<p>A: {}</p>",
                escape_html(question.answer.as_deref().unwrap_or(""))
            )?;
            if let Some(score) = question.score {
                writeln!(out, "<p>Score: {score}/10</p>")?;
            }
            writeln!(out, "</div>")?;
        }
    }

    if !report.plans.is_empty() {
        writeln!(out, "<h2>Get-Well Plans</h2>")?;
        for plan in &report.plans {
            writeln!(out, "<section class=\"plan\">")?;
            writeln!(
                out,
                "<p><strong>{}</strong></p>",
                escape_html(&plan.section)
            )?;
            for block in &plan.blocks {
                render_block(out, block)?;
            }
            writeln!(out, "</section>")?;
        }
    }

    writeln!(out, "</body>")?;
    writeln!(out, "</html>")
}

pub(super) fn render(report: &AssessmentReport) -> String {
    let mut out = String::new();
    write_document(&mut out, report).expect("formatting into a String never fails");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::report::{ReportPlan, ReportQuestion, ReportSection};
    use chrono::NaiveDate;

    fn report() -> AssessmentReport {
        AssessmentReport {
            company_name: "R&D <Labs>".to_string(),
            generated_at: NaiveDate::from_ymd_opt(2025, 1, 2)
                .and_then(|date| date.and_hms_opt(3, 4, 5))
                .expect("timestamp"),
            overall_score: Some(5.5),
            sections: vec![ReportSection {
                section: "Section 1: Company Profile & Strategic Alignment".to_string(),
                score: None,
                questions: vec![ReportQuestion {
                    question: "Mission?".to_string(),
                    answer: Some("<script>alert(1)</script>".to_string()),
                    score: Some(4),
                }],
            }],
            plans: vec![ReportPlan {
                section: "Section 1: Company Profile & Strategic Alignment".to_string(),
                blocks: vec![
                    PlanBlock::Heading3("Now".to_string()),
                    PlanBlock::Bullet("**30 days:** pick an owner".to_string()),
                    PlanBlock::Break,
                ],
            }],
        }
    }

    #[test]
    fn escapes_user_content() {
        let html = report().render_html();
        assert!(html.contains("AI Assessment Report: R&amp;D &lt;Labs&gt;"));
        assert!(html.contains("A: &lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn renders_scores_table_and_plans() {
        let html = report().render_html();
        assert!(html.contains("Overall AI Score: 5.5/10"));
        assert!(html.contains("<td>N/A</td>"));
        assert!(html.contains("<p>Score: 4/10</p>"));
        assert!(html.contains("<h2>Get-Well Plans</h2>"));
        assert!(html.contains("<h3>Now</h3>"));
        assert!(html.contains("<p>&bull; <strong>30 days:</strong> pick an owner</p>"));
        assert!(html.contains("<hr>"));
    }

    #[test]
    fn unbalanced_bold_markers_stay_literal() {
        assert_eq!(inline("a ** b"), "a ** b");
        assert_eq!(inline("**x** and **y**"), "<strong>x</strong> and <strong>y</strong>");
    }

    #[test]
    fn document_is_written_through_to_the_closing_tag() {
        let html = render(&report());
        assert!(html.starts_with("<!DOCTYPE html>\n"));
        assert!(html.ends_with("</body>\n</html>\n"));
    }
}
