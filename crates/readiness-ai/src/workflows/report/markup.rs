use serde::Serialize;

/// Display block produced from one line of a generated plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum PlanBlock {
    Heading3(String),
    Heading4(String),
    BoldParagraph(String),
    BoldBullet(String),
    Bullet(String),
    Break,
    Spacer,
    Paragraph(String),
}

/// Line-by-line translation of the markdown subset the plan prompts ask for.
pub fn translate_plan(text: &str) -> Vec<PlanBlock> {
    text.lines().map(translate_line).collect()
}

fn translate_line(line: &str) -> PlanBlock {
    let line = line.trim();
    if line.is_empty() {
        return PlanBlock::Spacer;
    }

    if let Some(heading) = line.strip_prefix("### ") {
        return PlanBlock::Heading3(heading.trim().to_string());
    }
    if let Some(heading) = line.strip_prefix("#### ") {
        return PlanBlock::Heading4(heading.trim().to_string());
    }
    if line.starts_with("**") && line.ends_with("**") {
        // The markers may overlap on short lines such as `**` or `***`.
        let bold = line.get(2..line.len().saturating_sub(2)).unwrap_or_default();
        return PlanBlock::BoldParagraph(bold.trim().to_string());
    }
    if let Some(item) = line.strip_prefix("- **") {
        return match item.strip_suffix("**") {
            Some(bold) => PlanBlock::BoldBullet(bold.trim().to_string()),
            None => PlanBlock::Bullet(format!("**{}", item.trim())),
        };
    }
    if let Some(item) = line.strip_prefix("- ") {
        return PlanBlock::Bullet(item.trim().to_string());
    }
    if line.starts_with("---") {
        return PlanBlock::Break;
    }
    PlanBlock::Paragraph(line.to_string())
}
