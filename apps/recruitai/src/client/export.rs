use chrono::{NaiveDate, Utc};

use crate::models::candidate::Candidate;

pub const REPORT_TITLE: &str = "RECRUITAI — CANDIDATE RANKING REPORT";
pub const EXPORT_MIME: &str = "text/plain";

/// A client-generated download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub mime: &'static str,
    pub contents: String,
}

/// Plain-text ranking report, dated today (UTC). `None` when there is nothing to export.
pub fn export_report(results: &[Candidate]) -> Option<ExportFile> {
    export_report_on(results, Utc::now().date_naive())
}

pub fn export_report_on(results: &[Candidate], date: NaiveDate) -> Option<ExportFile> {
    if results.is_empty() {
        return None;
    }
    Some(ExportFile {
        filename: format!("candidate_rankings_{}.txt", date.format("%Y-%m-%d")),
        mime: EXPORT_MIME,
        contents: render_report(results),
    })
}

fn render_report(results: &[Candidate]) -> String {
    let mut lines = vec![REPORT_TITLE.to_string(), "=".repeat(50), String::new()];
    for c in results {
        lines.push(format!("RANK #{}: {}", c.rank, c.name));
        lines.push(format!("Score: {}/100 | {}", c.score, c.recommendation));
        lines.push(format!(
            "Assessment: {}",
            c.assessment.as_deref().unwrap_or_default()
        ));
        if !c.strengths.is_empty() {
            lines.push(format!("Strengths: {}", c.strengths.join(", ")));
        }
        if !c.gaps.is_empty() {
            lines.push(format!("Gaps: {}", c.gaps.join(", ")));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}
