//! Quality report rendering: a human-readable markdown table plus the
//! same data as machine-readable JSON for downstream triage tooling.

use recensio_core::Result;

use crate::types::{ChapterQuality, Grade};

/// Render the per-chapter quality data as a markdown report.
#[must_use]
pub fn render_markdown(document_id: &str, chapters: &[ChapterQuality]) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("# Quality Report: {document_id}"));
    lines.push(String::new());
    lines.push(format!(
        "Generated {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M")
    ));
    lines.push(String::new());
    lines.push("## Summary".to_string());
    lines.push(String::new());

    let count = chapters.len().max(1) as f64;
    let total_paragraphs: usize = chapters.iter().map(|c| c.total_paragraphs).sum();
    let total_problems: usize = chapters.iter().map(|c| c.problem_paragraphs.len()).sum();
    let average_score = chapters.iter().map(|c| c.score).sum::<f64>() / count;
    let problem_pct = if total_paragraphs > 0 {
        total_problems as f64 / total_paragraphs as f64 * 100.0
    } else {
        0.0
    };

    lines.push("| Metric | Value |".to_string());
    lines.push("|--------|-------|".to_string());
    lines.push(format!("| Chapters | {} |", chapters.len()));
    lines.push(format!("| Total paragraphs | {total_paragraphs} |"));
    lines.push(format!(
        "| Problematic paragraphs | {total_problems} ({problem_pct:.1}%) |"
    ));
    lines.push(format!("| Average score | {average_score:.1} |"));
    lines.push(format!(
        "| Average grade | {} |",
        Grade::from_score(average_score)
    ));
    lines.push(String::new());

    lines.push("## Chapter Grades".to_string());
    lines.push(String::new());
    lines.push("| Chapter | Paragraphs | Problematic | Script Ratio | Score | Grade |".to_string());
    lines.push("|---------|------------|-------------|--------------|-------|-------|".to_string());
    for chapter in chapters {
        lines.push(format!(
            "| {} | {} | {} | {:.1}% | {:.1} | {} |",
            chapter.chapter_number,
            chapter.total_paragraphs,
            chapter.problem_paragraphs.len(),
            chapter.average_script_ratio * 100.0,
            chapter.score,
            chapter.grade
        ));
    }
    lines.push(String::new());

    let flagged: Vec<&ChapterQuality> = chapters
        .iter()
        .filter(|c| !c.problem_paragraphs.is_empty())
        .collect();
    if !flagged.is_empty() {
        lines.push("## Issue Breakdown".to_string());
        lines.push(String::new());
        for chapter in flagged {
            lines.push(format!("### Chapter {}", chapter.chapter_number));
            lines.push(String::new());
            for paragraph in &chapter.problem_paragraphs {
                lines.push(format!(
                    "- paragraph {} (score {:.0}):",
                    paragraph.index, paragraph.score
                ));
                for issue in &paragraph.issues {
                    lines.push(format!("  - {}: {}", issue.kind, issue.detail));
                }
            }
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

/// Serialize the per-chapter quality data as pretty JSON.
pub fn render_json(chapters: &[ChapterQuality]) -> Result<String> {
    Ok(serde_json::to_string_pretty(chapters)?)
}
