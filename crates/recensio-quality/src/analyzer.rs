//! Paragraph and chapter quality analysis.
//!
//! Scoring is deliberately blunt: ten points off per finding, a penalty
//! proportional to how far the script ratio falls below 0.8, and tiered
//! chapter deductions when too many paragraphs are flagged. The report is
//! informational only; nothing here feeds back into the pipeline and
//! nothing blocks output generation. Contamination is a reported defect,
//! not a thrown error.

use serde::{Deserialize, Serialize};

use recensio_core::profile::CompiledProfile;
use recensio_core::script::script_ratio;
use recensio_core::Chapter;

use crate::types::{ChapterQuality, Grade, Issue, IssueKind, ParagraphQuality};

/// Tunable analysis thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Ratio below which a paragraph is flagged for script contamination.
    pub low_ratio: f64,
    /// Ratio below which penalties start accruing.
    pub target_ratio: f64,
    /// Paragraphs shorter than this are flagged as suspiciously short.
    pub short_paragraph_len: usize,
    /// Points deducted per finding.
    pub issue_penalty: f64,
    /// Scale of the per-paragraph ratio penalty.
    pub ratio_penalty_scale: f64,
    /// Scale of the per-chapter ratio penalty.
    pub chapter_ratio_penalty_scale: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            low_ratio: 0.5,
            target_ratio: 0.8,
            short_paragraph_len: 50,
            issue_penalty: 10.0,
            ratio_penalty_scale: 50.0,
            chapter_ratio_penalty_scale: 30.0,
        }
    }
}

/// Characters that close a complete sentence in the supported editions.
fn ends_terminally(text: &str) -> bool {
    matches!(
        text.trim_end().chars().last(),
        Some('.' | ';' | '·' | '!' | '?' | '»' | '"' | '\'' | ')')
    )
}

/// Analyze one paragraph.
#[must_use]
pub fn analyze_paragraph(
    index: usize,
    text: &str,
    profile: &CompiledProfile,
    config: &QualityConfig,
) -> ParagraphQuality {
    let mut issues: Vec<Issue> = Vec::new();
    let trimmed = text.trim();
    let length = trimmed.chars().count();
    let ratio = script_ratio(trimmed, profile.target_script());

    // (a) Apparatus residue: sigla runs or editorial vocabulary that the
    // cleaner should have removed.
    let sigla = profile.sigla_hits(trimmed);
    if sigla >= 2 {
        issues.push(Issue {
            kind: IssueKind::ApparatusResidue,
            detail: format!("{sigla} isolated siglum tokens"),
        });
    }
    if profile.has_editorial_vocab(trimmed) {
        issues.push(Issue {
            kind: IssueKind::ApparatusResidue,
            detail: "editorial vocabulary present".to_string(),
        });
    }

    // (b) Low target-script ratio.
    if ratio < config.low_ratio && length > 30 {
        issues.push(Issue {
            kind: IssueKind::LowScriptRatio,
            detail: format!(
                "low {} ratio: {:.1}%",
                profile.target_script(),
                ratio * 100.0
            ),
        });
    }

    // (c) Suspicious shortness.
    if length < config.short_paragraph_len {
        issues.push(Issue {
            kind: IssueKind::TooShort,
            detail: format!("{length} characters"),
        });
    }

    // (d) Fragment-like start/end.
    let starts_broken = trimmed
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() && profile.target_script() != recensio_core::Script::Latin);
    if starts_broken {
        issues.push(Issue {
            kind: IssueKind::Fragment,
            detail: "starts with lowercase Latin".to_string(),
        });
    }
    if !trimmed.is_empty() && !ends_terminally(trimmed) {
        issues.push(Issue {
            kind: IssueKind::Fragment,
            detail: "no terminal punctuation".to_string(),
        });
    }

    let mut score = 100.0;
    score -= issues.len() as f64 * config.issue_penalty;
    score -= ((config.target_ratio - ratio) * config.ratio_penalty_scale).max(0.0);
    score = score.clamp(0.0, 100.0);

    ParagraphQuality {
        index,
        length,
        script_ratio: ratio,
        issues,
        score,
    }
}

/// Analyze one chapter.
#[must_use]
pub fn analyze_chapter(
    chapter: &Chapter,
    profile: &CompiledProfile,
    config: &QualityConfig,
) -> ChapterQuality {
    let analyses: Vec<ParagraphQuality> = chapter
        .paragraphs
        .iter()
        .map(|p| analyze_paragraph(p.index, &p.text, profile, config))
        .collect();

    let count = analyses.len().max(1) as f64;
    let total_characters = analyses.iter().map(|a| a.length).sum();
    let average_ratio = analyses.iter().map(|a| a.script_ratio).sum::<f64>() / count;
    let average_score = analyses.iter().map(|a| a.score).sum::<f64>() / count;

    let problem_paragraphs: Vec<ParagraphQuality> = analyses
        .iter()
        .filter(|a| a.is_problematic())
        .cloned()
        .collect();

    // Tiered deduction when too large a share of the chapter is flagged.
    let problem_ratio = problem_paragraphs.len() as f64 / count;
    let mut score = average_score;
    if problem_ratio > 0.25 {
        score -= 15.0;
    } else if problem_ratio > 0.15 {
        score -= 10.0;
    } else if problem_ratio > 0.05 {
        score -= 5.0;
    }

    if average_ratio < config.target_ratio {
        score -= (config.target_ratio - average_ratio) * config.chapter_ratio_penalty_scale;
    }
    score = score.clamp(0.0, 100.0);

    ChapterQuality {
        chapter_number: chapter.chapter_number,
        total_paragraphs: chapter.paragraphs.len(),
        total_characters,
        average_script_ratio: average_ratio,
        problem_paragraphs,
        score,
        grade: Grade::from_score(score),
    }
}

/// Analyze every chapter of a document.
#[must_use]
pub fn analyze_document(
    chapters: &[Chapter],
    profile: &CompiledProfile,
    config: &QualityConfig,
) -> Vec<ChapterQuality> {
    chapters
        .iter()
        .map(|c| analyze_chapter(c, profile, config))
        .collect()
}
