//! # Recensio Quality
//!
//! Quality scoring for reconstructed critical-edition text: per-paragraph
//! contamination findings, per-chapter aggregate scores on a fixed A–F
//! ladder, and report rendering (markdown for humans, JSON for triage
//! tooling). Reports are informational and never feed back into the
//! cleaning pipeline.

pub mod analyzer;
pub mod report;
pub mod types;

pub use analyzer::{analyze_chapter, analyze_document, analyze_paragraph, QualityConfig};
pub use report::{render_json, render_markdown};
pub use types::{ChapterQuality, Grade, Issue, IssueKind, ParagraphQuality};
