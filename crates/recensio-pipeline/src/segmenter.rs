//! Chapter/book boundary segmentation.
//!
//! Two strategies: detect structural book markers (first occurrence of
//! each new book identifier opens a chapter; later occurrences of the same
//! identifier are verse/page sub-markers), or fall back to a manually
//! curated table of line ranges. The table is low-confidence data:
//! [`validate_boundaries`] cross-checks it against the live document and
//! emits warnings, never corrections.

use serde::{Deserialize, Serialize};

use recensio_core::profile::{BoundaryConfig, CompiledProfile};
use recensio_core::script::script_ratio;
use recensio_core::{Chapter, ClassifiedLine, Paragraph};

use crate::assembler::ParagraphSpan;

/// A detected chapter boundary before paragraph assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Boundary {
    chapter_number: i32,
    title: String,
    start_line: usize,
    end_line: usize,
}

/// A non-fatal problem found while cross-checking boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryWarning {
    /// Chapter the warning concerns.
    pub chapter_number: i32,
    /// Line the declared boundary points at.
    pub line: usize,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "chapter {} (line {}): {}",
            self.chapter_number, self.line, self.message
        )
    }
}

/// Split the assembled paragraph stream into chapters.
///
/// `lines` is the full resolved line stream (markers may sit on lines that
/// classified as headers or noise); `spans` are the assembled paragraphs.
#[must_use]
pub fn segment(
    spans: &[ParagraphSpan],
    lines: &[ClassifiedLine],
    profile: &CompiledProfile,
) -> Vec<Chapter> {
    let end_of_document = lines.last().map_or(0, |l| l.line_number + 1);
    let boundaries = match &profile.profile.boundaries {
        BoundaryConfig::Single { title } => vec![Boundary {
            chapter_number: 1,
            title: title.clone(),
            start_line: 0,
            end_line: end_of_document,
        }],
        BoundaryConfig::Markers {
            identifier_alphabet,
            title_template,
            ..
        } => detect_marker_boundaries(
            lines,
            profile,
            identifier_alphabet,
            title_template,
            end_of_document,
        ),
        BoundaryConfig::Static { chapters, .. } => chapters
            .iter()
            .map(|entry| Boundary {
                chapter_number: entry.chapter_number,
                title: entry.title.clone(),
                start_line: entry.start_line,
                end_line: entry.end_line,
            })
            .collect(),
    };

    let base = profile.thresholds().paragraph_base_index;
    let mut chapters = Vec::with_capacity(boundaries.len());
    for boundary in &boundaries {
        let paragraphs: Vec<Paragraph> = spans
            .iter()
            .filter(|s| s.start_line >= boundary.start_line && s.start_line < boundary.end_line)
            .enumerate()
            .map(|(i, s)| Paragraph {
                index: base + i,
                text: s.text.clone(),
            })
            .collect();

        if paragraphs.is_empty() {
            log::warn!(
                "chapter {} ({}) has no paragraphs; skipped",
                boundary.chapter_number,
                boundary.title
            );
            continue;
        }

        chapters.push(Chapter {
            chapter_number: boundary.chapter_number,
            title: boundary.title.clone(),
            paragraphs,
        });
    }

    chapters
}

/// Scan for book markers and derive boundaries from them.
///
/// Identifiers must advance through the alphabet: a marker whose
/// identifier position is not beyond every position seen so far is a
/// sub-marker (or an OCR garble of an earlier header) and is ignored.
fn detect_marker_boundaries(
    lines: &[ClassifiedLine],
    profile: &CompiledProfile,
    alphabet: &[String],
    title_template: &str,
    end_of_document: usize,
) -> Vec<Boundary> {
    let Some(marker) = profile.boundary_marker() else {
        return Vec::new();
    };

    let mut boundaries: Vec<Boundary> = Vec::new();
    let mut max_seen: Option<usize> = None;

    for line in lines {
        let Some(caps) = marker.captures(&line.text) else {
            continue;
        };
        let id = caps
            .get(1)
            .map(|m| m.as_str().trim())
            .unwrap_or_default();
        let Some(pos) = alphabet.iter().position(|a| id.starts_with(a.as_str())) else {
            log::debug!(
                "marker at line {} has unrecognized identifier {id:?}",
                line.line_number
            );
            continue;
        };

        if max_seen.is_some_and(|seen| pos <= seen) {
            // Same or earlier book letter: a verse/page sub-marker.
            continue;
        }
        max_seen = Some(pos);

        if let Some(prev) = boundaries.last_mut() {
            prev.end_line = line.line_number;
        }
        let number = i32::try_from(pos).unwrap_or(i32::MAX - 1) + 1;
        let title = title_template
            .replace("{id}", &alphabet[pos])
            .replace("{n}", &number.to_string());
        boundaries.push(Boundary {
            chapter_number: number,
            title,
            start_line: line.line_number,
            end_line: end_of_document,
        });
    }

    // Content before the first marker (prefaces, prooemia) becomes a
    // front-matter chapter so nothing is silently lost.
    if let Some(first) = boundaries.first() {
        if first.start_line > 0 {
            let front = Boundary {
                chapter_number: 0,
                title: "Front matter".to_string(),
                start_line: 0,
                end_line: first.start_line,
            };
            boundaries.insert(0, front);
        }
    }

    boundaries
}

/// Cross-check a static boundary table against the live document.
///
/// For each declared start, a ±window around the line must show either a
/// structural marker (when the profile names one) or a plausibly
/// content-bearing line in the target script. Failures are warnings;
/// boundaries are never auto-corrected. Marker-detected and single-chapter
/// strategies have nothing to validate.
#[must_use]
pub fn validate_boundaries(
    lines: &[ClassifiedLine],
    profile: &CompiledProfile,
) -> Vec<BoundaryWarning> {
    let BoundaryConfig::Static {
        chapters,
        validation_window,
        ..
    } = &profile.profile.boundaries
    else {
        return Vec::new();
    };

    let mut warnings = Vec::new();

    for entry in chapters {
        let window_start = entry.start_line.saturating_sub(*validation_window);
        let window_end = (entry.start_line + validation_window + 1).min(lines.len());
        let window = lines
            .get(window_start..window_end)
            .unwrap_or_default();

        let marker_found = profile
            .boundary_marker()
            .map(|re| window.iter().any(|l| re.is_match(&l.text)))
            .unwrap_or(false);
        let content_found = window.iter().any(|l| {
            l.text.chars().count() > 50
                && script_ratio(&l.text, profile.target_script()) > 0.4
        });

        if !marker_found && !content_found {
            warnings.push(BoundaryWarning {
                chapter_number: entry.chapter_number,
                line: entry.start_line,
                message: format!(
                    "no structural marker or {} content within ±{} lines of declared start",
                    profile.target_script(),
                    validation_window
                ),
            });
        }

        if entry.end_line - entry.start_line < 10 {
            warnings.push(BoundaryWarning {
                chapter_number: entry.chapter_number,
                line: entry.start_line,
                message: format!(
                    "very short section ({} lines)",
                    entry.end_line - entry.start_line
                ),
            });
        }
    }

    warnings
}
