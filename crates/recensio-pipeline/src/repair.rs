//! Line repair: hyphenation rejoining, inline-marker stripping, and
//! whitespace normalization.
//!
//! All transforms here are pure and total, applied only to lines that
//! survived classification as main text, and idempotent under repeated
//! application. Hyphen joins skip intervening blank/margin lines but never
//! cross an apparatus or header block: the hyphenated word may span a
//! removed footnote, and joining across it would weld two unrelated
//! fragments together.

use recensio_core::profile::CompiledProfile;
use recensio_core::{Category, ClassifiedLine};

/// Counters from one repair pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairCounts {
    /// Hyphenated line pairs rejoined.
    pub hyphens_rejoined: usize,
    /// Lines changed by the inline-marker rule table.
    pub markers_stripped: usize,
}

/// Run the full repair stage over a resolved line stream.
///
/// Returns a new stream: the profile's rule table applied to each
/// main-text line, hyphenated pairs joined, whitespace normalized, and
/// consecutive blanks collapsed. Line numbers keep their original values
/// (the stream stays monotone, just sparser).
///
/// Marker stripping runs before hyphen joining: trailing junk (margin
/// numbers, garbled footnote calls) often hides a line's final hyphen.
/// After joining, the rule table runs once more over the joined lines so
/// matches spanning the join seam are caught; on already-clean lines that
/// second application is a no-op, which keeps the whole stage idempotent.
#[must_use]
pub fn repair_lines(
    lines: &[ClassifiedLine],
    profile: &CompiledProfile,
) -> (Vec<ClassifiedLine>, RepairCounts) {
    let mut counts = RepairCounts::default();

    let stripped = strip_stream(lines, profile, &mut counts);
    let joined = fix_hyphenation(&stripped, &mut counts.hyphens_rejoined);

    let mut cleaned: Vec<ClassifiedLine> = Vec::with_capacity(joined.len());
    for mut line in joined {
        if line.category == Category::MainText {
            line.text = normalize_spacing(&remove_inline_markers(&line.text, profile));
        }
        cleaned.push(line);
    }

    (collapse_blank_lines(&cleaned), counts)
}

/// Apply the rule table and whitespace normalization to every main-text
/// line. Lines reduced to nothing were pure furniture the classifier
/// missed and degrade to noise.
fn strip_stream(
    lines: &[ClassifiedLine],
    profile: &CompiledProfile,
    counts: &mut RepairCounts,
) -> Vec<ClassifiedLine> {
    let mut out: Vec<ClassifiedLine> = Vec::with_capacity(lines.len());
    for line in lines {
        let mut line = line.clone();
        if line.category == Category::MainText {
            let normalized = normalize_spacing(&remove_inline_markers(&line.text, profile));
            if normalized != line.text.trim() {
                counts.markers_stripped += 1;
            }
            if normalized.is_empty() {
                line.category = Category::Noise;
            }
            line.text = normalized;
        }
        out.push(line);
    }
    out
}

/// Rejoin words hyphenated across line breaks.
///
/// A main-text line ending `letter + hyphen` is joined with the next
/// main-text line when that line begins with a lowercase letter. Blank and
/// margin/page-number lines between the two are skipped; an apparatus or
/// header line blocks the join. Joining continues while the joined text
/// still ends hyphenated, so a chain of hyphenated lines resolves in one
/// pass.
#[must_use]
pub fn fix_hyphenation(lines: &[ClassifiedLine], rejoined: &mut usize) -> Vec<ClassifiedLine> {
    let mut out: Vec<ClassifiedLine> = Vec::with_capacity(lines.len());
    let mut consumed = vec![false; lines.len()];

    for i in 0..lines.len() {
        if consumed[i] {
            continue;
        }
        let line = &lines[i];
        if line.category != Category::MainText || !ends_hyphenated(&line.text) {
            out.push(line.clone());
            continue;
        }

        let mut text = line.text.trim_end().to_string();
        let mut from = i;
        while ends_hyphenated(&text) {
            let Some(j) = continuation_index(lines, from) else {
                break;
            };
            text.pop();
            text.push_str(lines[j].text.trim());
            consumed[j] = true;
            *rejoined += 1;
            from = j;
        }

        out.push(ClassifiedLine {
            line_number: line.line_number,
            text,
            category: Category::MainText,
        });
    }

    out
}

/// Does the line end with `letter + hyphen` (modulo trailing whitespace)?
fn ends_hyphenated(text: &str) -> bool {
    let trimmed = text.trim_end();
    let mut chars = trimmed.chars().rev();
    chars.next() == Some('-') && chars.next().is_some_and(char::is_alphabetic)
}

/// Find the next main-text line eligible for a hyphen join, skipping
/// blank/margin/page-number lines. Any other category blocks the join.
fn continuation_index(lines: &[ClassifiedLine], from: usize) -> Option<usize> {
    for (j, next) in lines.iter().enumerate().skip(from + 1) {
        match next.category {
            Category::Blank | Category::MarginNumber | Category::PageNumber => continue,
            Category::MainText => {
                let starts_lower = next
                    .text
                    .trim_start()
                    .chars()
                    .next()
                    .is_some_and(char::is_lowercase);
                return starts_lower.then_some(j);
            }
            // Apparatus, header, noise: a block boundary.
            _ => return None,
        }
    }
    None
}

/// Strip inline page/folio/margin markers and OCR-garbled sigla using the
/// profile's ordered rule table.
#[must_use]
pub fn remove_inline_markers(text: &str, profile: &CompiledProfile) -> String {
    profile.rules().apply(text)
}

/// Collapse internal whitespace runs and trim the ends.
#[must_use]
pub fn normalize_spacing(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }
    out.trim().to_string()
}

/// Collapse consecutive blank lines to at most one.
#[must_use]
pub fn collapse_blank_lines(lines: &[ClassifiedLine]) -> Vec<ClassifiedLine> {
    let mut out: Vec<ClassifiedLine> = Vec::with_capacity(lines.len());
    let mut prev_blank = false;
    for line in lines {
        let is_blank = line.category == Category::Blank;
        if is_blank && prev_blank {
            continue;
        }
        prev_blank = is_blank;
        out.push(line.clone());
    }
    out
}
