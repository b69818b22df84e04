//! Per-line classification.
//!
//! [`classify`] assigns each raw line one category using the corpus
//! profile's signatures and thresholds. The decision order is fixed and
//! first-match-wins: blank, running header, margin/page number, apparatus
//! opener, script-ratio main text, noise. Everything tunable comes from
//! the profile; this module holds no corpus constants.

use once_cell::sync::Lazy;
use regex::Regex;

use recensio_core::profile::{CompiledProfile, FragmentBias};
use recensio_core::script::script_ratio;
use recensio_core::{Category, ClassifiedLine, RawDocument};

/// Apparatus entry opener: a parenthesized letter citation `(a)` / `(b.)`.
static LETTER_CITATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\([a-z]\.?\)\s").expect("valid pattern"));

/// Scholarly footnote opener: a parenthesized number citation `(1)`.
static NUMBER_CITATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(\d{1,2}\)\s").expect("valid pattern"));

/// A bare arabic number, possibly with OCR tail garbage (`19»`, `51*`).
static BARE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,4})\s*[»>*)]*$").expect("valid pattern"));

/// A bare roman numeral (preface pagination).
static ROMAN_NUMERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ivxlcdmIVXLCDM]{1,6}$").expect("valid pattern"));

/// Classify one raw line.
///
/// Total: every line receives exactly one category, and nothing here can
/// fail. Ambiguity degrades to [`Category::Noise`], which later stages
/// drop silently.
#[must_use]
pub fn classify(line: &str, profile: &CompiledProfile) -> Category {
    let trimmed = line.trim();

    // 1. Blank.
    if trimmed.is_empty() {
        return Category::Blank;
    }

    // 2. Running page/volume header, or a structural book marker (the
    // segmenter reads those off the line stream; they are not text).
    if profile.is_header(trimmed) || profile.is_boundary_marker(trimmed) {
        return Category::PageHeader;
    }

    // 3. Standalone margin or page numbers, exact or OCR-garbled.
    if let Some(category) = classify_number(trimmed, profile) {
        return category;
    }

    // 4. Critical-apparatus opener: a citation mark, or enough isolated
    // siglum tokens (optionally reinforced by editorial vocabulary).
    if LETTER_CITATION.is_match(trimmed) || NUMBER_CITATION.is_match(trimmed) {
        return Category::Apparatus;
    }
    let sigla = profile.sigla_hits(trimmed);
    let thresholds = profile.thresholds();
    if sigla >= thresholds.min_sigla_hits
        || (sigla >= 2 && profile.has_editorial_vocab(trimmed))
    {
        return Category::Apparatus;
    }

    // 5. Main text by target-script ratio, stricter for short lines.
    let ratio = script_ratio(trimmed, profile.target_script());
    let char_len = trimmed.chars().count();
    let required = if char_len < thresholds.short_line_len {
        thresholds.short_line_ratio
    } else {
        thresholds.long_line_ratio
    };
    if ratio > required {
        return Category::MainText;
    }

    // Short fragments that pass the lenient ratio but fail the strict one
    // sit in the ambiguous band; the edition's layout decides. Two-column
    // footnotes produce short apparatus fragments, prose editions produce
    // short sentence tails.
    if char_len < thresholds.short_fragment_len && ratio > thresholds.long_line_ratio {
        return match thresholds.short_fragment_bias {
            FragmentBias::Apparatus => Category::Apparatus,
            FragmentBias::MainText => Category::MainText,
        };
    }

    // 6. Nothing matched.
    Category::Noise
}

/// Recognize standalone margin/page numbers.
fn classify_number(trimmed: &str, profile: &CompiledProfile) -> Option<Category> {
    let margin = &profile.profile.margin;

    if let Some(caps) = BARE_NUMBER.captures(trimmed) {
        if let Ok(n) = caps[1].parse::<u32>() {
            if n <= margin.max_line_number && margin.line_number_step > 0
                && n % margin.line_number_step == 0
            {
                return Some(Category::MarginNumber);
            }
            if n <= margin.max_page_number {
                return Some(Category::PageNumber);
            }
            // Above any plausible page number: OCR junk.
            return Some(Category::Noise);
        }
    }

    if profile.is_garbled_margin_number(trimmed) {
        return Some(Category::MarginNumber);
    }

    if ROMAN_NUMERAL.is_match(trimmed) {
        return Some(Category::PageNumber);
    }

    None
}

/// Classify every line of a document.
#[must_use]
pub fn classify_document(doc: &RawDocument, profile: &CompiledProfile) -> Vec<ClassifiedLine> {
    doc.lines
        .iter()
        .enumerate()
        .map(|(line_number, text)| ClassifiedLine {
            line_number,
            text: text.clone(),
            category: classify(text, profile),
        })
        .collect()
}
