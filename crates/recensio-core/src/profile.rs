//! Corpus profiles: the per-edition knowledge the pipeline consumes.
//!
//! Every constant that differs between editions lives here rather than in
//! the pipeline code: running-header signatures, the manuscript siglum
//! alphabet, editorial vocabulary, classification thresholds, margin
//! numbering quirks, boundary strategy, and the cleanup rule table. A
//! profile is plain TOML; [`CorpusProfile::compile`] turns it into the
//! regex-backed form the pipeline actually runs against, surfacing bad
//! patterns as load-time errors.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{RecensioError, Result};
use crate::rules::{default_cleanup_specs, RuleSet, RuleSpec};
use crate::script::Script;

/// How to classify a short line of isolated Latin function words.
///
/// Two-column footnote layout chops apparatus into short fragments, so
/// commentary-style editions bias these lines toward apparatus; prose
/// editions, where long narrative lines dominate, bias them toward main
/// text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentBias {
    /// Treat ambiguous short fragments as apparatus (commentary editions).
    Apparatus,
    /// Treat ambiguous short fragments as main text (prose editions).
    #[default]
    MainText,
}

/// Classification and assembly thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Lines shorter than this use the stricter script-ratio threshold.
    pub short_line_len: usize,
    /// Minimum target-script ratio for short lines to count as main text.
    pub short_line_ratio: f64,
    /// Minimum target-script ratio for longer lines.
    pub long_line_ratio: f64,
    /// Maximum length of an "ambiguous short fragment" (see [`FragmentBias`]).
    pub short_fragment_len: usize,
    /// Bias applied to ambiguous short fragments.
    pub short_fragment_bias: FragmentBias,
    /// Isolated siglum tokens needed before a line reads as apparatus.
    pub min_sigla_hits: usize,
    /// Minimum length at which a vocabulary-free line inside an apparatus
    /// block reads as main text resuming (prose editions).
    pub strong_text_len: usize,
    /// How far the block propagator looks past a blank line for another
    /// apparatus signal before closing the block.
    pub max_apparatus_lookahead: usize,
    /// Soft cap on paragraph length; a break is forced at the next
    /// sentence end once exceeded.
    pub max_paragraph_len: usize,
    /// Paragraphs shorter than this are dropped as fragments.
    pub min_paragraph_len: usize,
    /// First paragraph index within each chapter.
    pub paragraph_base_index: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            short_line_len: 30,
            short_line_ratio: 0.6,
            long_line_ratio: 0.4,
            short_fragment_len: 60,
            short_fragment_bias: FragmentBias::default(),
            min_sigla_hits: 3,
            strong_text_len: 80,
            max_apparatus_lookahead: 10,
            max_paragraph_len: 800,
            min_paragraph_len: 20,
            paragraph_base_index: 0,
        }
    }
}

/// Margin and page numbering layout of the printed edition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginConfig {
    /// The edition numbers every Nth line in the margin (usually 5 or 10).
    pub line_number_step: u32,
    /// Largest margin line number that can occur on one page.
    pub max_line_number: u32,
    /// Largest plausible page number; bare numbers above the margin range
    /// and up to this are page numbers.
    pub max_page_number: u32,
    /// Known OCR garblings of the margin numbers ("IO" for 10, "ij" for
    /// 15, "2o" for 20, ...). Matched against the whole trimmed line.
    pub garbled_spellings: Vec<String>,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            line_number_step: 5,
            max_line_number: 35,
            max_page_number: 400,
            garbled_spellings: [
                "IO", "io", "ìo", "ro", "ij", "I5", "[5", "$5", "2(", "2o", "ao", "a5", "3o",
                "^c", "5o",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
        }
    }
}

/// Confidence tag for manually curated boundary tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryConfidence {
    /// Boundaries verified against the printed edition.
    Verified,
    /// Boundaries estimated by inspection or interpolation; output chapter
    /// numbering is provisional and must be validated.
    #[default]
    Estimated,
}

/// One entry of a static boundary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticBoundary {
    /// Chapter/book number assigned to this range.
    pub chapter_number: i32,
    /// Human-readable chapter title.
    pub title: String,
    /// First line of the range (0-indexed, inclusive).
    pub start_line: usize,
    /// One past the last line of the range (exclusive).
    pub end_line: usize,
}

/// Strategy for splitting a document into chapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum BoundaryConfig {
    /// The whole document is a single chapter.
    Single {
        /// Title of the one chapter.
        title: String,
    },
    /// Detect structural book headers by regex. The pattern's first capture
    /// group must yield the book identifier; the first occurrence of each
    /// new identifier opens a chapter, later occurrences are verse/page
    /// sub-markers.
    Markers {
        /// OCR-tolerant header pattern with one capture group.
        marker_pattern: String,
        /// Ordered identifier alphabet; position+1 becomes the chapter
        /// number (e.g. Greek book letters `ΑΒΓΔΕΖΗΘΙΚΛ`).
        identifier_alphabet: Vec<String>,
        /// Chapter title template; `{id}` and `{n}` are substituted.
        #[serde(default = "default_title_template")]
        title_template: String,
        /// Half-width of the window searched by boundary validation.
        #[serde(default = "default_validation_window")]
        validation_window: usize,
    },
    /// Use a manually curated table of line ranges.
    Static {
        /// How much to trust the table.
        #[serde(default)]
        confidence: BoundaryConfidence,
        /// The ranges, in document order.
        chapters: Vec<StaticBoundary>,
        /// Half-width of the window searched by boundary validation.
        #[serde(default = "default_validation_window")]
        validation_window: usize,
        /// Optional marker pattern used only for validation evidence.
        #[serde(default)]
        marker_pattern: Option<String>,
    },
}

fn default_validation_window() -> usize {
    5
}

fn default_title_template() -> String {
    "Book {n}".to_string()
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self::Single {
            title: "Text".to_string(),
        }
    }
}

/// Declarative description of one corpus/edition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusProfile {
    /// Profile name, used in logs and reports.
    pub name: String,
    /// The script the primary text is written in.
    pub target_script: Script,
    /// OCR-tolerant regexes matching running headers and title lines.
    pub header_signatures: Vec<String>,
    /// The edition's manuscript siglum alphabet (single uppercase letters).
    pub siglum_alphabet: String,
    /// Editorial vocabulary that marks apparatus prose ("om.", "manca",
    /// "corregge", "Cf.", ...). Plain strings, matched case-sensitively at
    /// word starts.
    pub editorial_vocabulary: Vec<String>,
    /// Regexes for strong main-text openers (dated entries, section
    /// numerals) that break apparatus propagation.
    pub strong_text_openers: Vec<String>,
    /// Classification and assembly thresholds.
    pub thresholds: Thresholds,
    /// Margin/page numbering layout.
    pub margin: MarginConfig,
    /// Chapter boundary strategy.
    pub boundaries: BoundaryConfig,
    /// Cleanup rule table; empty means the default catalogue.
    pub rules: Vec<RuleSpec>,
}

impl Default for CorpusProfile {
    fn default() -> Self {
        Self {
            name: "generic-latin".to_string(),
            target_script: Script::Latin,
            header_signatures: Vec::new(),
            siglum_alphabet: "ABCDEPRSVW".to_string(),
            editorial_vocabulary: [
                "om.", "add.", "cod.", "mss.", "Cf.", "cf.", "ibid.", "loc. cit.", "op. cit.",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
            strong_text_openers: Vec::new(),
            thresholds: Thresholds::default(),
            margin: MarginConfig::default(),
            boundaries: BoundaryConfig::default(),
            rules: Vec::new(),
        }
    }
}

impl CorpusProfile {
    /// Parse a profile from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let profile: Self = toml::from_str(text)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Read and parse a profile from a TOML file.
    pub fn from_toml_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Structural validation beyond what serde enforces.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(RecensioError::InvalidProfile(
                self.name.clone(),
                "profile name is empty".to_string(),
            ));
        }
        if self.siglum_alphabet.is_empty() {
            return Err(RecensioError::InvalidProfile(
                self.name.clone(),
                "siglum alphabet is empty".to_string(),
            ));
        }
        if let Some(c) = self
            .siglum_alphabet
            .chars()
            .find(|c| !c.is_uppercase() || !c.is_alphabetic())
        {
            return Err(RecensioError::InvalidProfile(
                self.name.clone(),
                format!("siglum alphabet contains non-uppercase '{c}'"),
            ));
        }
        if let BoundaryConfig::Static { chapters, .. } = &self.boundaries {
            let mut prev_end = 0usize;
            for entry in chapters {
                if entry.end_line <= entry.start_line {
                    return Err(RecensioError::InvalidProfile(
                        self.name.clone(),
                        format!("chapter {} has an empty line range", entry.chapter_number),
                    ));
                }
                if entry.start_line < prev_end {
                    return Err(RecensioError::InvalidProfile(
                        self.name.clone(),
                        format!("chapter {} overlaps the previous range", entry.chapter_number),
                    ));
                }
                prev_end = entry.end_line;
            }
        }
        Ok(())
    }

    /// Compile the profile into its regex-backed runtime form.
    pub fn compile(&self) -> Result<CompiledProfile> {
        CompiledProfile::new(self.clone())
    }
}

/// A [`CorpusProfile`] with every pattern compiled.
///
/// All regexes are compiled once here; the pipeline never compiles a
/// pattern per line.
#[derive(Debug, Clone)]
pub struct CompiledProfile {
    /// The declarative profile this was compiled from.
    pub profile: CorpusProfile,
    headers: Vec<Regex>,
    openers: Vec<Regex>,
    sigla: Regex,
    vocabulary: Option<Regex>,
    rules: RuleSet,
    boundary_marker: Option<Regex>,
}

impl CompiledProfile {
    fn new(profile: CorpusProfile) -> Result<Self> {
        let compile_named = |name: &str, pattern: &str| -> Result<Regex> {
            Regex::new(pattern).map_err(|source| RecensioError::PatternError {
                name: name.to_string(),
                source,
            })
        };

        let headers = profile
            .header_signatures
            .iter()
            .enumerate()
            .map(|(i, p)| compile_named(&format!("header_signature[{i}]"), p))
            .collect::<Result<Vec<_>>>()?;

        let openers = profile
            .strong_text_openers
            .iter()
            .enumerate()
            .map(|(i, p)| compile_named(&format!("strong_text_opener[{i}]"), p))
            .collect::<Result<Vec<_>>>()?;

        // An isolated siglum: one letter of the edition's alphabet with an
        // optional prime/caret/digit suffix and an optional trailing dot,
        // standing alone as a token ("C", "R1", "O'", "A.").
        let alphabet = regex::escape(&profile.siglum_alphabet);
        let sigla = compile_named(
            "siglum_token",
            &format!(r"^[{alphabet}]['’\^ʹ]?\d?\.?$"),
        )?;

        let vocabulary = if profile.editorial_vocabulary.is_empty() {
            None
        } else {
            let alternatives = profile
                .editorial_vocabulary
                .iter()
                .map(|term| regex::escape(term))
                .collect::<Vec<_>>()
                .join("|");
            Some(compile_named(
                "editorial_vocabulary",
                &format!(r"(^|[^\w])(?:{alternatives})"),
            )?)
        };

        let rule_specs = if profile.rules.is_empty() {
            default_cleanup_specs()
        } else {
            profile.rules.clone()
        };
        let rules = RuleSet::compile(&rule_specs)?;

        let boundary_marker = match &profile.boundaries {
            BoundaryConfig::Markers { marker_pattern, .. } => {
                Some(compile_named("boundary_marker", marker_pattern)?)
            }
            BoundaryConfig::Static {
                marker_pattern: Some(pattern),
                ..
            } => Some(compile_named("boundary_marker", pattern)?),
            _ => None,
        };

        Ok(Self {
            profile,
            headers,
            openers,
            sigla,
            vocabulary,
            rules,
            boundary_marker,
        })
    }

    /// Does the line match any running-header signature?
    #[must_use]
    pub fn is_header(&self, line: &str) -> bool {
        self.headers.iter().any(|re| re.is_match(line))
    }

    /// Does the line match any strong main-text opener?
    #[must_use]
    pub fn is_strong_opener(&self, line: &str) -> bool {
        self.openers.iter().any(|re| re.is_match(line))
    }

    /// Count isolated siglum tokens in the line.
    #[must_use]
    pub fn sigla_hits(&self, line: &str) -> usize {
        line.split(|c: char| {
            c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | ',' | ';' | ':')
        })
        .filter(|token| !token.is_empty() && self.sigla.is_match(token))
        .count()
    }

    /// Does the line contain editorial apparatus vocabulary?
    #[must_use]
    pub fn has_editorial_vocab(&self, line: &str) -> bool {
        self.vocabulary.as_ref().is_some_and(|re| re.is_match(line))
    }

    /// The compiled cleanup rule set.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// The compiled boundary marker pattern, if the strategy has one.
    #[must_use]
    pub fn boundary_marker(&self) -> Option<&Regex> {
        self.boundary_marker.as_ref()
    }

    /// Does the line match the boundary marker? Marker lines are
    /// structural headers, not text.
    #[must_use]
    pub fn is_boundary_marker(&self, line: &str) -> bool {
        self.boundary_marker.as_ref().is_some_and(|re| re.is_match(line))
    }

    /// Shorthand for the profile's thresholds.
    #[must_use]
    pub fn thresholds(&self) -> &Thresholds {
        &self.profile.thresholds
    }

    /// Shorthand for the profile's target script.
    #[must_use]
    pub fn target_script(&self) -> Script {
        self.profile.target_script
    }

    /// Is the trimmed line a known garbled margin-number spelling?
    #[must_use]
    pub fn is_garbled_margin_number(&self, trimmed: &str) -> bool {
        self.profile
            .margin
            .garbled_spellings
            .iter()
            .any(|s| s == trimmed)
    }
}
