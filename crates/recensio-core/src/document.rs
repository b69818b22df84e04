//! Document model: raw input, classified lines, blocks, paragraphs,
//! chapters, and the chapter JSON boundary contract.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// An ordered sequence of raw OCR lines plus a corpus/volume identifier.
///
/// Immutable input to the pipeline; every stage returns new structures
/// rather than mutating the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Corpus/volume identifier, usually derived from the file name.
    pub id: String,
    /// The raw lines, in file order.
    pub lines: Vec<String>,
}

impl RawDocument {
    /// Build a document from lines already in memory.
    #[must_use]
    pub fn from_lines(id: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            id: id.into(),
            lines,
        }
    }

    /// Read a document from a UTF-8 plain-text file.
    ///
    /// The identifier is the file stem.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        Ok(Self {
            id,
            lines: text.lines().map(str::to_string).collect(),
        })
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the document has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// The closed set of per-line categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Primary text of the edition.
    MainText,
    /// Critical-apparatus or footnote material.
    Apparatus,
    /// Running page/volume header.
    PageHeader,
    /// Editorial margin line number.
    MarginNumber,
    /// Printed page number.
    PageNumber,
    /// Empty line.
    Blank,
    /// Unclassifiable junk; dropped from output.
    #[default]
    Noise,
}

impl Category {
    /// Whether lines of this category survive into the reconstructed text.
    #[inline]
    #[must_use]
    pub fn is_content(self) -> bool {
        matches!(self, Self::MainText)
    }

    /// Whether this category is stripped as editorial furniture rather
    /// than text (headers, margin/page numbers).
    #[inline]
    #[must_use]
    pub fn is_furniture(self) -> bool {
        matches!(self, Self::PageHeader | Self::MarginNumber | Self::PageNumber)
    }
}

impl std::fmt::Display for Category {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MainText => write!(f, "main_text"),
            Self::Apparatus => write!(f, "apparatus"),
            Self::PageHeader => write!(f, "page_header"),
            Self::MarginNumber => write!(f, "margin_number"),
            Self::PageNumber => write!(f, "page_number"),
            Self::Blank => write!(f, "blank"),
            Self::Noise => write!(f, "noise"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "main_text" => Ok(Self::MainText),
            "apparatus" => Ok(Self::Apparatus),
            "page_header" => Ok(Self::PageHeader),
            "margin_number" => Ok(Self::MarginNumber),
            "page_number" => Ok(Self::PageNumber),
            "blank" => Ok(Self::Blank),
            "noise" => Ok(Self::Noise),
            _ => Err(format!("unknown category: '{s}'")),
        }
    }
}

/// One raw line with its assigned category.
///
/// Produced by the classifier; the block propagator is the only stage
/// permitted to revise `category` afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedLine {
    /// 0-indexed position in the raw document.
    pub line_number: usize,
    /// The raw line text.
    pub text: String,
    /// Assigned category.
    pub category: Category,
}

/// Sub-kind of an apparatus block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Manuscript variant readings (the apparatus criticus proper).
    Variant,
    /// Scholarly commentary/footnotes.
    Commentary,
}

/// A contiguous run of lines sharing one category.
///
/// Blocks partition the document: no gaps, no overlaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    /// First line of the run (inclusive).
    pub start_line: usize,
    /// One past the last line (exclusive).
    pub end_line: usize,
    /// The category shared by every line in the run.
    pub category: Category,
    /// Apparatus sub-kind, when `category` is [`Category::Apparatus`].
    pub kind: Option<BlockKind>,
}

/// One reconstructed paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Position within the chapter, contiguous from the chapter's base.
    pub index: usize,
    /// Reconstructed text; non-empty except for intentional lacunae.
    pub text: String,
}

/// One reconstructed chapter/book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// Chapter/book number (from a marker or a boundary table).
    pub chapter_number: i32,
    /// Human-readable title.
    pub title: String,
    /// Paragraphs in reading order.
    pub paragraphs: Vec<Paragraph>,
}

impl Chapter {
    /// Serialize to the boundary JSON consumed by the persistence layer.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&ChapterJson::from(self))?)
    }
}

/// Wire shape of a chapter:
/// `{ chapterNumber, title, sourceContent: { paragraphs: [{index, text}] } }`.
///
/// This exact shape is the contract with the surrounding application; the
/// camelCase keys exist only at this boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterJson {
    /// Chapter/book number.
    pub chapter_number: i32,
    /// Chapter title.
    pub title: String,
    /// Paragraph container.
    pub source_content: SourceContent,
}

/// Container for the ordered paragraph list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceContent {
    /// Paragraphs in index order, contiguous, no gaps.
    pub paragraphs: Vec<Paragraph>,
}

impl From<&Chapter> for ChapterJson {
    fn from(chapter: &Chapter) -> Self {
        Self {
            chapter_number: chapter.chapter_number,
            title: chapter.title.clone(),
            source_content: SourceContent {
                paragraphs: chapter.paragraphs.clone(),
            },
        }
    }
}

impl From<ChapterJson> for Chapter {
    fn from(json: ChapterJson) -> Self {
        Self {
            chapter_number: json.chapter_number,
            title: json.title,
            paragraphs: json.source_content.paragraphs,
        }
    }
}

/// Per-document cleaning counters, surfaced by the CLI and logged at the
/// end of each run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningStats {
    /// Lines read from the raw document.
    pub total_lines: usize,
    /// Lines classified as running headers.
    pub header_lines: usize,
    /// Lines classified (or re-labeled) as apparatus/footnotes.
    pub apparatus_lines: usize,
    /// Standalone margin line numbers.
    pub margin_number_lines: usize,
    /// Standalone page numbers.
    pub page_number_lines: usize,
    /// Lines dropped as noise.
    pub noise_lines: usize,
    /// Blank lines in the input.
    pub blank_lines: usize,
    /// Lines that survived as main text.
    pub main_text_lines: usize,
    /// Hyphenated line pairs rejoined.
    pub hyphens_rejoined: usize,
    /// Lines changed by the inline-marker rule table.
    pub markers_stripped: usize,
    /// Paragraphs emitted across all chapters.
    pub output_paragraphs: usize,
}

impl CleaningStats {
    /// Tally the classification counters from a resolved line stream.
    #[must_use]
    pub fn tally(lines: &[ClassifiedLine]) -> Self {
        let mut stats = Self {
            total_lines: lines.len(),
            ..Self::default()
        };
        for line in lines {
            match line.category {
                Category::MainText => stats.main_text_lines += 1,
                Category::Apparatus => stats.apparatus_lines += 1,
                Category::PageHeader => stats.header_lines += 1,
                Category::MarginNumber => stats.margin_number_lines += 1,
                Category::PageNumber => stats.page_number_lines += 1,
                Category::Blank => stats.blank_lines += 1,
                Category::Noise => stats.noise_lines += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_category_roundtrip() {
        for cat in [
            Category::MainText,
            Category::Apparatus,
            Category::PageHeader,
            Category::MarginNumber,
            Category::PageNumber,
            Category::Blank,
            Category::Noise,
        ] {
            let s = cat.to_string();
            assert_eq!(Category::from_str(&s).unwrap(), cat, "roundtrip for {s}");
        }
        assert!(Category::from_str("marginalia").is_err());
    }

    #[test]
    fn test_chapter_json_shape() {
        let chapter = Chapter {
            chapter_number: 3,
            title: "Commentary on Odyssey Book 3".to_string(),
            paragraphs: vec![
                Paragraph {
                    index: 0,
                    text: "First paragraph.".to_string(),
                },
                Paragraph {
                    index: 1,
                    text: "Second paragraph.".to_string(),
                },
            ],
        };

        let json = chapter.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["chapterNumber"], 3);
        assert_eq!(value["sourceContent"]["paragraphs"][1]["index"], 1);
        assert_eq!(
            value["sourceContent"]["paragraphs"][0]["text"],
            "First paragraph."
        );

        // Round-trip back through the wire shape.
        let parsed: ChapterJson = serde_json::from_str(&json).unwrap();
        assert_eq!(Chapter::from(parsed), chapter);
    }

    #[test]
    fn test_stats_tally() {
        let lines = vec![
            ClassifiedLine {
                line_number: 0,
                text: "STEPHANI INFESSURAE".to_string(),
                category: Category::PageHeader,
            },
            ClassifiedLine {
                line_number: 1,
                text: String::new(),
                category: Category::Blank,
            },
            ClassifiedLine {
                line_number: 2,
                text: "Dell'anno 1484".to_string(),
                category: Category::MainText,
            },
        ];
        let stats = CleaningStats::tally(&lines);
        assert_eq!(stats.total_lines, 3);
        assert_eq!(stats.header_lines, 1);
        assert_eq!(stats.blank_lines, 1);
        assert_eq!(stats.main_text_lines, 1);
    }

    #[test]
    fn test_category_helpers() {
        assert!(Category::MainText.is_content());
        assert!(!Category::Apparatus.is_content());
        assert!(Category::PageHeader.is_furniture());
        assert!(Category::MarginNumber.is_furniture());
        assert!(!Category::Noise.is_furniture());
    }
}
