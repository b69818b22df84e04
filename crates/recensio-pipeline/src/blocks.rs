//! Grouping resolved lines into contiguous blocks.
//!
//! After propagation the line stream is final; this pass merges adjacent
//! lines of one category into [`TextBlock`]s. Blocks partition the
//! document: every line belongs to exactly one block, with no gaps or
//! overlaps.

use recensio_core::{BlockKind, Category, ClassifiedLine, TextBlock};

use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER_OPENER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(\d{1,2}\)\s").expect("valid pattern"));

/// Partition the resolved line stream into contiguous category blocks.
#[must_use]
pub fn build_blocks(lines: &[ClassifiedLine]) -> Vec<TextBlock> {
    let mut blocks: Vec<TextBlock> = Vec::new();

    for line in lines {
        match blocks.last_mut() {
            Some(block) if block.category == line.category => {
                block.end_line = line.line_number + 1;
            }
            _ => {
                let kind = (line.category == Category::Apparatus)
                    .then(|| apparatus_kind(&line.text));
                blocks.push(TextBlock {
                    start_line: line.line_number,
                    end_line: line.line_number + 1,
                    category: line.category,
                    kind,
                });
            }
        }
    }

    blocks
}

/// Kind of an apparatus block, read off its opening line: numbered
/// citations open scholarly commentary, everything else is the apparatus
/// criticus proper.
fn apparatus_kind(opening_line: &str) -> BlockKind {
    if NUMBER_OPENER.is_match(opening_line.trim_start()) {
        BlockKind::Commentary
    } else {
        BlockKind::Variant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize, text: &str, category: Category) -> ClassifiedLine {
        ClassifiedLine {
            line_number: n,
            text: text.to_string(),
            category,
        }
    }

    #[test]
    fn test_blocks_partition_without_gaps() {
        let lines = vec![
            line(0, "HEADER", Category::PageHeader),
            line(1, "text one", Category::MainText),
            line(2, "text two", Category::MainText),
            line(3, "", Category::Blank),
            line(4, "(a) V R S", Category::Apparatus),
            line(5, "(1) Cf. p. 12", Category::Apparatus),
        ];
        let blocks = build_blocks(&lines);

        assert_eq!(blocks.len(), 4);
        // Partition: consecutive, gap-free, covering every line.
        assert_eq!(blocks[0].start_line, 0);
        for pair in blocks.windows(2) {
            assert_eq!(pair[0].end_line, pair[1].start_line);
        }
        assert_eq!(blocks.last().unwrap().end_line, lines.len());
    }

    #[test]
    fn test_apparatus_kind_from_opener() {
        let variant = build_blocks(&[line(0, "(a) V R S", Category::Apparatus)]);
        assert_eq!(variant[0].kind, Some(BlockKind::Variant));

        let commentary = build_blocks(&[line(0, "(1) Cf. p. 12", Category::Apparatus)]);
        assert_eq!(commentary[0].kind, Some(BlockKind::Commentary));

        let text = build_blocks(&[line(0, "plain text", Category::MainText)]);
        assert_eq!(text[0].kind, None);
    }

    #[test]
    fn test_empty_input() {
        assert!(build_blocks(&[]).is_empty());
    }
}
