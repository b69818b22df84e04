//! Paragraph assembly from repaired main-text lines.
//!
//! Print lines are short; paragraph structure has to be rebuilt. A blank
//! line always breaks; a strong opener (dated entry, section numeral)
//! breaks before itself; otherwise a line continues the buffered paragraph
//! when it starts lowercase or when the buffer still lacks terminal
//! punctuation. Overlong paragraphs are force-broken at the next sentence
//! end, and fragments below the minimum length are dropped.

use recensio_core::profile::CompiledProfile;
use recensio_core::{Category, ClassifiedLine};

/// A paragraph with its source-line span, before chapter assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphSpan {
    /// Line number of the first contributing line.
    pub start_line: usize,
    /// Line number just past the last contributing line.
    pub end_line: usize,
    /// Assembled text.
    pub text: String,
}

/// Characters that can legitimately end a complete paragraph: sentence
/// punctuation (Latin and Greek) and closing quotes/parens.
fn ends_terminally(text: &str) -> bool {
    matches!(
        text.trim_end().chars().last(),
        Some('.' | ';' | '·' | '!' | '?' | '»' | '"' | '\'' | ')')
    )
}

/// Assemble paragraphs from the repaired line stream.
///
/// Only main-text lines contribute; apparatus, furniture, and noise lines
/// are invisible here except that blank lines break paragraphs.
#[must_use]
pub fn assemble(lines: &[ClassifiedLine], profile: &CompiledProfile) -> Vec<ParagraphSpan> {
    let thresholds = profile.thresholds();
    let mut spans: Vec<ParagraphSpan> = Vec::new();

    let mut buffer: Vec<&str> = Vec::new();
    let mut buffer_len = 0usize;
    let mut span_start = 0usize;
    let mut span_end = 0usize;

    let mut flush = |buffer: &mut Vec<&str>, buffer_len: &mut usize, start: usize, end: usize| {
        if buffer.is_empty() {
            return;
        }
        let text = buffer.join(" ");
        buffer.clear();
        *buffer_len = 0;
        if text.chars().count() >= thresholds.min_paragraph_len {
            spans.push(ParagraphSpan {
                start_line: start,
                end_line: end,
                text,
            });
        } else {
            log::debug!("dropped fragment paragraph at line {start}: {text:?}");
        }
    };

    for line in lines {
        match line.category {
            Category::Blank => {
                flush(&mut buffer, &mut buffer_len, span_start, span_end);
                continue;
            }
            Category::MainText => {}
            _ => continue,
        }

        let text = line.text.trim();
        if text.is_empty() {
            continue;
        }

        let starts_lower = text.chars().next().is_some_and(char::is_lowercase);
        let opener = profile.is_strong_opener(text);

        if !buffer.is_empty() {
            let complete = ends_terminally(buffer.last().unwrap_or(&""));
            let over_length = buffer_len > thresholds.max_paragraph_len;
            let continues = !opener
                && (starts_lower || (!complete && buffer_len < thresholds.max_paragraph_len));
            if !continues || (over_length && complete) {
                flush(&mut buffer, &mut buffer_len, span_start, span_end);
            }
        }

        if buffer.is_empty() {
            span_start = line.line_number;
        }
        buffer.push(text);
        buffer_len += text.chars().count() + 1;
        span_end = line.line_number + 1;
    }

    flush(&mut buffer, &mut buffer_len, span_start, span_end);
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use recensio_core::profile::CorpusProfile;

    fn profile() -> CompiledProfile {
        CorpusProfile {
            strong_text_openers: vec![r"(?i)^(Dell'anno|Nell'anno)\s".to_string()],
            ..CorpusProfile::default()
        }
        .compile()
        .unwrap()
    }

    fn line(n: usize, text: &str, category: Category) -> ClassifiedLine {
        ClassifiedLine {
            line_number: n,
            text: text.to_string(),
            category,
        }
    }

    #[test]
    fn test_blank_breaks_paragraph() {
        let p = profile();
        let lines = vec![
            line(0, "Prima parte del racconto qui.", Category::MainText),
            line(1, "", Category::Blank),
            line(2, "Seconda parte del racconto qui.", Category::MainText),
        ];
        let spans = assemble(&lines, &p);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "Prima parte del racconto qui.");
        assert_eq!(spans[1].start_line, 2);
    }

    #[test]
    fn test_lowercase_start_continues() {
        let p = profile();
        let lines = vec![
            line(0, "Et lo papa venne in della chiesa.", Category::MainText),
            line(1, "et tutto lo popolo con lui insieme.", Category::MainText),
        ];
        let spans = assemble(&lines, &p);
        assert_eq!(spans.len(), 1);
        assert_eq!(
            spans[0].text,
            "Et lo papa venne in della chiesa. et tutto lo popolo con lui insieme."
        );
    }

    #[test]
    fn test_incomplete_buffer_continues() {
        let p = profile();
        let lines = vec![
            line(0, "Et lo papa venne in della", Category::MainText),
            line(1, "Chiesa de Santo Pietro.", Category::MainText),
        ];
        let spans = assemble(&lines, &p);
        // No terminal punctuation on the first line: the uppercase start
        // does not break.
        assert_eq!(spans.len(), 1);
    }

    #[test]
    fn test_complete_buffer_breaks_on_uppercase() {
        let p = profile();
        let lines = vec![
            line(0, "Prima frase conclusa del racconto.", Category::MainText),
            line(1, "Nuovo periodo che comincia qui adesso.", Category::MainText),
        ];
        let spans = assemble(&lines, &p);
        assert_eq!(spans.len(), 2);
    }

    #[test]
    fn test_strong_opener_always_breaks() {
        let p = profile();
        let lines = vec![
            line(0, "racconto precedente senza fine", Category::MainText),
            line(1, "Dell'anno 1484 del mese di augusto", Category::MainText),
        ];
        let spans = assemble(&lines, &p);
        assert_eq!(spans.len(), 2);
        assert!(spans[1].text.starts_with("Dell'anno"));
    }

    #[test]
    fn test_apparatus_lines_are_invisible() {
        let p = profile();
        let lines = vec![
            line(0, "Et lo papa venne in della chiesa", Category::MainText),
            line(1, "(a) V R S om. papa", Category::Apparatus),
            line(2, "et tutto lo popolo con lui.", Category::MainText),
        ];
        let spans = assemble(&lines, &p);
        assert_eq!(spans.len(), 1);
        assert!(!spans[0].text.contains("om."));
    }

    #[test]
    fn test_short_fragments_dropped() {
        let p = profile();
        let lines = vec![
            line(0, "frammento", Category::MainText),
            line(1, "", Category::Blank),
            line(2, "Questo invece è un paragrafo abbastanza lungo.", Category::MainText),
        ];
        let spans = assemble(&lines, &p);
        assert_eq!(spans.len(), 1);
        assert!(spans[0].text.starts_with("Questo"));
    }

    #[test]
    fn test_force_break_on_overlong_paragraph() {
        let p = profile();
        // Sentence-ended lines starting lowercase would otherwise merge
        // forever; the length cap forces a break at a sentence end.
        let sentence = "e poi seguita il racconto della vita del pontefice con molte parole.";
        let lines: Vec<ClassifiedLine> = (0..20)
            .map(|i| line(i, sentence, Category::MainText))
            .collect();
        let spans = assemble(&lines, &p);
        assert!(spans.len() > 1, "expected a forced break, got one span");
        for span in &spans {
            assert!(span.text.chars().count() < 2 * 800 + sentence.len());
        }
    }
}
