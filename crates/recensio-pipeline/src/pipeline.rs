//! The pipeline driver: classify → propagate → repair → assemble → segment.
//!
//! Stages run strictly in order because each consumes the full output of
//! the previous one (the propagator needs lookahead over the remaining
//! document, so there is no streaming mode). One [`Pipeline`] is immutable
//! and shareable; independent documents may run through it in parallel,
//! since no stage keeps per-document state in the pipeline itself.

use recensio_core::profile::CompiledProfile;
use recensio_core::{
    Chapter, ClassifiedLine, CleaningStats, RawDocument, RecensioError, Result, TextBlock,
};

use crate::assembler::assemble;
use crate::blocks::build_blocks;
use crate::classifier::classify_document;
use crate::propagator::propagate;
use crate::repair::repair_lines;
use crate::segmenter::{segment, validate_boundaries, BoundaryWarning};

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Reconstructed chapters in document order.
    pub chapters: Vec<Chapter>,
    /// Per-document cleaning counters.
    pub stats: CleaningStats,
    /// Boundary cross-check warnings (static tables only).
    pub warnings: Vec<BoundaryWarning>,
    /// The resolved block partition, for inspection tooling.
    pub blocks: Vec<TextBlock>,
}

/// A configured, reusable cleaning pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    profile: CompiledProfile,
}

impl Pipeline {
    /// Build a pipeline from a compiled profile.
    #[must_use]
    pub fn new(profile: CompiledProfile) -> Self {
        Self { profile }
    }

    /// The profile this pipeline runs with.
    #[must_use]
    pub fn profile(&self) -> &CompiledProfile {
        &self.profile
    }

    /// Classify and block-resolve a document without repairing or
    /// segmenting it. Used by inspection tooling.
    #[must_use]
    pub fn resolve_lines(&self, doc: &RawDocument) -> Vec<ClassifiedLine> {
        let mut lines = classify_document(doc, &self.profile);
        propagate(&mut lines, &self.profile);
        lines
    }

    /// Run the full pipeline on one document.
    ///
    /// # Errors
    ///
    /// [`RecensioError::EmptyOutput`] when the run yields zero chapters or
    /// zero paragraphs: the one condition that signals a misconfigured
    /// profile rather than a dirty page.
    pub fn run(&self, doc: &RawDocument) -> Result<PipelineOutput> {
        log::info!("processing document '{}' ({} lines)", doc.id, doc.len());

        let lines = self.resolve_lines(doc);
        let blocks = build_blocks(&lines);
        let mut stats = CleaningStats::tally(&lines);

        let (repaired, counts) = repair_lines(&lines, &self.profile);
        stats.hyphens_rejoined = counts.hyphens_rejoined;
        stats.markers_stripped = counts.markers_stripped;

        let spans = assemble(&repaired, &self.profile);
        let chapters = segment(&spans, &lines, &self.profile);
        let warnings = validate_boundaries(&lines, &self.profile);

        stats.output_paragraphs = chapters.iter().map(|c| c.paragraphs.len()).sum();
        if chapters.is_empty() || stats.output_paragraphs == 0 {
            return Err(RecensioError::EmptyOutput(doc.id.clone()));
        }

        log::info!(
            "document '{}': {} chapters, {} paragraphs, {} apparatus lines removed",
            doc.id,
            chapters.len(),
            stats.output_paragraphs,
            stats.apparatus_lines
        );
        for warning in &warnings {
            log::warn!("{warning}");
        }

        Ok(PipelineOutput {
            chapters,
            stats,
            warnings,
            blocks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recensio_core::profile::CorpusProfile;

    fn prose_pipeline() -> Pipeline {
        let profile = CorpusProfile {
            header_signatures: vec![
                r"^\d*\s*STEPHANI\s+INFESSURAE".to_string(),
                r"(?i)^\[[\di][0-9ijo]{2,3}\]\s+DIARIA\s+RERUM\s+ROM".to_string(),
            ],
            strong_text_openers: vec![
                r"(?i)^(Dell'anno|Nell'anno)\s".to_string(),
                r"^Die\s+[\.\dIVXLC]".to_string(),
            ],
            ..CorpusProfile::default()
        }
        .compile()
        .unwrap();
        Pipeline::new(profile)
    }

    #[test]
    fn test_empty_output_is_fatal() {
        let pipeline = prose_pipeline();
        let doc = RawDocument::from_lines(
            "junk",
            vec!["(a) V R S om.".to_string(), "§§§".to_string()],
        );
        match pipeline.run(&doc) {
            Err(RecensioError::EmptyOutput(id)) => assert_eq!(id, "junk"),
            other => panic!("expected EmptyOutput, got {other:?}"),
        }
    }

    #[test]
    fn test_header_and_apparatus_removed() {
        let pipeline = prose_pipeline();
        let doc = RawDocument::from_lines(
            "diarium",
            vec![
                "160 STEPHANI INFESSURAE".to_string(),
                "(a) Cf. manuscript R1 S1".to_string(),
                "lo papa manca in C".to_string(),
                "Dell'anno 1484 del mese di augusto a dì 12 morì papa Sixto".to_string(),
                "et fu facto papa Innocentio octavo in suo loco.".to_string(),
            ],
        );
        let output = pipeline.run(&doc).unwrap();
        assert_eq!(output.chapters.len(), 1);
        let text: String = output.chapters[0]
            .paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        assert!(text.starts_with("Dell'anno 1484"));
        assert!(!text.contains("STEPHANI"));
        assert!(!text.contains("manuscript"));
        assert!(output.stats.header_lines >= 1);
        assert!(output.stats.apparatus_lines >= 2);
    }

    #[test]
    fn test_rerun_on_own_output_is_stable() {
        let pipeline = prose_pipeline();
        let doc = RawDocument::from_lines(
            "diarium",
            vec![
                "Dell'anno 1484 del mese di augusto a dì 12 morì papa Sixto".to_string(),
                "et fu facto papa Innocentio octavo in suo loco.".to_string(),
            ],
        );
        let first = pipeline.run(&doc).unwrap();

        // Feed the cleaned paragraphs back in as a document.
        let relines: Vec<String> = first.chapters[0]
            .paragraphs
            .iter()
            .map(|p| p.text.clone())
            .collect();
        let redoc = RawDocument::from_lines("diarium", relines);
        let second = pipeline.run(&redoc).unwrap();

        let texts = |out: &PipelineOutput| -> Vec<String> {
            out.chapters[0]
                .paragraphs
                .iter()
                .map(|p| p.text.clone())
                .collect()
        };
        assert_eq!(texts(&first), texts(&second));
    }

    #[test]
    fn test_blocks_partition_document() {
        let pipeline = prose_pipeline();
        let doc = RawDocument::from_lines(
            "diarium",
            vec![
                "160 STEPHANI INFESSURAE".to_string(),
                "(a) Cf. manuscript R1 S1".to_string(),
                "Dell'anno 1484 del mese di augusto a dì 12 morì papa Sixto".to_string(),
            ],
        );
        let output = pipeline.run(&doc).unwrap();
        assert_eq!(output.blocks[0].start_line, 0);
        for pair in output.blocks.windows(2) {
            assert_eq!(pair[0].end_line, pair[1].start_line);
        }
        assert_eq!(output.blocks.last().unwrap().end_line, doc.len());
    }
}
