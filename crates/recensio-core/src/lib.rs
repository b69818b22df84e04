//! # Recensio Core
//!
//! Core types for reconstructing the continuous primary text of scanned
//! critical editions from raw OCR dumps. The OCR output interleaves the
//! text proper with running headers, critical-apparatus notes, margin
//! line numbers, page numbers, and hyphenation artifacts; this crate
//! provides the vocabulary the cleaning pipeline speaks:
//!
//! - [`script`] — character-class predicates and script ratios for Latin,
//!   polytonic Greek, and CJK text.
//! - [`rules`] — priority-ordered destructive rewrite rules with an
//!   idempotence contract.
//! - [`profile`] — declarative per-corpus configuration (siglum alphabets,
//!   header signatures, thresholds, boundary tables) so one pipeline
//!   serves every edition.
//! - [`document`] — raw documents, classified lines, blocks, paragraphs,
//!   chapters, and the chapter JSON boundary contract.
//! - [`error`] — the crate-wide error type.
//!
//! ## Quick start
//!
//! ```
//! use recensio_core::{CorpusProfile, RawDocument};
//!
//! let profile = CorpusProfile::default().compile()?;
//! let doc = RawDocument::from_lines("demo", vec![
//!     "Dell'anno 1484 del mese di augusto".to_string(),
//! ]);
//! assert_eq!(doc.len(), 1);
//! assert!(!profile.is_header(&doc.lines[0]));
//! # Ok::<(), recensio_core::RecensioError>(())
//! ```

pub mod document;
pub mod error;
pub mod profile;
pub mod rules;
pub mod script;

pub use document::{
    BlockKind, Category, Chapter, ChapterJson, ClassifiedLine, CleaningStats, Paragraph,
    RawDocument, SourceContent, TextBlock,
};
pub use error::{RecensioError, Result};
pub use profile::{
    BoundaryConfidence, BoundaryConfig, CompiledProfile, CorpusProfile, FragmentBias,
    MarginConfig, StaticBoundary, Thresholds,
};
pub use rules::{default_cleanup_specs, PatternRule, RuleSet, RuleSpec};
pub use script::{count_script_chars, is_script_char, script_ratio, Script};
