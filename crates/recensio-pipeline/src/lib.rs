//! # Recensio Pipeline
//!
//! The document-reconstruction pipeline for OCR dumps of critical
//! editions: per-line classification, stateful apparatus-block
//! propagation, hyphenation/marker repair, paragraph assembly, and
//! chapter boundary segmentation, all driven by a corpus profile from
//! `recensio-core`.
//!
//! ```
//! use recensio_core::{CorpusProfile, RawDocument};
//! use recensio_pipeline::Pipeline;
//!
//! let profile = CorpusProfile::default().compile()?;
//! let pipeline = Pipeline::new(profile);
//! let doc = RawDocument::from_lines("demo", vec![
//!     "Dell'anno 1484 del mese di augusto morì papa Sixto quarto".to_string(),
//!     "et fu facto papa Innocentio octavo in suo loco.".to_string(),
//! ]);
//! let output = pipeline.run(&doc)?;
//! assert_eq!(output.chapters.len(), 1);
//! # Ok::<(), recensio_core::RecensioError>(())
//! ```

pub mod assembler;
pub mod blocks;
pub mod classifier;
pub mod pipeline;
pub mod propagator;
pub mod repair;
pub mod segmenter;

pub use assembler::{assemble, ParagraphSpan};
pub use blocks::build_blocks;
pub use classifier::{classify, classify_document};
pub use pipeline::{Pipeline, PipelineOutput};
pub use propagator::{propagate, step, PropagatorState};
pub use repair::{fix_hyphenation, normalize_spacing, remove_inline_markers, repair_lines};
pub use segmenter::{segment, validate_boundaries, BoundaryWarning};
