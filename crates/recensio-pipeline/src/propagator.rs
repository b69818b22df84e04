//! Apparatus block propagation.
//!
//! The classifier looks at one line at a time, which is not enough:
//! apparatus notes quote the very vocabulary of the main text, run across
//! blank lines, and break into short fragments under two-column layout.
//! This pass scans forward over the classified lines and extends an open
//! apparatus block until a genuine counter-signal appears, revising
//! categories in place. It is the only stage allowed to revise a prior
//! classification.
//!
//! The machine is deliberately explicit: [`step`] is a pure transition
//! function over ([`PropagatorState`], line, bounded lookahead), and
//! [`propagate`] is the scan driver. Each decision depends on the previous
//! state, so the scan is sequential per document; independent documents
//! can run in parallel.

use recensio_core::profile::CompiledProfile;
use recensio_core::{BlockKind, Category, ClassifiedLine};

/// Propagation state: inside an apparatus block or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagatorState {
    /// Not inside any block.
    OutOfBlock,
    /// Inside an apparatus block of the given kind.
    InBlock(BlockKind),
}

/// Decide the next state and the (possibly revised) category for one line.
///
/// `lookahead` is the slice of already-classified lines after the current
/// one; only the first `max_apparatus_lookahead` entries are consulted.
#[must_use]
pub fn step(
    state: PropagatorState,
    line: &ClassifiedLine,
    lookahead: &[ClassifiedLine],
    profile: &CompiledProfile,
) -> (PropagatorState, Category) {
    let category = line.category;

    // A page header closes any open block unconditionally.
    if category == Category::PageHeader {
        return (PropagatorState::OutOfBlock, category);
    }

    match state {
        PropagatorState::OutOfBlock => {
            if category == Category::Apparatus {
                (PropagatorState::InBlock(block_kind_of(&line.text)), category)
            } else {
                (state, category)
            }
        }
        PropagatorState::InBlock(kind) => match category {
            Category::Apparatus => (state, category),

            // Margin and page numbers pass through without closing the
            // block; the apparatus continues around them.
            Category::MarginNumber | Category::PageNumber => (state, category),

            Category::Blank => {
                if apparatus_resumes(lookahead, profile) {
                    (state, Category::Apparatus)
                } else {
                    (PropagatorState::OutOfBlock, category)
                }
            }

            Category::MainText => {
                if is_strong_main_text(&line.text, profile) {
                    (PropagatorState::OutOfBlock, category)
                } else {
                    // Apparatus quoting the text: keep it in the block.
                    (PropagatorState::InBlock(kind), Category::Apparatus)
                }
            }

            // Unclassifiable junk inside an apparatus block belongs to it
            // (garbled sigla, broken column fragments).
            Category::Noise => (state, Category::Apparatus),

            Category::PageHeader => unreachable!("handled above"),
        },
    }
}

/// Scan driver: apply [`step`] across the whole document, revising
/// categories in place. State is reset at document start.
pub fn propagate(lines: &mut [ClassifiedLine], profile: &CompiledProfile) {
    let max_lookahead = profile.thresholds().max_apparatus_lookahead;
    let mut state = PropagatorState::OutOfBlock;

    for i in 0..lines.len() {
        let end = (i + 1 + max_lookahead).min(lines.len());
        // Split so the lookahead borrows independently of the current line.
        let (head, tail) = lines.split_at_mut(i + 1);
        let line = &head[i];
        let lookahead = &tail[..end - i - 1];

        let (next_state, category) = step(state, line, lookahead, profile);
        head[i].category = category;
        state = next_state;
    }

    if let PropagatorState::InBlock(_) = state {
        log::debug!("document ended inside an open apparatus block");
    }
}

/// Does another apparatus signal occur in the lookahead before a strong
/// main-text or header signal?
///
/// Used to decide whether a blank line belongs to the surrounding block.
/// Weak main-text lines are skipped: they may themselves be apparatus
/// quoting the text, so they neither extend nor close the block here.
fn apparatus_resumes(lookahead: &[ClassifiedLine], profile: &CompiledProfile) -> bool {
    for next in lookahead {
        match next.category {
            Category::Apparatus => return true,
            Category::PageHeader => return false,
            Category::MainText if is_strong_main_text(&next.text, profile) => return false,
            _ => {}
        }
    }
    false
}

/// Strong main-text signal: a profile opener (dated entry, section
/// numeral), or a long line with none of the apparatus tells.
fn is_strong_main_text(text: &str, profile: &CompiledProfile) -> bool {
    let trimmed = text.trim();
    if profile.is_strong_opener(trimmed) {
        return true;
    }
    trimmed.chars().count() >= profile.thresholds().strong_text_len
        && profile.sigla_hits(trimmed) == 0
        && !profile.has_editorial_vocab(trimmed)
        && !trimmed.contains('«')
}

/// Distinguish the apparatus criticus proper from scholarly footnotes by
/// the opener shape: numbered citations `(1)` open commentary, lettered
/// citations and sigla runs open variant blocks.
fn block_kind_of(text: &str) -> BlockKind {
    let trimmed = text.trim_start();
    if trimmed.starts_with('(')
        && trimmed[1..].chars().next().is_some_and(|c| c.is_ascii_digit())
    {
        BlockKind::Commentary
    } else {
        BlockKind::Variant
    }
}
