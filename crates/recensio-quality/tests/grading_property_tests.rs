//! Property-based tests for the grading model: scores must never rise as
//! contamination is injected, and the ladder must be total.

use proptest::prelude::*;
use recensio_quality::{analyze_chapter, Grade, QualityConfig};

use recensio_core::profile::CorpusProfile;
use recensio_core::{Chapter, Paragraph};

const CLEAN: &str =
    "Et lo papa venne in della chiesa de Santo Pietro et tutto lo popolo de Roma con lui insieme.";
const DIRTY: &str = "R V om. cod. frammento rotto";

fn chapter_with_dirty(total: usize, dirty: usize) -> Chapter {
    let paragraphs = (0..total)
        .map(|i| Paragraph {
            index: i,
            text: if i < dirty { DIRTY } else { CLEAN }.to_string(),
        })
        .collect();
    Chapter {
        chapter_number: 1,
        title: "Test".to_string(),
        paragraphs,
    }
}

/// Property: injecting more contaminated paragraphs into a fixed-size
/// chapter never raises its score.
#[test]
fn proptest_chapter_score_monotone_in_contamination() {
    let profile = CorpusProfile::default().compile().unwrap();
    let config = QualityConfig::default();

    proptest!(|(total in 4usize..30, step in 1usize..4)| {
        let mut previous = f64::INFINITY;
        let mut dirty = 0usize;
        while dirty <= total {
            let quality = analyze_chapter(&chapter_with_dirty(total, dirty), &profile, &config);
            prop_assert!(
                quality.score <= previous + 1e-9,
                "score rose from {previous} to {} at {dirty}/{total} dirty",
                quality.score
            );
            previous = quality.score;
            dirty += step;
        }
    });
}

/// Property: every finite score maps onto exactly one grade, and the
/// mapping is monotone.
#[test]
fn proptest_grade_ladder_total_and_monotone() {
    proptest!(|(a in 0.0f64..100.0, b in 0.0f64..100.0)| {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low_grade = Grade::from_score(low);
        let high_grade = Grade::from_score(high);
        // Ord on Grade puts A first, so better scores compare smaller.
        prop_assert!(high_grade <= low_grade);
    });
}
