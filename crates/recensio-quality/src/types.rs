//! Types for quality assessment of reconstructed text.

use serde::{Deserialize, Serialize};

/// Kind of defect found in a reconstructed paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Leftover apparatus material: sigla runs or editorial vocabulary.
    ApparatusResidue,
    /// The paragraph's target-script ratio is suspiciously low.
    LowScriptRatio,
    /// The paragraph is too short to be a plausible unit of text.
    TooShort,
    /// The paragraph starts or ends like a broken fragment.
    Fragment,
}

impl std::fmt::Display for IssueKind {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApparatusResidue => write!(f, "apparatus_residue"),
            Self::LowScriptRatio => write!(f, "low_script_ratio"),
            Self::TooShort => write!(f, "too_short"),
            Self::Fragment => write!(f, "fragment"),
        }
    }
}

/// One finding, with a human-readable detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// What kind of defect this is.
    pub kind: IssueKind,
    /// Description for the report ("low Greek ratio: 42.0%").
    pub detail: String,
}

/// Letter grade on the fixed score ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    /// 90 and above.
    A,
    /// 85–90.
    AMinus,
    /// 80–85.
    BPlus,
    /// 75–80.
    B,
    /// 70–75.
    BMinus,
    /// 65–70.
    CPlus,
    /// 60–65.
    C,
    /// 55–60.
    CMinus,
    /// 50–55.
    DPlus,
    /// 45–50.
    D,
    /// Below 45.
    F,
}

impl Grade {
    /// Map a 0–100 score onto the ladder.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::A
        } else if score >= 85.0 {
            Self::AMinus
        } else if score >= 80.0 {
            Self::BPlus
        } else if score >= 75.0 {
            Self::B
        } else if score >= 70.0 {
            Self::BMinus
        } else if score >= 65.0 {
            Self::CPlus
        } else if score >= 60.0 {
            Self::C
        } else if score >= 55.0 {
            Self::CMinus
        } else if score >= 50.0 {
            Self::DPlus
        } else if score >= 45.0 {
            Self::D
        } else {
            Self::F
        }
    }
}

impl std::fmt::Display for Grade {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::AMinus => write!(f, "A-"),
            Self::BPlus => write!(f, "B+"),
            Self::B => write!(f, "B"),
            Self::BMinus => write!(f, "B-"),
            Self::CPlus => write!(f, "C+"),
            Self::C => write!(f, "C"),
            Self::CMinus => write!(f, "C-"),
            Self::DPlus => write!(f, "D+"),
            Self::D => write!(f, "D"),
            Self::F => write!(f, "F"),
        }
    }
}

impl std::str::FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "A" => Ok(Self::A),
            "A-" => Ok(Self::AMinus),
            "B+" => Ok(Self::BPlus),
            "B" => Ok(Self::B),
            "B-" => Ok(Self::BMinus),
            "C+" => Ok(Self::CPlus),
            "C" => Ok(Self::C),
            "C-" => Ok(Self::CMinus),
            "D+" => Ok(Self::DPlus),
            "D" => Ok(Self::D),
            "F" => Ok(Self::F),
            _ => Err(format!("unknown grade: '{s}'")),
        }
    }
}

/// Quality metrics for one paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphQuality {
    /// Paragraph index within its chapter.
    pub index: usize,
    /// Character length of the paragraph.
    pub length: usize,
    /// Target-script ratio of the paragraph text.
    pub script_ratio: f64,
    /// Defects found.
    pub issues: Vec<Issue>,
    /// Score in [0, 100].
    pub score: f64,
}

impl ParagraphQuality {
    /// Whether this paragraph needs review.
    #[inline]
    #[must_use]
    pub fn is_problematic(&self) -> bool {
        !self.issues.is_empty() || self.score < 70.0
    }
}

/// Quality metrics for one chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterQuality {
    /// Chapter number.
    pub chapter_number: i32,
    /// Paragraph count.
    pub total_paragraphs: usize,
    /// Total character count across paragraphs.
    pub total_characters: usize,
    /// Mean target-script ratio.
    pub average_script_ratio: f64,
    /// Flagged paragraphs (issues present or score below 70).
    pub problem_paragraphs: Vec<ParagraphQuality>,
    /// Aggregate score in [0, 100].
    pub score: f64,
    /// Letter grade for the aggregate score.
    pub grade: Grade,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_grade_ladder() {
        assert_eq!(Grade::from_score(100.0), Grade::A);
        assert_eq!(Grade::from_score(90.0), Grade::A);
        assert_eq!(Grade::from_score(89.9), Grade::AMinus);
        assert_eq!(Grade::from_score(77.0), Grade::B);
        assert_eq!(Grade::from_score(45.0), Grade::D);
        assert_eq!(Grade::from_score(44.9), Grade::F);
        assert_eq!(Grade::from_score(0.0), Grade::F);
    }

    #[test]
    fn test_grade_roundtrip() {
        for grade in [
            Grade::A,
            Grade::AMinus,
            Grade::BPlus,
            Grade::B,
            Grade::BMinus,
            Grade::CPlus,
            Grade::C,
            Grade::CMinus,
            Grade::DPlus,
            Grade::D,
            Grade::F,
        ] {
            let s = grade.to_string();
            assert_eq!(Grade::from_str(&s).unwrap(), grade, "roundtrip failed for {s}");
        }
        assert!(Grade::from_str("E").is_err());
    }

    #[test]
    fn test_grade_ordering_follows_ladder() {
        // Ord derives from declaration order: A is best.
        assert!(Grade::A < Grade::B);
        assert!(Grade::DPlus < Grade::F);
    }

    #[test]
    fn test_problematic_paragraph() {
        let clean = ParagraphQuality {
            index: 0,
            length: 200,
            script_ratio: 0.95,
            issues: vec![],
            score: 100.0,
        };
        assert!(!clean.is_problematic());

        let flagged = ParagraphQuality {
            issues: vec![Issue {
                kind: IssueKind::ApparatusResidue,
                detail: "sigla run".to_string(),
            }],
            score: 90.0,
            ..clean
        };
        assert!(flagged.is_problematic());
    }
}
