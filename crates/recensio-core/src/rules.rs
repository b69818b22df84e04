//! Priority-ordered destructive text transforms.
//!
//! OCR dumps of critical editions carry several layers of junk inside
//! otherwise-good lines: manuscript page-break bars, inline folio
//! references, garbled footnote call markers, trailing margin line numbers,
//! and running headers that leaked into body text. Each removal is a
//! [`PatternRule`]; a [`RuleSet`] applies them in ascending priority so that
//! header/marker removal always precedes whitespace normalization.
//!
//! The whole set must be idempotent: applying it twice to already-clean
//! text yields no further change. Every rule added here should preserve
//! that contract.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{RecensioError, Result};

/// Declarative form of a rewrite rule, as it appears in a corpus profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Stable identifier, used in logs and error messages.
    pub name: String,
    /// Regex pattern (compiled at profile load).
    pub pattern: String,
    /// Replacement text; `${n}` refers to capture groups.
    #[serde(default)]
    pub replacement: String,
    /// Application order. Lower priorities run first; whitespace cleanup
    /// belongs at the very end.
    pub priority: u32,
}

/// A compiled rewrite rule.
#[derive(Debug, Clone)]
pub struct PatternRule {
    /// Stable identifier.
    pub name: String,
    /// Compiled pattern.
    pub regex: Regex,
    /// Replacement text.
    pub replacement: String,
    /// Application order.
    pub priority: u32,
}

impl PatternRule {
    /// Compile a rule from its declarative spec.
    pub fn compile(spec: &RuleSpec) -> Result<Self> {
        let regex = Regex::new(&spec.pattern).map_err(|source| RecensioError::PatternError {
            name: spec.name.clone(),
            source,
        })?;
        Ok(Self {
            name: spec.name.clone(),
            regex,
            replacement: spec.replacement.clone(),
            priority: spec.priority,
        })
    }

    /// Apply this rule alone to `text`, to a fixpoint.
    ///
    /// One `replace_all` pass misses adjacent occurrences whose context
    /// characters were consumed by the previous match ("x(a)(b)"), so the
    /// rule is re-applied until the text stops changing. The iteration cap
    /// guards against profile rules whose replacement re-creates their own
    /// pattern.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        const MAX_PASSES: usize = 32;

        let mut current = text.to_string();
        for _ in 0..MAX_PASSES {
            let next = self
                .regex
                .replace_all(&current, self.replacement.as_str())
                .into_owned();
            if next == current {
                return current;
            }
            current = next;
        }
        log::debug!("rule '{}' did not stabilize in {MAX_PASSES} passes", self.name);
        current
    }
}

/// An ordered collection of rewrite rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<PatternRule>,
}

impl RuleSet {
    /// Compile a rule set from declarative specs, sorting by priority.
    ///
    /// The sort is stable, so rules sharing a priority keep their spec
    /// order.
    pub fn compile(specs: &[RuleSpec]) -> Result<Self> {
        let mut rules = specs
            .iter()
            .map(PatternRule::compile)
            .collect::<Result<Vec<_>>>()?;
        rules.sort_by_key(|r| r.priority);
        Ok(Self { rules })
    }

    /// Apply every rule in ascending priority order.
    ///
    /// Each rule sees the output of the rules before it; the ordering is
    /// load-bearing (marker removal leaves doubled spaces that the final
    /// whitespace rules clean up).
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for rule in &self.rules {
            out = rule.apply(&out);
        }
        out
    }

    /// Number of rules in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over the compiled rules in application order.
    pub fn iter(&self) -> impl Iterator<Item = &PatternRule> {
        self.rules.iter()
    }
}

/// The corpus-independent cleanup catalogue.
///
/// Covers the marker families that every supported edition shares. Corpus
/// profiles extend this with their own signatures (header text, siglum
/// shapes) at intermediate priorities.
///
/// Priorities are spaced by tens so profiles can interleave without
/// renumbering. 900+ is reserved for whitespace normalization, which must
/// run after everything else.
#[must_use]
pub fn default_cleanup_specs() -> Vec<RuleSpec> {
    let spec = |name: &str, pattern: &str, replacement: &str, priority: u32| RuleSpec {
        name: name.to_string(),
        pattern: pattern.to_string(),
        replacement: replacement.to_string(),
        priority,
    };

    vec![
        // Manuscript page-break bars, then stray single bars left by OCR.
        spec("strip_page_break_bars", r"\|\|", "", 10),
        spec("strip_stray_bars", r"\s+\|\s+", " ", 11),
        spec("strip_trailing_bar", r"\s+\|$", "", 12),
        // Inline folio references: "c. 37 A", "e. 157 a", "e- 40 b".
        spec("strip_folio_refs", r"\b[ec][.\-]?\s*\d{1,3}\s*[ABab]\b", "", 20),
        // Garbled footnote call markers: parenthesized sigil clusters and
        // caret runs in their many OCR renderings.
        spec(
            "strip_paren_markers",
            r"\s*[<(]['\^°=§*•~+]{1,4}[)>\\]",
            " ",
            30,
        ),
        spec("strip_caret_runs", r"\s+\^{1,4}[\\)]?", " ", 31),
        spec("strip_caret_before_punct", r"\^{1,4}([;,.])", "${1}", 32),
        spec("strip_dot_caret", r"\.\^", ".", 33),
        // Inline letter citations after text: "word (a) next".
        spec("strip_inline_letter_marks", r"(\S)\s*\(([a-z])\)\s*", "${1} ", 40),
        // Inline numeric footnote calls after text: "word (12) next".
        spec("strip_inline_number_marks", r"(\S)\s*\((\d{1,2})\)\s*", "${1} ", 41),
        // The isolated "W" the OCR makes of a raised footnote sigil.
        spec("strip_w_before_punct", r"(\w)\s*W\s*([.,;:])", "${1}${2}", 50),
        spec("strip_w_between_words", r"(\w) W ([[:lower:],;])", "${1} ${2}", 51),
        spec("strip_trailing_w", r"\s+W\s*$", "", 52),
        // Trailing margin line numbers, exact and garbled spellings.
        spec(
            "strip_trailing_line_numbers",
            r"\s+(5|10|15|20|25|30|IO|ìo|ij|I5|2o|3o)\s*$",
            "",
            60,
        ),
        // Whitespace normalization: always last.
        spec("collapse_spaces", r"  +", " ", 900),
        spec("strip_space_before_punct", r" ([,;.!?:])", "${1}", 910),
        spec("trim_trailing_space", r"\s+$", "", 920),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_set() -> RuleSet {
        RuleSet::compile(&default_cleanup_specs()).unwrap()
    }

    #[test]
    fn test_compile_rejects_bad_pattern() {
        let specs = vec![RuleSpec {
            name: "broken".to_string(),
            pattern: "(".to_string(),
            replacement: String::new(),
            priority: 1,
        }];
        match RuleSet::compile(&specs) {
            Err(RecensioError::PatternError { name, .. }) => assert_eq!(name, "broken"),
            other => panic!("expected PatternError, got {other:?}"),
        }
    }

    #[test]
    fn test_priority_order_is_respected() {
        // A rule that rewrites "b" to "c" must see the output of the rule
        // that rewrites "a" to "b".
        let specs = vec![
            RuleSpec {
                name: "second".to_string(),
                pattern: "b".to_string(),
                replacement: "c".to_string(),
                priority: 2,
            },
            RuleSpec {
                name: "first".to_string(),
                pattern: "a".to_string(),
                replacement: "b".to_string(),
                priority: 1,
            },
        ];
        let set = RuleSet::compile(&specs).unwrap();
        assert_eq!(set.apply("a"), "c");
    }

    #[test]
    fn test_page_break_bars_removed() {
        let set = default_set();
        assert_eq!(set.apply("in urbe || venit"), "in urbe venit");
    }

    #[test]
    fn test_folio_refs_removed() {
        let set = default_set();
        assert_eq!(set.apply("dixit c. 37 A quod"), "dixit quod");
        assert_eq!(set.apply("venit e. 157 a papa"), "venit papa");
    }

    #[test]
    fn test_inline_letter_marks_removed() {
        let set = default_set();
        assert_eq!(set.apply("fuit (a) mortuus"), "fuit mortuus");
        // Line-initial (a) is an apparatus opener, not an inline marker:
        // the rule requires preceding text.
        assert_eq!(set.apply("(a) Cf. codices"), "(a) Cf. codices");
    }

    #[test]
    fn test_w_marker_removed() {
        let set = default_set();
        assert_eq!(set.apply("affirmatum fuitW."), "affirmatum fuit.");
        assert_eq!(set.apply("papa W et"), "papa et");
    }

    #[test]
    fn test_trailing_line_numbers_removed() {
        let set = default_set();
        assert_eq!(set.apply("et mortuus est 15"), "et mortuus est");
        assert_eq!(set.apply("in conclavi IO"), "in conclavi");
        // A year is not a margin number.
        assert_eq!(set.apply("Dell'anno 1484"), "Dell'anno 1484");
    }

    #[test]
    fn test_whitespace_runs_last() {
        let set = default_set();
        // Marker removal leaves a doubled space; collapse fixes it, and the
        // space before the comma is repaired after that.
        assert_eq!(set.apply("fuit (b) , et"), "fuit, et");
    }

    #[test]
    fn test_idempotent_on_clean_text() {
        let set = default_set();
        let clean = "Dell'anno 1484 del mese di augusto, papa Sixto morì.";
        assert_eq!(set.apply(clean), clean);
    }

    #[test]
    fn test_idempotent_after_one_application() {
        let set = default_set();
        let dirty = "et dixit (a) quod || lo papa W , venit c. 37 A in urbe  15";
        let once = set.apply(dirty);
        let twice = set.apply(&once);
        assert_eq!(once, twice);
    }
}
