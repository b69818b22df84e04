//! Script classification primitives.
//!
//! Everything downstream (line classification, boundary validation, quality
//! scoring) measures text by its script makeup. The two entry points are
//! [`is_script_char`] and [`script_ratio`]; the ratio counts alphabetic
//! characters only, so digits, punctuation, and OCR junk never dilute it.

use serde::{Deserialize, Serialize};

/// A writing-script family relevant to the supported editions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    /// Latin letters, including the Latin-1 supplement and Extended-A/B
    /// ranges (accented Italian vowels survive OCR more often than not).
    Latin,
    /// Greek, including the polytonic Extended block used by critical
    /// editions of Byzantine and classical texts.
    Greek,
    /// CJK unified ideographs, including Extension A.
    Cjk,
}

impl std::fmt::Display for Script {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Latin => write!(f, "latin"),
            Self::Greek => write!(f, "greek"),
            Self::Cjk => write!(f, "cjk"),
        }
    }
}

impl std::str::FromStr for Script {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "latin" => Ok(Self::Latin),
            "greek" => Ok(Self::Greek),
            "cjk" => Ok(Self::Cjk),
            _ => Err(format!(
                "unknown script: '{s}' (expected: latin, greek, cjk)"
            )),
        }
    }
}

/// Check whether `ch` belongs to the given script family.
///
/// Only alphabetic codepoints can belong to a script; digits and punctuation
/// always return `false`.
#[inline]
#[must_use]
pub fn is_script_char(ch: char, script: Script) -> bool {
    let code = ch as u32;
    match script {
        Script::Latin => {
            ch.is_ascii_alphabetic()
                || ((0x00C0..=0x024F).contains(&code) && ch.is_alphabetic())
        }
        Script::Greek => {
            ((0x0370..=0x03FF).contains(&code) || (0x1F00..=0x1FFF).contains(&code))
                && ch.is_alphabetic()
        }
        Script::Cjk => (0x4E00..=0x9FFF).contains(&code) || (0x3400..=0x4DBF).contains(&code),
    }
}

/// Count the characters of `text` belonging to `script`.
#[inline]
#[must_use]
pub fn count_script_chars(text: &str, script: Script) -> usize {
    text.chars().filter(|&c| is_script_char(c, script)).count()
}

/// Fraction of alphabetic characters in `text` that belong to `script`.
///
/// Returns a value in `[0.0, 1.0]`. Text with no alphabetic characters at
/// all (empty strings, bare numbers, punctuation runs) yields `0.0` rather
/// than dividing by zero.
#[must_use]
pub fn script_ratio(text: &str, script: Script) -> f64 {
    let mut in_script = 0usize;
    let mut alphabetic = 0usize;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            alphabetic += 1;
            if is_script_char(ch, script) {
                in_script += 1;
            }
        }
    }
    if alphabetic == 0 {
        return 0.0;
    }
    in_script as f64 / alphabetic as f64
}
