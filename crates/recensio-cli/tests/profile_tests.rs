//! The shipped corpus profiles must always load and compile: a profile
//! that fails regex compilation is a release defect, not a runtime
//! surprise.

use recensio_core::profile::{BoundaryConfig, CorpusProfile};
use recensio_core::Script;

fn load(name: &str) -> CorpusProfile {
    let path = format!("{}/../../profiles/{name}", env!("CARGO_MANIFEST_DIR"));
    CorpusProfile::from_toml_path(&path)
        .unwrap_or_else(|e| panic!("profile {name} failed to load: {e}"))
}

#[test]
fn test_diarium_profile_compiles() {
    let profile = load("diarium.toml");
    assert_eq!(profile.target_script, Script::Latin);
    let compiled = profile.compile().unwrap();

    assert!(compiled.is_header("160 STEPHANI INFESSURAE"));
    assert!(compiled.is_header("[1484] DIARIA RERUM ROMANARUM. 155"));
    assert!(compiled.is_header("XVI O. TOMMASINI"));
    assert!(compiled.is_strong_opener("Dell'anno 1484 del mese di augusto"));
    assert!(compiled.is_strong_opener("A dì 29 del dicto mese"));
    assert!(!compiled.is_strong_opener("et lo papa venne"));
    assert_eq!(compiled.sigla_hits("O' V Perosia C R S Peroscia"), 5);
}

#[test]
fn test_commentarii_profile_compiles() {
    let profile = load("commentarii.toml");
    assert_eq!(profile.target_script, Script::Greek);
    let compiled = profile.compile().unwrap();

    // The garbled rhapsody header must be caught, with the book letter
    // recoverable from the capture group.
    let marker = compiled.boundary_marker().expect("markers strategy");
    let caps = marker
        .captures("ΡΑΨΩΙΔΙΑ Α. Vs. 1—20. 284")
        .expect("garbled header should match");
    assert_eq!(caps.get(1).unwrap().as_str(), "Α");

    let caps = marker
        .captures("418 ΡΑΨΩΙΔΙΑ Λ. 297—307.")
        .expect("mid-line header should match");
    assert_eq!(caps.get(1).unwrap().as_str(), "Λ");

    assert!(compiled.is_strong_opener("Ὅτι ἐν τῇ ῥαψῳδίᾳ ταύτῃ"));
}

#[test]
fn test_epitome_profile_compiles() {
    let profile = load("epitome.toml");
    let compiled = profile.compile().unwrap();

    let BoundaryConfig::Static {
        chapters,
        marker_pattern,
        ..
    } = &profile.boundaries
    else {
        panic!("epitome profile should use the static strategy");
    };
    assert_eq!(chapters.len(), 6);
    assert_eq!(chapters[0].chapter_number, 13);
    assert!(marker_pattern.is_some());

    // Latin apparatus vocabulary of the Bonn edition.
    assert!(compiled.has_editorial_vocab("2 τοὺς ἄρτους] om. A, ita codex"));
    assert!(compiled.sigla_hits("πεδιάδας A. ὠνομάζοντο B, C") >= 3);
}
