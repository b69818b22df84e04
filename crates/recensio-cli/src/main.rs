//! Recensio CLI - reconstruct the primary text of scanned critical
//! editions from raw OCR dumps.
//!
//! Subcommands:
//! - `clean`: run the full pipeline on one or more dumps, writing one JSON
//!   file per chapter plus an optional quality report.
//! - `inspect`: dump the per-line classification for profile debugging.
//! - `validate`: re-check produced chapter JSONs against the boundary
//!   contract (shape, index contiguity).
//! - `report`: regenerate the quality report from produced chapters.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use recensio_core::{Category, Chapter, ChapterJson, CorpusProfile, RawDocument};
use recensio_pipeline::{Pipeline, PipelineOutput};
use recensio_quality::{analyze_document, render_json, render_markdown, QualityConfig};

#[derive(Parser)]
#[command(
    name = "recensio",
    version,
    about = "OCR text reconstruction for critical editions",
    long_about = "Separates the continuous primary text of a scanned critical edition \
                  from page headers, apparatus notes, margin numbering, and OCR junk, \
                  and emits one JSON document per reconstructed chapter."
)]
struct Cli {
    /// Increase log verbosity (repeat for more).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean one or more raw OCR dumps into chapter JSON files.
    Clean {
        /// Raw UTF-8 text dumps, one per corpus/volume.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Corpus profile (TOML).
        #[arg(short, long)]
        profile: PathBuf,

        /// Output directory; chapters land in a per-document subdirectory.
        #[arg(short, long, default_value = "out")]
        output: PathBuf,

        /// Also write a quality report next to each document's chapters.
        #[arg(long)]
        report: bool,

        /// Cap the number of documents processed in parallel.
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Dump the per-line classification of a document.
    Inspect {
        /// Raw UTF-8 text dump.
        input: PathBuf,

        /// Corpus profile (TOML).
        #[arg(short, long)]
        profile: PathBuf,

        /// Line range to show, as `start:end` (0-indexed, end exclusive).
        #[arg(short, long)]
        range: Option<String>,
    },

    /// Validate produced chapter JSONs against the boundary contract.
    Validate {
        /// Directory containing chapter_*.json files.
        dir: PathBuf,
    },

    /// Regenerate the quality report from produced chapter JSONs.
    Report {
        /// Directory containing chapter_*.json files.
        dir: PathBuf,

        /// Corpus profile (TOML), for script and siglum knowledge.
        #[arg(short, long)]
        profile: PathBuf,

        /// Output format.
        #[arg(short, long, value_enum, default_value = "md")]
        format: ReportFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    /// Markdown for humans.
    Md,
    /// JSON for triage tooling.
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    match cli.command {
        Commands::Clean {
            inputs,
            profile,
            output,
            report,
            jobs,
        } => clean(&inputs, &profile, &output, report, jobs),
        Commands::Inspect {
            input,
            profile,
            range,
        } => inspect(&input, &profile, range.as_deref()),
        Commands::Validate { dir } => validate(&dir),
        Commands::Report {
            dir,
            profile,
            format,
        } => report_cmd(&dir, &profile, format),
    }
}

/// Load and compile a corpus profile, with context on failure.
fn load_profile(path: &Path) -> Result<recensio_core::CompiledProfile> {
    CorpusProfile::from_toml_path(path)
        .with_context(|| format!("failed to load profile {}", path.display()))?
        .compile()
        .with_context(|| format!("failed to compile profile {}", path.display()))
}

fn clean(
    inputs: &[PathBuf],
    profile_path: &Path,
    output: &Path,
    with_report: bool,
    jobs: Option<usize>,
) -> Result<()> {
    let profile = load_profile(profile_path)?;
    let pipeline = Pipeline::new(profile);

    if let Some(jobs) = jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("failed to configure thread pool")?;
    }

    fs::create_dir_all(output)
        .with_context(|| format!("cannot create output directory {}", output.display()))?;

    let progress = ProgressBar::new(inputs.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("valid progress template")
            .progress_chars("#>-"),
    );

    // Documents share nothing, so the batch parallelizes cleanly.
    let results: Vec<(PathBuf, Result<PipelineOutput>)> = inputs
        .par_iter()
        .map(|input| {
            let result = RawDocument::from_path(input)
                .map_err(anyhow::Error::from)
                .and_then(|doc| pipeline.run(&doc).map_err(anyhow::Error::from));
            progress.inc(1);
            (input.clone(), result)
        })
        .collect();
    progress.finish_and_clear();

    let mut failures = 0usize;
    for (input, result) in results {
        match result {
            Ok(run) => {
                let doc_id = document_id(&input);
                let doc_dir = output.join(&doc_id);
                write_chapters(&doc_dir, &run.chapters)?;

                if with_report {
                    let qualities = analyze_document(
                        &run.chapters,
                        pipeline.profile(),
                        &QualityConfig::default(),
                    );
                    let report = render_markdown(&doc_id, &qualities);
                    fs::write(doc_dir.join("quality_report.md"), report)?;
                }

                println!(
                    "{} {}: {} chapters, {} paragraphs ({} apparatus lines, {} header lines removed)",
                    "ok".green().bold(),
                    doc_id,
                    run.chapters.len(),
                    run.stats.output_paragraphs,
                    run.stats.apparatus_lines,
                    run.stats.header_lines,
                );
                for warning in &run.warnings {
                    println!("   {} {warning}", "warn".yellow().bold());
                }
            }
            Err(error) => {
                failures += 1;
                eprintln!(
                    "{} {}: {error:#}",
                    "failed".red().bold(),
                    input.display()
                );
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} documents failed", inputs.len());
    }
    Ok(())
}

/// Derive the per-document output directory name from the input path.
fn document_id(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

/// File name for one chapter: stable, sortable, zero-padded.
fn chapter_filename(chapter: &Chapter) -> String {
    format!("chapter_{:03}.json", chapter.chapter_number)
}

/// Write each chapter as one JSON file in the boundary-contract shape.
fn write_chapters(dir: &Path, chapters: &[Chapter]) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("cannot create {}", dir.display()))?;
    for chapter in chapters {
        let path = dir.join(chapter_filename(chapter));
        fs::write(&path, chapter.to_json()?)
            .with_context(|| format!("cannot write {}", path.display()))?;
    }
    Ok(())
}

/// Parse a `start:end` line range.
fn parse_range(spec: &str) -> Result<(usize, usize)> {
    let (start, end) = spec
        .split_once(':')
        .context("range must be start:end")?;
    let start: usize = start.trim().parse().context("invalid range start")?;
    let end: usize = end.trim().parse().context("invalid range end")?;
    if end <= start {
        bail!("range end must be greater than start");
    }
    Ok((start, end))
}

fn inspect(input: &Path, profile_path: &Path, range: Option<&str>) -> Result<()> {
    let profile = load_profile(profile_path)?;
    let pipeline = Pipeline::new(profile);
    let doc = RawDocument::from_path(input)
        .with_context(|| format!("cannot read {}", input.display()))?;

    let lines = pipeline.resolve_lines(&doc);
    let (start, end) = match range {
        Some(spec) => parse_range(spec)?,
        None => (0, lines.len()),
    };

    for line in lines.iter().skip(start).take(end.saturating_sub(start)) {
        let label = line.category.to_string();
        let label = match line.category {
            Category::MainText => label.green(),
            Category::Apparatus => label.yellow(),
            Category::PageHeader => label.blue(),
            Category::MarginNumber | Category::PageNumber => label.cyan(),
            Category::Blank => label.dimmed(),
            Category::Noise => label.red(),
        };
        println!("{:>6} {label:>14} {}", line.line_number, line.text);
    }
    Ok(())
}

/// Read every chapter_*.json in a directory, sorted by file name.
fn read_chapters(dir: &Path) -> Result<Vec<(PathBuf, ChapterJson)>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("cannot read {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension().is_some_and(|e| e == "json")
                && p.file_name()
                    .is_some_and(|n| n.to_string_lossy().starts_with("chapter_"))
        })
        .collect();
    paths.sort();

    let mut chapters = Vec::with_capacity(paths.len());
    for path in paths {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let chapter: ChapterJson = serde_json::from_str(&text)
            .with_context(|| format!("{} is not a valid chapter JSON", path.display()))?;
        chapters.push((path, chapter));
    }
    Ok(chapters)
}

fn validate(dir: &Path) -> Result<()> {
    let chapters = read_chapters(dir)?;
    if chapters.is_empty() {
        bail!("no chapter_*.json files in {}", dir.display());
    }

    let mut problems = 0usize;
    for (path, chapter) in &chapters {
        let paragraphs = &chapter.source_content.paragraphs;
        if paragraphs.is_empty() {
            println!(
                "{} {}: no paragraphs",
                "bad".red().bold(),
                path.display()
            );
            problems += 1;
            continue;
        }
        let base = paragraphs[0].index;
        let gap = paragraphs
            .iter()
            .enumerate()
            .find(|(i, p)| p.index != base + i);
        if let Some((i, p)) = gap {
            println!(
                "{} {}: index gap at position {i} (found {}, expected {})",
                "bad".red().bold(),
                path.display(),
                p.index,
                base + i
            );
            problems += 1;
            continue;
        }
        if let Some(empty) = paragraphs.iter().find(|p| p.text.trim().is_empty()) {
            println!(
                "{} {}: empty paragraph at index {}",
                "bad".red().bold(),
                path.display(),
                empty.index
            );
            problems += 1;
            continue;
        }
        println!(
            "{} {}: chapter {}, {} paragraphs",
            "ok".green().bold(),
            path.display(),
            chapter.chapter_number,
            paragraphs.len()
        );
    }

    if problems > 0 {
        bail!("{problems} of {} chapter files failed validation", chapters.len());
    }
    Ok(())
}

fn report_cmd(dir: &Path, profile_path: &Path, format: ReportFormat) -> Result<()> {
    let profile = load_profile(profile_path)?;
    let chapters: Vec<Chapter> = read_chapters(dir)?
        .into_iter()
        .map(|(_, json)| Chapter::from(json))
        .collect();
    if chapters.is_empty() {
        bail!("no chapter_*.json files in {}", dir.display());
    }

    let qualities = analyze_document(&chapters, &profile, &QualityConfig::default());
    let rendered = match format {
        ReportFormat::Md => render_markdown(&document_id(dir), &qualities),
        ReportFormat::Json => render_json(&qualities)?,
    };
    println!("{rendered}");
    Ok(())
}
