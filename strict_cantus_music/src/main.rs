// Strict-style cantus firmus generator: CLI entry point.
//
// Enumerates every contour of the requested length and leap count, realizes
// them in a mode, filters out melodies that outline augmented or diminished
// intervals, optionally draws a seeded random subset, and writes the result
// as MusicXML, LilyPond, MIDI or JSON.
//
// Usage:
//   cargo run -p strict_cantus_music --bin generate -- --length 11 --mode dorian
//     [--leaps 2,3] [--count 20] [--seed N] [--format musicxml] [--output PATH]
//     [--rules rules.json] [--parallel-depth 3]
//   cargo run -p strict_cantus_music --bin generate -- --explain 2,-1,-1,3,-1
//
// Log verbosity follows RUST_LOG (default `info`).

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use strict_cantus_gen::{ConfigError, GenerationRequest, Generator, Interval, Phrase, RuleBook};
use strict_cantus_music::export::{self, ExportError, Format};
use strict_cantus_music::mode::Mode;
use strict_cantus_music::pipeline::{realize_all, sample};
use tracing_subscriber::EnvFilter;

const MIN_NOTES: u8 = 8;
const MAX_NOTES: u8 = 16;

#[derive(Parser, Debug)]
#[command(
    name = "generate",
    about = "Enumerate strict-style cantus firmi and export them as a score"
)]
struct Cli {
    /// Number of notes per melody.
    #[arg(long, default_value_t = 11, value_parser = clap::value_parser!(u8).range(MIN_NOTES as i64..=MAX_NOTES as i64))]
    length: u8,
    /// Mode to realize in (major, dorian, phrygian, lydian, mixolydian,
    /// minor, locrian).
    #[arg(long, default_value = "dorian")]
    mode: Mode,
    /// Allowed leap counts, comma separated. Each must be at most
    /// length - 4.
    #[arg(long, value_delimiter = ',', default_values_t = [2, 3])]
    leaps: Vec<usize>,
    /// Export at most this many melodies, chosen at random.
    #[arg(long)]
    count: Option<usize>,
    /// Seed for the random selection. Defaults to the current time.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value = "musicxml")]
    format: Format,
    /// Output file. Defaults to cantus_length<L>_<mode>_leaps<k>.<ext>.
    #[arg(long)]
    output: Option<PathBuf>,
    /// JSON rule book replacing the strict-style defaults.
    #[arg(long)]
    rules: Option<PathBuf>,
    /// Split the search at this depth and explore subtrees in parallel.
    #[arg(long)]
    parallel_depth: Option<usize>,
    /// Check a comma-separated interval sequence against the rule book
    /// instead of generating.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    explain: Option<Vec<Interval>>,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let rules = match &cli.rules {
        Some(path) => RuleBook::load(path)?,
        None => RuleBook::strict_style(),
    };

    if let Some(intervals) = &cli.explain {
        explain(&rules, intervals);
        return Ok(());
    }

    let notes = cli.length as usize;
    let max_leaps = notes - 4;
    if let Some(&bad) = cli.leaps.iter().find(|&&k| k > max_leaps) {
        return Err(CliError::Usage(format!(
            "leap count {bad} is out of range for {notes} notes (0..={max_leaps})"
        )));
    }

    let request = GenerationRequest::new(notes - 1, cli.leaps.iter().copied());
    let generator = Generator::new(rules);
    let contours = match cli.parallel_depth {
        Some(depth) => generator.generate_parallel(&request, depth),
        None => generator.generate(&request),
    };
    println!("{} contours of {} notes", contours.len(), notes);

    let melodies = realize_all(&contours, cli.mode);
    println!("{} melodies in {} after filtering", melodies.len(), cli.mode);

    let seed = cli.seed.unwrap_or_else(clock_seed);
    let melodies = sample(melodies, cli.count, seed);
    if melodies.is_empty() {
        return Err(ExportError::Empty.into());
    }
    tracing::debug!(seed, selected = melodies.len(), "selected melodies");

    let path = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(notes, cli.mode, &cli.leaps, cli.format));
    export::write(cli.format, &melodies, &path)?;
    println!("Wrote {} melodies to {}", melodies.len(), path.display());
    Ok(())
}

fn explain(rules: &RuleBook, intervals: &[Interval]) {
    let phrase = Phrase::complete(intervals);
    match rules.first_violation(&phrase) {
        Some(rule) => println!("{intervals:?} breaks {}", rule.name()),
        None => println!("{intervals:?} passes every rule"),
    }
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn default_output_path(notes: usize, mode: Mode, leaps: &[usize], format: Format) -> PathBuf {
    let leaps: Vec<String> = leaps.iter().map(|k| k.to_string()).collect();
    PathBuf::from(format!(
        "cantus_length{}_{}_leaps{}.{}",
        notes,
        mode,
        leaps.join("-"),
        format.extension()
    ))
}
