// Strict-style cantus firmus music library.
//
// Turns the abstract contours produced by `strict_cantus_gen` into concrete
// melodies and writes them out as sheet music or audio. A contour starts on
// the tonic of the chosen mode; each interval moves that many scale degrees
// on the white keys, with the raised sixth and seventh degrees of melodic
// minor applied afterwards where the line calls for them.
//
// Architecture:
// - note.rs: diatonic note (step, octave, accidental), parsing and pitch math
// - mode.rs: the seven modes with their tonics; contour realization
// - quality.rs: interval quality (P, M, m, A, d) between two notes
// - filter.rs: rejects melodies that outline augmented or diminished
//   intervals
// - pipeline.rs: realize + filter a batch, random sub-selection
// - export.rs: output formats, shared validation, JSON
// - musicxml.rs / lilypond.rs / midi.rs: score writers
//
// The `generate` binary (main.rs) wires the pipeline behind a CLI.

pub mod export;
pub mod filter;
pub mod lilypond;
pub mod midi;
pub mod mode;
pub mod musicxml;
pub mod note;
pub mod pipeline;
pub mod quality;

pub use export::{ExportError, Format};
pub use mode::{Mode, Realization, RealizeError};
pub use note::{Note, NoteParseError};
pub use quality::{Quality, QualityError};
