// Output formats and the checks every writer shares.
//
// All formats put the selected melodies one after another in a single
// score, so they need at least one melody and every melody must have the
// same number of notes (one measure of `n` whole notes per melody).
//
// JSON output is the realized batch as-is (mode, source intervals and
// notes per melody), for downstream tools rather than engraving.

use crate::mode::Realization;
use crate::{lilypond, midi, musicxml};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no melodies to export")]
    Empty,
    #[error("melody {index} has {len} notes, expected {expected}")]
    RaggedLengths {
        index: usize,
        len: usize,
        expected: usize,
    },
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("MIDI export failed: {0}")]
    Midi(String),
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    MusicXml,
    LilyPond,
    Midi,
    Json,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::MusicXml, Format::LilyPond, Format::Midi, Format::Json];

    pub fn extension(self) -> &'static str {
        match self {
            Format::MusicXml => "musicxml",
            Format::LilyPond => "ly",
            Format::Midi => "mid",
            Format::Json => "json",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Format::MusicXml => "musicxml",
            Format::LilyPond => "lilypond",
            Format::Midi => "midi",
            Format::Json => "json",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "musicxml" | "xml" => Ok(Format::MusicXml),
            "lilypond" | "ly" => Ok(Format::LilyPond),
            "midi" | "mid" => Ok(Format::Midi),
            "json" => Ok(Format::Json),
            _ => Err(format!(
                "unknown format '{s}' (expected musicxml, lilypond, midi or json)"
            )),
        }
    }
}

/// Common note count of a non-empty, uniform batch.
pub fn uniform_length(melodies: &[Realization]) -> Result<usize, ExportError> {
    let first = melodies.first().ok_or(ExportError::Empty)?;
    let expected = first.len();
    for (index, melody) in melodies.iter().enumerate() {
        if melody.len() != expected {
            return Err(ExportError::RaggedLengths {
                index,
                len: melody.len(),
                expected,
            });
        }
    }
    Ok(expected)
}

pub fn to_json(melodies: &[Realization]) -> Result<String, ExportError> {
    uniform_length(melodies)?;
    Ok(serde_json::to_string_pretty(melodies)?)
}

/// Encode a batch in `format`.
pub fn render(format: Format, melodies: &[Realization]) -> Result<Vec<u8>, ExportError> {
    let bytes = match format {
        Format::MusicXml => musicxml::to_musicxml(melodies)?.into_bytes(),
        Format::LilyPond => lilypond::to_lilypond(melodies, None)?.into_bytes(),
        Format::Midi => midi::to_midi_bytes(melodies)?,
        Format::Json => to_json(melodies)?.into_bytes(),
    };
    Ok(bytes)
}

/// Encode a batch and write it to `path`.
pub fn write(format: Format, melodies: &[Realization], path: &Path) -> Result<(), ExportError> {
    let bytes = render(format, melodies)?;
    std::fs::write(path, &bytes)?;
    tracing::info!(
        format = format.name(),
        melodies = melodies.len(),
        bytes = bytes.len(),
        path = %path.display(),
        "wrote score"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::{Mode, realize};

    #[test]
    fn test_uniform_length() {
        assert!(matches!(uniform_length(&[]), Err(ExportError::Empty)));
        let a = realize(&[1, -1], Mode::Major);
        let b = realize(&[2, -1, -1], Mode::Major);
        assert_eq!(uniform_length(&[a.clone(), a.clone()]).unwrap(), 3);
        match uniform_length(&[a.clone(), a, b]) {
            Err(ExportError::RaggedLengths {
                index,
                len,
                expected,
            }) => assert_eq!((index, len, expected), (2, 4, 3)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_format_names() {
        for format in Format::ALL {
            assert_eq!(format.name().parse::<Format>(), Ok(format));
        }
        assert_eq!("ly".parse::<Format>(), Ok(Format::LilyPond));
        assert!("pdf".parse::<Format>().is_err());
        assert_eq!(Format::Midi.extension(), "mid");
    }

    #[test]
    fn test_json_round_trip() {
        let melodies = vec![realize(&[-1, 1], Mode::Minor)];
        let json = to_json(&melodies).unwrap();
        let back: Vec<Realization> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, melodies);
        assert!(json.contains("\"minor\""));
    }

    #[test]
    fn test_render_rejects_empty_in_every_format() {
        for format in Format::ALL {
            assert!(matches!(render(format, &[]), Err(ExportError::Empty)));
        }
    }
}
