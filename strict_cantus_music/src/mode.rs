// Modes and contour realization.
//
// A cantus firmus is written on the white keys, so each of the seven modes
// is simply the diatonic scale starting on a different letter: Major on C,
// Dorian on D, Phrygian on E, Lydian on F, Mixolydian on G, Minor on A and
// Locrian on B. Realizing a contour places its first note on the tonic in
// octave 4 and walks the intervals along the staircase.
//
// Minor is the one mode that gets accidentals afterwards. Approaching the
// tonic from below through G needs a leading tone, and the step F-G on the
// way up to A would otherwise leave an augmented second, so:
// - A G A raises the G
// - F G A raises both F and G
// A note that already carries an accidental is left alone.

use crate::note::Note;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strict_cantus_gen::Interval;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RealizeError {
    #[error("unknown mode '{0}'")]
    UnknownMode(String),
}

/// The seven diatonic modes, each defined by its tonic letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// C D E F G A B C
    Major,
    /// D E F G A B C D (minor with raised 6th)
    Dorian,
    /// E F G A B C D E (half step from 1 to 2)
    Phrygian,
    /// F G A B C D E F (raised 4th)
    Lydian,
    /// G A B C D E F G (major with lowered 7th)
    Mixolydian,
    /// A B C D E F G A
    Minor,
    /// B C D E F G A B (diminished 5th above the tonic)
    Locrian,
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::Major,
        Mode::Dorian,
        Mode::Phrygian,
        Mode::Lydian,
        Mode::Mixolydian,
        Mode::Minor,
        Mode::Locrian,
    ];

    /// Starting note of every realization.
    pub fn tonic(self) -> Note {
        let step = match self {
            Mode::Major => 0,
            Mode::Dorian => 1,
            Mode::Phrygian => 2,
            Mode::Lydian => 3,
            Mode::Mixolydian => 4,
            Mode::Minor => 5,
            Mode::Locrian => 6,
        };
        Note::natural(step, 4)
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Major => "major",
            Mode::Dorian => "dorian",
            Mode::Phrygian => "phrygian",
            Mode::Lydian => "lydian",
            Mode::Mixolydian => "mixolydian",
            Mode::Minor => "minor",
            Mode::Locrian => "locrian",
        }
    }

    /// Semitone intervals from the tonic to each scale degree.
    pub fn intervals(self) -> [u8; 7] {
        match self {
            Mode::Major => [0, 2, 4, 5, 7, 9, 11],
            Mode::Dorian => [0, 2, 3, 5, 7, 9, 10],
            Mode::Phrygian => [0, 1, 3, 5, 7, 8, 10],
            Mode::Lydian => [0, 2, 4, 6, 7, 9, 11],
            Mode::Mixolydian => [0, 2, 4, 5, 7, 9, 10],
            Mode::Minor => [0, 2, 3, 5, 7, 8, 10],
            Mode::Locrian => [0, 1, 3, 5, 6, 8, 10],
        }
    }

    /// Whether a note's pitch class belongs to the mode's natural scale.
    pub fn contains(self, note: &Note) -> bool {
        let offset = (note.semitones() - self.tonic().semitones()).rem_euclid(12) as u8;
        self.intervals().contains(&offset)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = RealizeError;

    /// Case-insensitive. `ionian` and `aeolian` are accepted as the church
    /// names of major and minor.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "major" | "ionian" => Ok(Mode::Major),
            "dorian" => Ok(Mode::Dorian),
            "phrygian" => Ok(Mode::Phrygian),
            "lydian" => Ok(Mode::Lydian),
            "mixolydian" => Ok(Mode::Mixolydian),
            "minor" | "aeolian" => Ok(Mode::Minor),
            "locrian" => Ok(Mode::Locrian),
            _ => Err(RealizeError::UnknownMode(s.to_string())),
        }
    }
}

/// A contour turned into concrete notes in one mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Realization {
    pub mode: Mode,
    pub intervals: Vec<Interval>,
    pub notes: Vec<Note>,
}

impl Realization {
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl fmt::Display for Realization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, note) in self.notes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{note}")?;
        }
        Ok(())
    }
}

/// Realize a contour: `intervals.len() + 1` notes starting on the tonic.
pub fn realize(intervals: &[Interval], mode: Mode) -> Realization {
    let mut notes = Vec::with_capacity(intervals.len() + 1);
    let mut current = mode.tonic();
    notes.push(current);
    for &interval in intervals {
        current = current.transpose(interval);
        notes.push(current);
    }
    if mode == Mode::Minor {
        raise_minor_degrees(&mut notes);
    }
    Realization {
        mode,
        intervals: intervals.to_vec(),
        notes,
    }
}

/// `realize` with the mode given by name.
pub fn realize_named(intervals: &[Interval], mode: &str) -> Result<Realization, RealizeError> {
    Ok(realize(intervals, mode.parse()?))
}

const F: u8 = 3;
const G: u8 = 4;
const A: u8 = 5;

fn raise_minor_degrees(notes: &mut [Note]) {
    for i in 1..notes.len().saturating_sub(1) {
        let (prev, current, next) = (notes[i - 1].step, notes[i].step, notes[i + 1].step);
        if current != G || next != A {
            continue;
        }
        if prev == A || prev == F {
            sharpen(&mut notes[i]);
        }
        if prev == F {
            sharpen(&mut notes[i - 1]);
        }
    }
}

fn sharpen(note: &mut Note) {
    if note.alteration == 0 {
        note.alteration = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(r: &Realization) -> Vec<String> {
        r.notes.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_tonics() {
        let tonics: Vec<String> = Mode::ALL.iter().map(|m| m.tonic().to_string()).collect();
        assert_eq!(tonics, ["C4", "D4", "E4", "F4", "G4", "A4", "B4"]);
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("Dorian".parse::<Mode>(), Ok(Mode::Dorian));
        assert_eq!("MINOR".parse::<Mode>(), Ok(Mode::Minor));
        assert_eq!("aeolian".parse::<Mode>(), Ok(Mode::Minor));
        assert_eq!(
            "hypodorian".parse::<Mode>(),
            Err(RealizeError::UnknownMode("hypodorian".into()))
        );
        for mode in Mode::ALL {
            assert_eq!(mode.name().parse::<Mode>(), Ok(mode));
        }
    }

    #[test]
    fn test_realize_fux_in_dorian() {
        let fux = [2, -1, -1, 3, -1, 2, -1, -1, -1, -1];
        let r = realize(&fux, Mode::Dorian);
        assert_eq!(r.len(), 11);
        assert_eq!(
            names(&r),
            ["D4", "F4", "E4", "D4", "G4", "F4", "A4", "G4", "F4", "E4", "D4"]
        );
        assert!(r.notes.iter().all(|n| Mode::Dorian.contains(n)));
    }

    #[test]
    fn test_realize_crosses_octave() {
        let r = realize(&[-1, -1, 3, -1], Mode::Major);
        assert_eq!(names(&r), ["C4", "B3", "A3", "D4", "C4"]);
    }

    #[test]
    fn test_realize_empty_contour() {
        let r = realize(&[], Mode::Lydian);
        assert_eq!(names(&r), ["F4"]);
    }

    #[test]
    fn test_minor_leading_tone() {
        // A G A
        let r = realize(&[-1, 1], Mode::Minor);
        assert_eq!(names(&r), ["A4", "G#4", "A4"]);
    }

    #[test]
    fn test_minor_raised_sixth_and_seventh() {
        // A B C D E F G A rising through F G A.
        let r = realize(&[1, 1, 1, 1, 1, 1, 1], Mode::Minor);
        assert_eq!(
            names(&r),
            ["A4", "B4", "C5", "D5", "E5", "F#5", "G#5", "A5"]
        );
    }

    #[test]
    fn test_minor_leaves_other_lines_natural() {
        // A G F G: no G-A resolution.
        let r = realize(&[-1, -1, 1], Mode::Minor);
        assert!(r.notes.iter().all(|n| n.alteration == 0));
        // Descending A G F keeps the natural minor.
        let r = realize(&[2, -1, -1, -1, -1], Mode::Minor);
        assert_eq!(names(&r), ["A4", "C5", "B4", "A4", "G4", "F4"]);
    }

    #[test]
    fn test_other_modes_stay_natural() {
        let r = realize(&[-2, 1, 1], Mode::Dorian);
        // D B C D: no raising outside minor.
        assert!(r.notes.iter().all(|n| n.alteration == 0));
    }

    #[test]
    fn test_realize_named() {
        let r = realize_named(&[1, -1], "phrygian").unwrap();
        assert_eq!(names(&r), ["E4", "F4", "E4"]);
        assert!(realize_named(&[1], "chromatic").is_err());
    }

    #[test]
    fn test_display_realization() {
        let r = realize(&[-1, 1], Mode::Minor);
        assert_eq!(r.to_string(), "A4 G#4 A4");
    }
}
