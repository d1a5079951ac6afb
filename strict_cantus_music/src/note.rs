// Diatonic notes.
//
// A `Note` is a letter name (`step`, 0 = C through 6 = B), a scientific
// pitch octave (4 is the middle-C octave) and an accidental of at most one
// sharp or flat. Two numberings are derived from it:
//
// - `diatonic_index`: position on the white-key staircase, step + 7 * octave.
//   Contour intervals move along this axis.
// - `semitones`: chromatic distance from C0, used for pitch comparison and
//   interval quality. `midi_pitch` is the same value shifted by one octave
//   (MIDI 60 = C4).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strict_cantus_gen::Interval;

/// Letter names, indexed by step.
pub const STEP_NAMES: [char; 7] = ['C', 'D', 'E', 'F', 'G', 'A', 'B'];

/// Semitones above C for each natural step.
const STEP_SEMITONES: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    /// 0 = C, 1 = D, ..., 6 = B.
    pub step: u8,
    pub octave: i32,
    /// -1 flat, 0 natural, 1 sharp.
    pub alteration: i8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoteParseError {
    #[error("note name too short")]
    TooShort,
    #[error("invalid note letter '{0}'")]
    BadLetter(char),
    #[error("missing octave")]
    MissingOctave,
    #[error("invalid octave '{0}'")]
    BadOctave(String),
}

impl Note {
    /// Panics in debug builds if `step` is not a letter index.
    pub const fn new(step: u8, octave: i32, alteration: i8) -> Self {
        debug_assert!(step < 7);
        Note {
            step,
            octave,
            alteration,
        }
    }

    pub const fn natural(step: u8, octave: i32) -> Self {
        Self::new(step, octave, 0)
    }

    /// The natural note at a position on the diatonic staircase. Negative
    /// indices wrap into lower octaves.
    pub fn from_diatonic_index(index: i32) -> Self {
        Note::natural(index.rem_euclid(7) as u8, index.div_euclid(7))
    }

    pub fn letter(&self) -> char {
        STEP_NAMES[self.step as usize]
    }

    pub fn diatonic_index(&self) -> i32 {
        self.step as i32 + 7 * self.octave
    }

    /// Move by a diatonic interval. The result is always natural.
    pub fn transpose(&self, interval: Interval) -> Note {
        Note::from_diatonic_index(self.diatonic_index() + interval)
    }

    pub fn semitones(&self) -> i32 {
        STEP_SEMITONES[self.step as usize] + self.alteration as i32 + 12 * self.octave
    }

    pub fn midi_pitch(&self) -> i32 {
        self.semitones() + 12
    }

    /// More than a second apart on the staircase.
    pub fn is_leap_to(&self, other: &Note) -> bool {
        (other.diatonic_index() - self.diatonic_index()).abs() > 1
    }

    pub fn is_higher_than(&self, other: &Note) -> bool {
        self.semitones() > other.semitones()
    }

    pub fn is_lower_than(&self, other: &Note) -> bool {
        self.semitones() < other.semitones()
    }

    /// Same sounding pitch, regardless of spelling.
    pub fn same_pitch(&self, other: &Note) -> bool {
        self.semitones() == other.semitones()
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let accidental = match self.alteration {
            1 => "#",
            -1 => "b",
            _ => "",
        };
        write!(f, "{}{}{}", self.letter(), accidental, self.octave)
    }
}

impl FromStr for Note {
    type Err = NoteParseError;

    /// Accepts `C4`, `c#4`, `Db4`, `G-1`. The letter may be either case;
    /// the flat sign is a lowercase `b` after the letter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(letter), Some(_)) = (chars.next(), s.chars().nth(1)) else {
            return Err(NoteParseError::TooShort);
        };
        let step = STEP_NAMES
            .iter()
            .position(|&name| name == letter.to_ascii_uppercase())
            .ok_or(NoteParseError::BadLetter(letter))?;

        let rest = chars.as_str();
        let (alteration, octave) = match rest.as_bytes().first() {
            Some(b'#') => (1, &rest[1..]),
            Some(b'b') => (-1, &rest[1..]),
            _ => (0, rest),
        };
        if octave.is_empty() {
            return Err(NoteParseError::MissingOctave);
        }
        let octave = octave
            .parse()
            .map_err(|_| NoteParseError::BadOctave(octave.to_string()))?;
        Ok(Note::new(step as u8, octave, alteration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Note::natural(0, 4).to_string(), "C4");
        assert_eq!(Note::new(0, 4, 1).to_string(), "C#4");
        assert_eq!(Note::new(1, 4, -1).to_string(), "Db4");
        assert_eq!(Note::natural(6, 3).to_string(), "B3");
    }

    #[test]
    fn test_parse() {
        assert_eq!("C4".parse::<Note>(), Ok(Note::natural(0, 4)));
        assert_eq!("c#4".parse::<Note>(), Ok(Note::new(0, 4, 1)));
        assert_eq!("Db4".parse::<Note>(), Ok(Note::new(1, 4, -1)));
        assert_eq!("bb2".parse::<Note>(), Ok(Note::new(6, 2, -1)));
        assert_eq!("B#2".parse::<Note>(), Ok(Note::new(6, 2, 1)));
        assert_eq!("G-1".parse::<Note>(), Ok(Note::natural(4, -1)));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Note>(), Err(NoteParseError::TooShort));
        assert_eq!("C".parse::<Note>(), Err(NoteParseError::TooShort));
        assert_eq!("H4".parse::<Note>(), Err(NoteParseError::BadLetter('H')));
        assert_eq!("C#".parse::<Note>(), Err(NoteParseError::MissingOctave));
        assert_eq!(
            "Cx4".parse::<Note>(),
            Err(NoteParseError::BadOctave("x4".into()))
        );
    }

    #[test]
    fn test_transpose_carries_octaves() {
        let c4 = Note::natural(0, 4);
        assert_eq!(c4.transpose(2), Note::natural(2, 4)); // E4
        assert_eq!(c4.transpose(7), Note::natural(0, 5));
        assert_eq!(c4.transpose(-1), Note::natural(6, 3)); // B3
        assert_eq!(c4.transpose(-7), Note::natural(0, 3));
        assert_eq!(c4.transpose(-8), Note::natural(6, 2));
        assert_eq!(Note::natural(6, 4).transpose(1), Note::natural(0, 5));
    }

    #[test]
    fn test_transpose_drops_accidental() {
        let f_sharp = Note::new(3, 4, 1);
        assert_eq!(f_sharp.transpose(0), Note::natural(3, 4));
    }

    #[test]
    fn test_semitones_and_midi() {
        assert_eq!(Note::natural(0, 0).semitones(), 0);
        assert_eq!(Note::natural(0, 4).midi_pitch(), 60);
        assert_eq!(Note::natural(5, 4).midi_pitch(), 69);
        assert_eq!(Note::new(4, 4, 1).semitones(), Note::new(5, 4, -1).semitones());
    }

    #[test]
    fn test_pitch_comparison() {
        let b3 = Note::natural(6, 3);
        let c4 = Note::natural(0, 4);
        let c_flat4 = Note::new(0, 4, -1);
        assert!(c4.is_higher_than(&b3));
        assert!(b3.is_lower_than(&c4));
        assert!(b3.same_pitch(&c_flat4));
        assert!(!c4.is_leap_to(&b3));
        assert!(c4.is_leap_to(&Note::natural(2, 4)));
    }
}
