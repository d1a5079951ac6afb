// Interval quality between two notes.
//
// The diatonic span (how many letter names apart) fixes the interval's
// number; the semitone distance then fixes its quality against the
// reference size of that number. Unisons, fourths, fifths and their octave
// compounds belong to the perfect family (P, with A one above and d one
// below); seconds, thirds, sixths and sevenths to the major/minor family
// (M, m = M - 1, A above M, d below m).
//
// Direction is ignored: both distances are taken as absolute values. Spans
// wider than a double octave are not classified.

use crate::note::Note;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Widest classifiable span, in diatonic steps (a double octave).
pub const MAX_SPAN: i32 = 14;

/// Perfect or major size of each simple span, in semitones.
const REFERENCE_SEMITONES: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quality {
    Perfect,
    Major,
    Minor,
    Augmented,
    Diminished,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QualityError {
    #[error("span of {span} diatonic steps is wider than a double octave")]
    UnsupportedSpan { span: i32 },
}

impl Quality {
    pub fn abbreviation(self) -> &'static str {
        match self {
            Quality::Perfect => "P",
            Quality::Major => "M",
            Quality::Minor => "m",
            Quality::Augmented => "A",
            Quality::Diminished => "d",
        }
    }

    pub fn is_augmented_or_diminished(self) -> bool {
        matches!(self, Quality::Augmented | Quality::Diminished)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

fn is_perfect_family(simple_span: i32) -> bool {
    matches!(simple_span, 0 | 3 | 4)
}

pub fn classify(a: &Note, b: &Note) -> Result<Quality, QualityError> {
    let span = (b.diatonic_index() - a.diatonic_index()).abs();
    if span > MAX_SPAN {
        return Err(QualityError::UnsupportedSpan { span });
    }
    let semitones = (b.semitones() - a.semitones()).abs();
    let simple = span % 7;
    let reference = REFERENCE_SEMITONES[simple as usize] + 12 * (span / 7);

    let quality = if is_perfect_family(simple) {
        match semitones.cmp(&reference) {
            std::cmp::Ordering::Equal => Quality::Perfect,
            std::cmp::Ordering::Greater => Quality::Augmented,
            std::cmp::Ordering::Less => Quality::Diminished,
        }
    } else if semitones == reference {
        Quality::Major
    } else if semitones == reference - 1 {
        Quality::Minor
    } else if semitones > reference {
        Quality::Augmented
    } else {
        Quality::Diminished
    };
    Ok(quality)
}
