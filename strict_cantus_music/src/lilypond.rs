// LilyPond sheet music output.
//
// Renders a batch of melodies as a LilyPond (.ly) file for engraving. All
// melodies share one treble staff; each is a run of whole notes closed by a
// final barline. Cadenza mode is on, so LilyPond draws no bar lines of its
// own and a melody of any length stays in one "bar".
//
// Pitches are written in absolute mode, with the note's own spelling (G#
// stays `gis`, never `aes`), and the key is the mode's tonic with its
// LilyPond modal name.

use crate::export::{ExportError, uniform_length};
use crate::mode::{Mode, Realization};
use crate::note::Note;
use std::fmt::Write;

/// Letter names in LilyPond notation, indexed by step.
const LY_STEP_NAMES: [&str; 7] = ["c", "d", "e", "f", "g", "a", "b"];

/// Octave written without marks: LilyPond's `c` is C3.
const LY_BASE_OCTAVE: i32 = 3;

/// Convert a note to a LilyPond absolute pitch string.
///
/// Each `'` raises one octave above C3, each `,` lowers one.
pub fn note_to_ly(note: &Note) -> String {
    let mut result = LY_STEP_NAMES[note.step as usize].to_string();
    match note.alteration {
        1 => result.push_str("is"),
        -1 => result.push_str("es"),
        _ => {}
    }
    let octave = note.octave - LY_BASE_OCTAVE;
    let mark = if octave > 0 { '\'' } else { ',' };
    for _ in 0..octave.unsigned_abs() {
        result.push(mark);
    }
    result
}

/// Map a mode to a LilyPond `\key` command.
pub fn mode_to_ly_key(mode: Mode) -> String {
    let tonic = LY_STEP_NAMES[mode.tonic().step as usize];
    format!("\\key {} \\{}", tonic, mode.name())
}

/// Render one melody as whole notes followed by a final barline.
fn render_melody(melody: &Realization) -> String {
    let mut out = String::new();
    for note in &melody.notes {
        if !out.is_empty() {
            out.push(' ');
        }
        let _ = write!(out, "{}1", note_to_ly(note));
    }
    out.push_str(" \\bar \"|.\"");
    out
}

/// Generate a complete LilyPond file from a batch of melodies.
pub fn to_lilypond(melodies: &[Realization], title: Option<&str>) -> Result<String, ExportError> {
    uniform_length(melodies)?;
    let mode = melodies[0].mode;
    let mut ly = String::new();

    ly.push_str("\\version \"2.24.0\"\n\n");

    let title_text = title.unwrap_or("Cantus Firmus");
    let _ = write!(
        ly,
        "\\header {{\n  title = \"{}\"\n  subtitle = \"{} on {}\"\n}}\n\n",
        title_text.replace('"', "\\\""),
        mode,
        mode.tonic().letter()
    );

    let _ = write!(
        ly,
        "cantus = \\absolute {{\n  \\clef treble\n  {}\n  \\cadenzaOn\n",
        mode_to_ly_key(mode)
    );
    for melody in melodies {
        let _ = writeln!(ly, "  {}", render_melody(melody));
    }
    ly.push_str("}\n\n");

    ly.push_str("\\score {\n");
    ly.push_str("  \\new Staff \\with { instrumentName = \"Cantus\" } { \\cantus }\n");
    ly.push_str("  \\layout { }\n");
    ly.push_str("  \\midi { }\n");
    ly.push_str("}\n");

    Ok(ly)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::realize;

    fn ly(name: &str) -> String {
        note_to_ly(&name.parse().unwrap())
    }

    #[test]
    fn test_note_to_ly_middle_c() {
        // C4 = c' in LilyPond (one octave above reference)
        assert_eq!(ly("C4"), "c'");
    }

    #[test]
    fn test_note_to_ly_reference_octave() {
        assert_eq!(ly("C3"), "c");
        assert_eq!(ly("D3"), "d");
        assert_eq!(ly("G3"), "g");
    }

    #[test]
    fn test_note_to_ly_low_octaves() {
        assert_eq!(ly("C2"), "c,");
        assert_eq!(ly("C1"), "c,,");
    }

    #[test]
    fn test_note_to_ly_high_octaves() {
        assert_eq!(ly("C5"), "c''");
        assert_eq!(ly("B6"), "b'''");
    }

    #[test]
    fn test_note_to_ly_accidentals() {
        assert_eq!(ly("C#4"), "cis'");
        assert_eq!(ly("G#4"), "gis'");
        assert_eq!(ly("Bb4"), "bes'");
        assert_eq!(ly("F#5"), "fis''");
    }

    #[test]
    fn test_mode_to_ly_key() {
        assert_eq!(mode_to_ly_key(Mode::Dorian), "\\key d \\dorian");
        assert_eq!(mode_to_ly_key(Mode::Minor), "\\key a \\minor");
        assert_eq!(mode_to_ly_key(Mode::Major), "\\key c \\major");
    }

    #[test]
    fn test_render_batch() {
        let melodies = vec![
            realize(&[1, -1], Mode::Minor),
            realize(&[-1, 1], Mode::Minor),
        ];
        let out = to_lilypond(&melodies, Some("Exercises")).unwrap();
        assert!(out.contains("title = \"Exercises\""));
        assert!(out.contains("\\key a \\minor"));
        assert!(out.contains("\\cadenzaOn"));
        assert!(out.contains("a'1 b'1 a'1 \\bar \"|.\""));
        assert!(out.contains("a'1 gis'1 a'1 \\bar \"|.\""));
        assert_eq!(out.matches("\\bar").count(), 2);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(to_lilypond(&[], None), Err(ExportError::Empty)));
    }
}
