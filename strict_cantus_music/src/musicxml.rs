// MusicXML output.
//
// One part ("Cantus Firmus"), one measure per melody, every note a whole
// note. The first measure carries the attributes (no key signature, an
// `n/1` time signature so a melody of `n` notes fills exactly one bar,
// treble clef) and a quarter = 300 tempo mark. Each measure closes with a
// final barline so the melodies read as separate exercises.
//
// The document is built as text, the same way lilypond.rs builds its
// output; the element set is small and fixed.

use crate::export::{ExportError, uniform_length};
use crate::mode::Realization;
use crate::note::Note;
use std::fmt::Write;

pub const PART_NAME: &str = "Cantus Firmus";

/// Divisions per quarter note.
const DIVISIONS: u32 = 4;

/// Length of a whole note in divisions, as written in `<duration>`.
const WHOLE_NOTE_DURATION: u32 = 4 * DIVISIONS;

pub const TEMPO: u32 = 300;

fn write_note(xml: &mut String, note: &Note) {
    xml.push_str("      <note>\n        <pitch>\n");
    let _ = writeln!(xml, "          <step>{}</step>", note.letter());
    if note.alteration != 0 {
        let _ = writeln!(xml, "          <alter>{}</alter>", note.alteration);
    }
    let _ = writeln!(xml, "          <octave>{}</octave>", note.octave);
    xml.push_str("        </pitch>\n");
    let _ = writeln!(xml, "        <duration>{WHOLE_NOTE_DURATION}</duration>");
    xml.push_str("        <type>whole</type>\n      </note>\n");
}

fn write_header_attributes(xml: &mut String, beats: usize) {
    xml.push_str("      <attributes>\n");
    let _ = writeln!(xml, "        <divisions>{DIVISIONS}</divisions>");
    xml.push_str("        <key>\n          <fifths>0</fifths>\n        </key>\n");
    let _ = writeln!(
        xml,
        "        <time>\n          <beats>{beats}</beats>\n          <beat-type>1</beat-type>\n        </time>"
    );
    xml.push_str("        <clef>\n          <sign>G</sign>\n          <line>2</line>\n        </clef>\n");
    xml.push_str("      </attributes>\n");

    xml.push_str("      <direction placement=\"above\">\n        <direction-type>\n");
    let _ = writeln!(
        xml,
        "          <metronome>\n            <beat-unit>quarter</beat-unit>\n            <per-minute>{TEMPO}</per-minute>\n          </metronome>"
    );
    xml.push_str("        </direction-type>\n");
    let _ = writeln!(xml, "        <sound tempo=\"{TEMPO}\"/>");
    xml.push_str("      </direction>\n");
}

/// Render a batch of equal-length melodies as a MusicXML document.
pub fn to_musicxml(melodies: &[Realization]) -> Result<String, ExportError> {
    let beats = uniform_length(melodies)?;
    let mut xml = String::new();

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n");
    xml.push_str(
        "<!DOCTYPE score-partwise PUBLIC \"-//Recordare//DTD MusicXML 4.0 Partwise//EN\" \
         \"http://www.musicxml.org/dtds/partwise.dtd\">\n",
    );
    xml.push_str("<score-partwise version=\"4.0\">\n");
    xml.push_str("  <part-list>\n    <score-part id=\"P1\">\n");
    let _ = writeln!(xml, "      <part-name>{PART_NAME}</part-name>");
    xml.push_str("    </score-part>\n  </part-list>\n");
    xml.push_str("  <part id=\"P1\">\n");

    for (i, melody) in melodies.iter().enumerate() {
        let _ = writeln!(xml, "    <measure number=\"{}\">", i + 1);
        if i == 0 {
            write_header_attributes(&mut xml, beats);
        }
        for note in &melody.notes {
            write_note(&mut xml, note);
        }
        xml.push_str(
            "      <barline location=\"right\">\n        <bar-style>light-heavy</bar-style>\n      </barline>\n",
        );
        xml.push_str("    </measure>\n");
    }

    xml.push_str("  </part>\n</score-partwise>\n");
    Ok(xml)
}
