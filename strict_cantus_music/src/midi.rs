// MIDI output for melody batches.
//
// Writes a Standard MIDI File (SMF Format 1): track 0 holds the tempo, track
// 1 the melodies. Every note lasts a whole note; a whole-note rest separates
// one melody from the next so they can be told apart by ear.
//
// Uses the `midly` crate for MIDI writing.

use crate::export::{ExportError, uniform_length};
use crate::mode::Realization;
use crate::note::Note;
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};

/// Ticks per quarter note in MIDI output.
const TICKS_PER_QUARTER: u16 = 480;

const TICKS_PER_WHOLE: u32 = TICKS_PER_QUARTER as u32 * 4;

/// Quarter notes per minute, matching the MusicXML tempo mark.
pub const TEMPO_BPM: u32 = 300;

/// Church organ.
const PROGRAM: u8 = 19;

const VELOCITY: u8 = 80;

const CHANNEL: u8 = 0;

fn midi_key(note: &Note) -> Result<u7, ExportError> {
    u8::try_from(note.midi_pitch())
        .ok()
        .filter(|&key| key <= 127)
        .map(u7::new)
        .ok_or_else(|| ExportError::Midi(format!("{note} is outside the MIDI key range")))
}

fn event(delta: u32, kind: TrackEventKind<'static>) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(delta),
        kind,
    }
}

/// Convert a batch of melodies to an in-memory SMF.
pub fn to_smf(melodies: &[Realization]) -> Result<Smf<'static>, ExportError> {
    uniform_length(melodies)?;

    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    // Track 0: tempo track
    let tempo_microseconds = 60_000_000 / TEMPO_BPM;
    smf.tracks.push(vec![
        event(0, TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo_microseconds)))),
        event(0, TrackEventKind::Meta(MetaMessage::EndOfTrack)),
    ]);

    let channel = u4::new(CHANNEL);
    let mut track: Track<'static> = vec![
        event(0, TrackEventKind::Meta(MetaMessage::TrackName(b"Cantus Firmus"))),
        event(
            0,
            TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange {
                    program: u7::new(PROGRAM),
                },
            },
        ),
    ];

    for (i, melody) in melodies.iter().enumerate() {
        for (j, note) in melody.notes.iter().enumerate() {
            let key = midi_key(note)?;
            // The rest before each melody after the first rides on the
            // first note-on delta.
            let delta = if i > 0 && j == 0 { TICKS_PER_WHOLE } else { 0 };
            track.push(event(
                delta,
                TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::NoteOn {
                        key,
                        vel: u7::new(VELOCITY),
                    },
                },
            ));
            track.push(event(
                TICKS_PER_WHOLE,
                TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::NoteOff {
                        key,
                        vel: u7::new(0),
                    },
                },
            ));
        }
    }

    track.push(event(0, TrackEventKind::Meta(MetaMessage::EndOfTrack)));
    smf.tracks.push(track);
    Ok(smf)
}

/// Encode a batch of melodies as SMF bytes.
pub fn to_midi_bytes(melodies: &[Realization]) -> Result<Vec<u8>, ExportError> {
    let smf = to_smf(melodies)?;
    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::{Mode, realize};

    fn note_ons(smf: &Smf) -> Vec<(u32, u8)> {
        smf.tracks[1]
            .iter()
            .filter_map(|e| match e.kind {
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { key, .. },
                    ..
                } => Some((e.delta.as_int(), key.as_int())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_smf_layout() {
        let melodies = vec![realize(&[1, -1], Mode::Major), realize(&[2, -2], Mode::Major)];
        let smf = to_smf(&melodies).unwrap();
        // 1 tempo track + 1 melody track
        assert_eq!(smf.tracks.len(), 2);
        assert_eq!(
            note_ons(&smf),
            vec![(0, 60), (0, 62), (0, 60), (1920, 60), (0, 64), (0, 60)]
        );
    }

    #[test]
    fn test_raised_notes_sound() {
        let smf = to_smf(&[realize(&[-1, 1], Mode::Minor)]).unwrap();
        let keys: Vec<u8> = note_ons(&smf).into_iter().map(|(_, k)| k).collect();
        assert_eq!(keys, vec![69, 68, 69]);
    }

    #[test]
    fn test_bytes_parse_back() {
        let bytes = to_midi_bytes(&[realize(&[1, 1, -2], Mode::Dorian)]).unwrap();
        let parsed = Smf::parse(&bytes).unwrap();
        assert_eq!(parsed.tracks.len(), 2);
        assert_eq!(note_ons(&parsed).len(), 4);
    }

    #[test]
    fn test_out_of_range_note() {
        let mut melody = realize(&[1, -1], Mode::Major);
        melody.notes[1] = Note::natural(0, 12);
        assert!(matches!(to_smf(&[melody]), Err(ExportError::Midi(_))));
    }

    #[test]
    fn test_empty_batch() {
        assert!(matches!(to_smf(&[]), Err(ExportError::Empty)));
    }
}
