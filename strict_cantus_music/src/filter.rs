// Secondary filter on realized melodies.
//
// The contour rules work on scale degrees and cannot see semitones, so a
// contour can pass them and still, once placed in a mode, outline a
// tritone or another augmented/diminished interval. A realized melody is
// rejected if such an interval appears
// - between adjacent notes,
// - between notes two positions apart (the span of a third in stepwise
//   motion),
// - between successive melodic extrema (the first note, every local peak
//   or trough, the last note).
//
// An interval that cannot be classified counts as a violation.

use crate::note::Note;
use crate::quality::classify;

/// Indices of the first note, every local extremum by pitch, and the last
/// note.
pub fn melodic_extrema(notes: &[Note]) -> Vec<usize> {
    if notes.is_empty() {
        return Vec::new();
    }
    let mut indices = vec![0];
    for i in 1..notes.len().saturating_sub(1) {
        let (prev, note, next) = (&notes[i - 1], &notes[i], &notes[i + 1]);
        let peak = note.is_higher_than(prev) && note.is_higher_than(next);
        let trough = note.is_lower_than(prev) && note.is_lower_than(next);
        if peak || trough {
            indices.push(i);
        }
    }
    if notes.len() > 1 {
        indices.push(notes.len() - 1);
    }
    indices
}

fn is_dissonant(a: &Note, b: &Note) -> bool {
    match classify(a, b) {
        Ok(quality) => quality.is_augmented_or_diminished(),
        Err(_) => true,
    }
}

pub fn is_free_of_augmented_diminished(notes: &[Note]) -> bool {
    if notes.windows(2).any(|w| is_dissonant(&w[0], &w[1])) {
        return false;
    }
    if notes.windows(3).any(|w| is_dissonant(&w[0], &w[2])) {
        return false;
    }
    !melodic_extrema(notes)
        .windows(2)
        .any(|w| is_dissonant(&notes[w[0]], &notes[w[1]]))
}
