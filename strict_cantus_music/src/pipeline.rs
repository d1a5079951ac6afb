// Contours in, playable melodies out.
//
// Realizes every generated contour in one mode, drops the ones the
// secondary filter rejects, and optionally draws a seeded random subset for
// export.

use crate::filter::is_free_of_augmented_diminished;
use crate::mode::{Mode, Realization, realize};
use strict_cantus_gen::IntervalSequence;
use strict_cantus_prng::CantusRng;

/// Realize each contour in `mode`, keeping those free of augmented and
/// diminished intervals. Input order is preserved.
pub fn realize_all(sequences: &[IntervalSequence], mode: Mode) -> Vec<Realization> {
    let kept: Vec<Realization> = sequences
        .iter()
        .map(|seq| realize(seq, mode))
        .filter(|r| is_free_of_augmented_diminished(&r.notes))
        .collect();
    tracing::info!(
        mode = mode.name(),
        contours = sequences.len(),
        kept = kept.len(),
        rejected = sequences.len() - kept.len(),
        "realized contours"
    );
    kept
}

/// Up to `count` realizations picked uniformly at random. `None` keeps
/// everything.
pub fn sample(realizations: Vec<Realization>, count: Option<usize>, seed: u64) -> Vec<Realization> {
    match count {
        Some(count) if count < realizations.len() => {
            let mut rng = CantusRng::new(seed);
            rng.select_random(&realizations, count)
        }
        _ => realizations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FUX: [i32; 10] = [2, -1, -1, 3, -1, 2, -1, -1, -1, -1];

    #[test]
    fn test_realize_all_filters() {
        let sequences = vec![FUX.to_vec(), vec![1, 1, 1, -1]];
        let kept = realize_all(&sequences, Mode::Dorian);
        // D E F G F in Dorian; the same contour in Lydian climbs F to B.
        assert_eq!(kept.len(), 2);
        let kept = realize_all(&[vec![1, 1, 1, -1]], Mode::Lydian);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_realize_all_keeps_order() {
        let sequences = vec![FUX.to_vec(), vec![1, -1], vec![-1, 1]];
        let kept = realize_all(&sequences, Mode::Major);
        let intervals: Vec<_> = kept.iter().map(|r| r.intervals.clone()).collect();
        assert_eq!(intervals, sequences);
    }

    #[test]
    fn test_sample() {
        let all = realize_all(&[vec![1, -1], vec![-1, 1], vec![2, -2]], Mode::Major);
        assert_eq!(all.len(), 3);
        assert_eq!(sample(all.clone(), None, 0), all);
        assert_eq!(sample(all.clone(), Some(5), 0), all);
        let picked = sample(all.clone(), Some(2), 42);
        assert_eq!(picked.len(), 2);
        assert!(picked.iter().all(|r| all.contains(r)));
        assert_eq!(sample(all.clone(), Some(2), 42), picked);
        assert!(sample(all, Some(0), 1).is_empty());
    }
}
