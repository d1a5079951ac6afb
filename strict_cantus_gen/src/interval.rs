// Diatonic interval alphabet.
//
// Intervals count scale degrees, not semitones: 1 is a second (major or
// minor), 2 a third, 4 a fifth, and so on. Positive values ascend.
//
// The leap alphabet is deliberately lopsided. There is no primitive
// descending sixth (-5): the preparation tables only admit an ascending
// sixth after descending motion, so the descent never needs its own symbol.

/// Signed scale-degree delta between two consecutive notes.
pub type Interval = i32;

/// One candidate contour, relative to a starting height of 0.
pub type IntervalSequence = Vec<Interval>;

/// Step moves. The final two intervals of every contour come from here.
pub const STEPS: [Interval; 2] = [-1, 1];

/// Leap moves offered by the generator, in exploration order.
pub const LEAPS: [Interval; 7] = [-4, -3, -2, 2, 3, 4, 5];

/// The ascending sixth, the largest leap in the alphabet.
pub const SIXTH_UP: Interval = 5;

pub fn is_step(interval: Interval) -> bool {
    interval.abs() == 1
}

/// Anything wider than a second.
pub fn is_leap(interval: Interval) -> bool {
    interval.abs() >= 2
}

/// Number of leaps among the given intervals.
pub fn leap_count(intervals: &[Interval]) -> usize {
    intervals.iter().filter(|&&i| is_leap(i)).count()
}

/// Direction of an interval: `1` ascending, `-1` otherwise.
///
/// A unison never comes out of the generator; hand-written input treats it
/// as descending so that runs of repeated notes still break the
/// five-same-direction window.
pub fn direction(interval: Interval) -> i32 {
    if interval > 0 { 1 } else { -1 }
}

/// Human-readable interval name, e.g. "third up", "9th down".
pub fn interval_name(interval: Interval) -> String {
    let size = interval.unsigned_abs();
    let dir = if interval < 0 { "down" } else { "up" };

    let simple = match size {
        0 => return "unison".to_string(),
        1 => "second",
        2 => "third",
        3 => "fourth",
        4 => "fifth",
        5 => "sixth",
        6 => "seventh",
        7 => "octave",
        _ => "",
    };
    if !simple.is_empty() {
        return format!("{simple} {dir}");
    }

    let number = size + 1;
    let suffix = match (number % 10, number % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{number}{suffix} {dir}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabets_are_disjoint() {
        assert!(STEPS.iter().all(|&s| is_step(s) && !is_leap(s)));
        assert!(LEAPS.iter().all(|&l| is_leap(l) && !is_step(l)));
        assert!(!LEAPS.contains(&-5));
        assert!(LEAPS.contains(&SIXTH_UP));
    }

    #[test]
    fn test_leap_count() {
        assert_eq!(leap_count(&[]), 0);
        assert_eq!(leap_count(&[1, -1, 1]), 0);
        assert_eq!(leap_count(&[2, -1, -1, 3, -1, 2, -1, -1]), 3);
    }

    #[test]
    fn test_interval_names() {
        assert_eq!(interval_name(0), "unison");
        assert_eq!(interval_name(1), "second up");
        assert_eq!(interval_name(-2), "third down");
        assert_eq!(interval_name(4), "fifth up");
        assert_eq!(interval_name(-7), "octave down");
        assert_eq!(interval_name(8), "9th up");
        assert_eq!(interval_name(-10), "11th down");
        assert_eq!(interval_name(11), "12th up");
        assert_eq!(interval_name(12), "13th up");
        assert_eq!(interval_name(20), "21st up");
        assert_eq!(interval_name(21), "22nd up");
    }

    #[test]
    fn test_direction_of_unison_is_downward() {
        assert_eq!(direction(3), 1);
        assert_eq!(direction(-1), -1);
        assert_eq!(direction(0), -1);
    }
}
