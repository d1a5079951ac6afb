// Rule predicate library: the codified melodic rules of the strict style.
//
// Each `Rule` variant tests one constraint against a `Phrase`. Rules come in
// two kinds:
//
// - Partial-safe: sound to apply to an unfinished prefix. If a prefix fails,
//   every completion of it fails too, so the generator may abandon the
//   branch. Everything a partial-safe rule looks at must already be settled
//   in the prefix; checks that need intervals not yet chosen pass.
// - Complete-only: meaningful only for a finished contour (direction
//   changes, climax uniqueness). The rule book never runs them on prefixes.
//
// Rules are plain data (serde-tagged) so a JSON rule book can switch them on
// and off and tune thresholds without touching code. The catalog variants
// at the bottom of the enum are not part of the strict-style default.
//
// Consumed by rulebook.rs (composition) and generator.rs (pruning).

use crate::interval::{Interval, SIXTH_UP, direction, is_leap};
use crate::phrase::Phrase;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Widest allowed distance between lowest and highest note (a tenth).
pub const MAX_RANGE: i32 = 9;

/// How often one height may sound. Some revisions used 3.
pub const MAX_NOTE_OCCURRENCES: usize = 4;

/// Length of the direction window in `NoFiveSameSign`.
pub const SAME_DIRECTION_WINDOW: usize = 5;

/// Length of the melodic cycle searched by `NoRepeatingPattern`.
pub const PATTERN_CYCLE: usize = 3;

/// Filler notes allowed between a cycle and its repetition.
pub const MAX_PATTERN_FILLER: usize = 3;

/// Outline span of a diatonic seventh.
pub const SEVENTH: i32 = 6;

/// Outline span of a diatonic ninth.
pub const NINTH: i32 = 8;

/// Whether a rule may be applied to an unfinished prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    PartialSafe,
    CompleteOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    /// The melody must not open with an ascending sixth.
    NoLeadingSixth,
    /// No five consecutive intervals in the same direction.
    NoFiveSameSign,
    /// No height may sound more than `max_occurrences` times.
    NoteRepetition { max_occurrences: usize },
    /// Highest minus lowest height stays within `max_span`.
    RangeLimit { max_span: i32 },
    /// No immediate `a b a b` trill, and no three-note cycle repeated after
    /// at most three filler notes.
    NoRepeatingPattern,
    /// Fourths, fifths and sixths are approached and left by contrary
    /// motion, per size.
    LeapPreparation,
    /// No height struck three times with a single note between each
    /// (`a x a y a`).
    NoTripleAlternation,
    /// The interior extrema never turn back to the extremum before last
    /// (`a b a`).
    NoRepeatingExtrema,
    /// A leap is never followed by the same leap in the other direction.
    NoLeapReversal,
    /// Adjacent outline points (first note, extrema, last note) never span
    /// one of `forbidden_spans`.
    ExtremaOutline { forbidden_spans: Vec<i32> },
    /// The finished melody changes direction at least `min` times.
    MinDirectionChanges { min: usize },
    /// One climax: a single maximum above the start, a single minimum
    /// below it, or one of each when the melody crosses the start.
    SingleClimax,

    // Catalog: available to rule books, not wired into the strict style.
    /// No window of `length` intervals occurs twice without overlapping.
    NoRepeatedMotif { length: usize },
    /// A note one degree below the final moves straight to the final.
    LeadingToneResolution,
    /// At least `min_steps` step moves between any two leaps.
    LeapSpacing { min_steps: usize },
}

impl Rule {
    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::MinDirectionChanges { .. } | Rule::SingleClimax => RuleKind::CompleteOnly,
            _ => RuleKind::PartialSafe,
        }
    }

    pub fn is_partial_safe(&self) -> bool {
        self.kind() == RuleKind::PartialSafe
    }

    /// Stable identifier, identical to the serde tag.
    pub fn name(&self) -> &'static str {
        match self {
            Rule::NoLeadingSixth => "no_leading_sixth",
            Rule::NoFiveSameSign => "no_five_same_sign",
            Rule::NoteRepetition { .. } => "note_repetition",
            Rule::RangeLimit { .. } => "range_limit",
            Rule::NoRepeatingPattern => "no_repeating_pattern",
            Rule::LeapPreparation => "leap_preparation",
            Rule::NoTripleAlternation => "no_triple_alternation",
            Rule::NoRepeatingExtrema => "no_repeating_extrema",
            Rule::NoLeapReversal => "no_leap_reversal",
            Rule::ExtremaOutline { .. } => "extrema_outline",
            Rule::MinDirectionChanges { .. } => "min_direction_changes",
            Rule::SingleClimax => "single_climax",
            Rule::NoRepeatedMotif { .. } => "no_repeated_motif",
            Rule::LeadingToneResolution => "leading_tone_resolution",
            Rule::LeapSpacing { .. } => "leap_spacing",
        }
    }

    /// True if the phrase satisfies this rule.
    ///
    /// Complete-only rules must be given a complete phrase.
    pub fn check(&self, phrase: &Phrase) -> bool {
        debug_assert!(
            self.is_partial_safe() || phrase.is_complete(),
            "{} applied to a prefix",
            self.name()
        );
        let intervals = phrase.intervals();
        match self {
            Rule::NoLeadingSixth => no_leading_sixth(intervals),
            Rule::NoFiveSameSign => no_five_same_sign(intervals),
            Rule::NoteRepetition { max_occurrences } => {
                note_repetition(phrase.heights(), *max_occurrences)
            }
            Rule::RangeLimit { max_span } => phrase.highest() - phrase.lowest() <= *max_span,
            Rule::NoRepeatingPattern => no_repeating_pattern(phrase.heights()),
            Rule::LeapPreparation => leap_preparation(intervals, phrase.is_complete()),
            Rule::NoTripleAlternation => no_triple_alternation(phrase.heights()),
            Rule::NoRepeatingExtrema => !has_return(&phrase.interior_extrema()),
            Rule::NoLeapReversal => no_leap_reversal(intervals),
            Rule::ExtremaOutline { forbidden_spans } => {
                extrema_outline(&phrase.outline(), forbidden_spans)
            }
            Rule::MinDirectionChanges { min } => direction_changes(intervals) >= *min,
            Rule::SingleClimax => single_climax(phrase),
            Rule::NoRepeatedMotif { length } => no_repeated_motif(intervals, *length),
            Rule::LeadingToneResolution => leading_tone_resolution(phrase.heights()),
            Rule::LeapSpacing { min_steps } => leap_spacing(intervals, *min_steps),
        }
    }
}

fn no_leading_sixth(intervals: &[Interval]) -> bool {
    intervals.first() != Some(&SIXTH_UP)
}

fn no_five_same_sign(intervals: &[Interval]) -> bool {
    intervals.windows(SAME_DIRECTION_WINDOW).all(|w| {
        let first = direction(w[0]);
        w.iter().any(|&i| direction(i) != first)
    })
}

fn note_repetition(heights: &[i32], max_occurrences: usize) -> bool {
    let mut counts: FxHashMap<i32, usize> = FxHashMap::default();
    for &h in heights {
        let count = counts.entry(h).or_insert(0);
        *count += 1;
        if *count > max_occurrences {
            return false;
        }
    }
    true
}

fn no_repeating_pattern(heights: &[i32]) -> bool {
    // a b a b
    if heights.windows(4).any(|w| w[0] == w[2] && w[1] == w[3]) {
        return false;
    }

    for filler in 0..=MAX_PATTERN_FILLER {
        let span = 2 * PATTERN_CYCLE + filler;
        if heights.len() < span {
            break;
        }
        for start in 0..=heights.len() - span {
            let cycle = &heights[start..start + PATTERN_CYCLE];
            let repeat_at = start + PATTERN_CYCLE + filler;
            if cycle == &heights[repeat_at..repeat_at + PATTERN_CYCLE] {
                return false;
            }
        }
    }
    true
}

fn leap_preparation(intervals: &[Interval], complete: bool) -> bool {
    for (i, &leap) in intervals.iter().enumerate() {
        let size = leap.abs();
        if size < 3 {
            continue;
        }

        // Moves leading into the leap, nearest first. The opening of the
        // melody needs no preparation, but a short run-up is not excused.
        let mut before = intervals[..i].iter().rev().copied();
        let near = before.next();
        if near.is_some() && !contrary_approach(leap, near, before.next(), false) {
            return false;
        }

        // Moves leaving the leap. In a prefix, anything not chosen yet cannot
        // fail; once the phrase is complete, a missing move is a failure.
        let mut after = intervals[i + 1..].iter().copied();
        if !contrary_approach(leap, after.next(), after.next(), !complete) {
            return false;
        }
    }
    true
}

/// Size-specific contrary motion table, applied on one side of a leap.
///
/// - fourth: the adjacent move is contrary
/// - fifth: the adjacent move is contrary and at least a third, or the two
///   nearest moves are both contrary
/// - sixth: the two nearest moves are both contrary
///
/// `open_ended` decides what a missing move means: unknown yet (passes) or
/// absent for good (fails).
fn contrary_approach(
    leap: Interval,
    near: Option<Interval>,
    far: Option<Interval>,
    open_ended: bool,
) -> bool {
    let contrary = |m: Interval| direction(m) != direction(leap);
    let Some(near) = near else {
        return open_ended;
    };
    if !contrary(near) {
        return false;
    }
    let far_contrary = far.map_or(open_ended, contrary);
    match leap.abs() {
        3 => true,
        4 => near.abs() >= 2 || far_contrary,
        _ => far_contrary,
    }
}

fn no_triple_alternation(heights: &[i32]) -> bool {
    !heights
        .windows(5)
        .any(|w| w[0] == w[2] && w[2] == w[4])
}

/// Some point equals the point two places before it.
fn has_return(points: &[i32]) -> bool {
    points.windows(3).any(|w| w[0] == w[2])
}

fn no_leap_reversal(intervals: &[Interval]) -> bool {
    !intervals
        .windows(2)
        .any(|w| is_leap(w[0]) && w[1] == -w[0])
}

fn extrema_outline(outline: &[i32], forbidden_spans: &[i32]) -> bool {
    outline
        .windows(2)
        .all(|w| !forbidden_spans.contains(&(w[1] - w[0]).abs()))
}

fn direction_changes(intervals: &[Interval]) -> usize {
    intervals
        .windows(2)
        .filter(|w| direction(w[0]) != direction(w[1]))
        .count()
}

fn single_climax(phrase: &Phrase) -> bool {
    let heights = phrase.heights();
    let highest = phrase.highest();
    let lowest = phrase.lowest();
    let occurrences = |target: i32| heights.iter().filter(|&&h| h == target).count();

    if lowest >= 0 {
        occurrences(highest) == 1
    } else if highest <= 0 {
        occurrences(lowest) == 1
    } else {
        occurrences(highest) == 1 && occurrences(lowest) == 1
    }
}

fn no_repeated_motif(intervals: &[Interval], length: usize) -> bool {
    if length == 0 || intervals.len() < 2 * length {
        return true;
    }
    for first in 0..=intervals.len() - 2 * length {
        let motif = &intervals[first..first + length];
        for second in first + length..=intervals.len() - length {
            if motif == &intervals[second..second + length] {
                return false;
            }
        }
    }
    true
}

fn leading_tone_resolution(heights: &[i32]) -> bool {
    heights.windows(2).all(|w| w[0] != -1 || w[1] == 0)
}

fn leap_spacing(intervals: &[Interval], min_steps: usize) -> bool {
    let mut last_leap: Option<usize> = None;
    for (i, &interval) in intervals.iter().enumerate() {
        if !is_leap(interval) {
            continue;
        }
        if let Some(prev) = last_leap {
            if i - prev - 1 < min_steps {
                return false;
            }
        }
        last_leap = Some(i);
    }
    true
}
