// Read-only view of a contour under construction.
//
// Most rules reason about note heights rather than raw intervals, so a
// `Phrase` computes the partial-sum series once and every rule in a rule
// book shares it. A phrase also records whether it is complete: a few
// features (the last note's role as an outline point) are only known once
// the search has placed the final interval.
//
// Determinacy matters for pruning. A local extremum at height index `i`
// depends on heights `i-1` and `i+1`, so in a prefix only interior indices
// are settled; the last height of a prefix may still turn out to be a
// passing note. `interior_extrema` and `outline` only expose settled points,
// which keeps every rule built on them safe to apply to prefixes.

use crate::interval::Interval;
use smallvec::SmallVec;

/// Heights stay inline for the usual 8–16 note cantus lengths.
pub type Heights = SmallVec<[i32; 24]>;

#[derive(Debug, Clone)]
pub struct Phrase<'a> {
    intervals: &'a [Interval],
    heights: Heights,
    complete: bool,
}

impl<'a> Phrase<'a> {
    /// An in-progress prefix: more intervals may follow.
    pub fn prefix(intervals: &'a [Interval]) -> Self {
        Self::build(intervals, false)
    }

    /// A finished contour.
    pub fn complete(intervals: &'a [Interval]) -> Self {
        Self::build(intervals, true)
    }

    fn build(intervals: &'a [Interval], complete: bool) -> Self {
        let mut heights = Heights::with_capacity(intervals.len() + 1);
        let mut height = 0;
        heights.push(height);
        for &interval in intervals {
            height += interval;
            heights.push(height);
        }
        Phrase {
            intervals,
            heights,
            complete,
        }
    }

    pub fn intervals(&self) -> &'a [Interval] {
        self.intervals
    }

    /// Partial sums; `heights()[0] == 0` and the length is one more than
    /// the number of intervals.
    pub fn heights(&self) -> &[i32] {
        &self.heights
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn highest(&self) -> i32 {
        self.heights.iter().copied().max().unwrap_or(0)
    }

    pub fn lowest(&self) -> i32 {
        self.heights.iter().copied().min().unwrap_or(0)
    }

    /// Heights strictly above or strictly below both neighbours.
    pub fn interior_extrema(&self) -> SmallVec<[i32; 16]> {
        self.heights
            .windows(3)
            .filter(|w| (w[1] > w[0] && w[1] > w[2]) || (w[1] < w[0] && w[1] < w[2]))
            .map(|w| w[1])
            .collect()
    }

    /// The melodic skeleton: first note, settled interior extrema, and the
    /// last note once the phrase is complete.
    pub fn outline(&self) -> SmallVec<[i32; 16]> {
        let mut points = SmallVec::new();
        points.push(self.heights[0]);
        points.extend(self.interior_extrema());
        if self.complete && self.heights.len() > 1 {
            points.push(self.heights[self.heights.len() - 1]);
        }
        points
    }
}
