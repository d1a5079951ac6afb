// Backtracking contour search.
//
// Builds interval sequences one position at a time, depth first. Positions
// `0..n-2` take a step or a leap; the last two positions are always steps
// (the stepwise approach to the final). Three things keep the tree small:
//
// - Prefix pruning: after every push, the rule book's partial-safe rules
//   run on the prefix. Those rules are monotone (a failing prefix has no
//   passing completion), so the whole subtree is dropped.
// - Leap quota: with `min`/`max` the smallest and largest feasible leap
//   counts, a step is offered only while the slots left before the final
//   pair can still bring the count up to `min`, and a leap only while the
//   count is below `max`.
// - Completion: when the prefix reaches `n-2`, the four step pairs are tried
//   and a sequence is emitted only if it sums to zero (returns to the
//   starting height), its prefix leap count is one of the requested counts,
//   and every rule passes on the complete phrase.
//
// Exploration order is steps first (-1, +1), then leaps in `LEAPS` order;
// the final pair is tried in the same step order. Output order is therefore
// deterministic. The parallel variant expands the tree sequentially down to
// a split depth, hands each frontier subtree to rayon and concatenates the
// per-subtree results in frontier order, so it returns exactly the
// sequential output.
//
// A single working buffer is pushed and popped along the recursion; emitted
// sequences are fresh copies.

use crate::interval::{Interval, IntervalSequence, LEAPS, STEPS, leap_count};
use crate::phrase::Phrase;
use crate::rulebook::RuleBook;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::AddAssign;

/// What to enumerate: sequences of `length` intervals (`length + 1` notes)
/// whose first `length - 2` intervals contain one of the allowed numbers of
/// leaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub length: usize,
    pub allowed_leap_counts: BTreeSet<usize>,
}

impl GenerationRequest {
    pub fn new(length: usize, allowed_leap_counts: impl IntoIterator<Item = usize>) -> Self {
        GenerationRequest {
            length,
            allowed_leap_counts: allowed_leap_counts.into_iter().collect(),
        }
    }

    /// Allowed counts that fit in the `length - 2` free positions. Empty for
    /// lengths below 2.
    pub fn feasible_leap_counts(&self) -> BTreeSet<usize> {
        if self.length < 2 {
            return BTreeSet::new();
        }
        let slots = self.length - 2;
        self.allowed_leap_counts
            .iter()
            .copied()
            .filter(|&k| k <= slots)
            .collect()
    }
}

/// Counters for one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Prefixes checked against the partial-safe rules.
    pub nodes_visited: u64,
    /// Prefixes rejected, each one a discarded subtree.
    pub pruned: u64,
    /// Complete sequences built from an admissible prefix and a final step
    /// pair.
    pub candidates: u64,
    pub emitted: u64,
}

impl AddAssign for SearchStats {
    fn add_assign(&mut self, other: Self) {
        self.nodes_visited += other.nodes_visited;
        self.pruned += other.pruned;
        self.candidates += other.candidates;
        self.emitted += other.emitted;
    }
}

/// Request parameters resolved for one search.
#[derive(Debug)]
struct Bounds {
    length: usize,
    /// Free positions before the final step pair.
    slots: usize,
    allowed: BTreeSet<usize>,
    min_leaps: usize,
    max_leaps: usize,
}

impl Bounds {
    /// `None` when nothing can be generated.
    fn resolve(request: &GenerationRequest) -> Option<Self> {
        let allowed = request.feasible_leap_counts();
        let min_leaps = *allowed.first()?;
        let max_leaps = *allowed.last()?;
        Some(Bounds {
            length: request.length,
            slots: request.length - 2,
            allowed,
            min_leaps,
            max_leaps,
        })
    }
}

/// Depth-first search state for one subtree.
struct Search<'a> {
    rules: &'a RuleBook,
    bounds: &'a Bounds,
    /// When set, prefixes of this length are collected instead of expanded.
    split_at: Option<usize>,
    frontier: Vec<(IntervalSequence, usize)>,
    found: Vec<IntervalSequence>,
    stats: SearchStats,
}

impl<'a> Search<'a> {
    fn new(rules: &'a RuleBook, bounds: &'a Bounds) -> Self {
        Search {
            rules,
            bounds,
            split_at: None,
            frontier: Vec::new(),
            found: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    /// Check the prefix, then expand it if it survives.
    fn visit(&mut self, prefix: &mut IntervalSequence, leaps: usize) {
        self.stats.nodes_visited += 1;
        if !self.rules.passes_partial(&Phrase::prefix(prefix)) {
            self.stats.pruned += 1;
            return;
        }
        self.expand(prefix, leaps);
    }

    /// Expand an admissible prefix.
    fn expand(&mut self, prefix: &mut IntervalSequence, leaps: usize) {
        let idx = prefix.len();
        if self.split_at == Some(idx) {
            self.frontier.push((prefix.clone(), leaps));
            return;
        }
        if idx == self.bounds.slots {
            self.complete(prefix, leaps);
            return;
        }

        let remaining_after = self.bounds.slots - (idx + 1);
        if leaps + remaining_after >= self.bounds.min_leaps {
            for &step in &STEPS {
                prefix.push(step);
                self.visit(prefix, leaps);
                prefix.pop();
            }
        }
        if leaps < self.bounds.max_leaps {
            for &leap in &LEAPS {
                prefix.push(leap);
                self.visit(prefix, leaps + 1);
                prefix.pop();
            }
        }
    }

    /// Try the four final step pairs on a full-length prefix.
    fn complete(&mut self, prefix: &mut IntervalSequence, leaps: usize) {
        if !self.bounds.allowed.contains(&leaps) {
            return;
        }
        let height: Interval = prefix.iter().sum();
        for &a in &STEPS {
            for &b in &STEPS {
                if height + a + b != 0 {
                    continue;
                }
                prefix.push(a);
                prefix.push(b);
                self.stats.candidates += 1;
                let phrase = Phrase::complete(prefix);
                if self.rules.passes_partial(&phrase) && self.rules.passes_complete(&phrase) {
                    self.stats.emitted += 1;
                    self.found.push(prefix.clone());
                }
                prefix.pop();
                prefix.pop();
            }
        }
    }
}

/// Enumerates every contour a rule book accepts.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    rules: RuleBook,
}

impl Generator {
    pub fn new(rules: RuleBook) -> Self {
        Generator { rules }
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    /// All accepted sequences, in exploration order.
    pub fn generate(&self, request: &GenerationRequest) -> Vec<IntervalSequence> {
        self.generate_with_stats(request).0
    }

    pub fn generate_with_stats(
        &self,
        request: &GenerationRequest,
    ) -> (Vec<IntervalSequence>, SearchStats) {
        let Some(bounds) = self.resolve(request) else {
            return (Vec::new(), SearchStats::default());
        };
        let mut search = Search::new(&self.rules, &bounds);
        let mut buffer = IntervalSequence::with_capacity(bounds.length);
        search.visit(&mut buffer, 0);
        log_summary(request, &search.stats, "sequential");
        (search.found, search.stats)
    }

    /// Same output as `generate`, with subtrees below `split_depth` explored
    /// on the rayon pool. The depth is clamped to the free positions.
    pub fn generate_parallel(
        &self,
        request: &GenerationRequest,
        split_depth: usize,
    ) -> Vec<IntervalSequence> {
        self.generate_parallel_with_stats(request, split_depth).0
    }

    pub fn generate_parallel_with_stats(
        &self,
        request: &GenerationRequest,
        split_depth: usize,
    ) -> (Vec<IntervalSequence>, SearchStats) {
        let Some(bounds) = self.resolve(request) else {
            return (Vec::new(), SearchStats::default());
        };

        let mut splitter = Search::new(&self.rules, &bounds);
        splitter.split_at = Some(split_depth.min(bounds.slots));
        let mut buffer = IntervalSequence::with_capacity(bounds.length);
        splitter.visit(&mut buffer, 0);
        let mut stats = splitter.stats;
        tracing::trace!(frontier = splitter.frontier.len(), "split search tree");

        let subtrees: Vec<(Vec<IntervalSequence>, SearchStats)> = splitter
            .frontier
            .par_iter()
            .map(|(prefix, leaps)| {
                let mut search = Search::new(&self.rules, &bounds);
                let mut buffer = prefix.clone();
                buffer.reserve(bounds.length - prefix.len());
                search.expand(&mut buffer, *leaps);
                (search.found, search.stats)
            })
            .collect();

        let mut found = Vec::with_capacity(subtrees.iter().map(|(f, _)| f.len()).sum());
        for (subtree, subtree_stats) in subtrees {
            found.extend(subtree);
            stats += subtree_stats;
        }
        log_summary(request, &stats, "parallel");
        (found, stats)
    }

    /// Whether `sequence` is one the generator would emit for `request`.
    /// Checks the finished sequence directly, without any pruning.
    pub fn accepts(&self, request: &GenerationRequest, sequence: &[Interval]) -> bool {
        let allowed = request.feasible_leap_counts();
        if allowed.is_empty() || sequence.len() != request.length {
            return false;
        }
        let (free, last_two) = sequence.split_at(request.length - 2);
        if !last_two.iter().all(|i| STEPS.contains(i)) {
            return false;
        }
        if !free.iter().all(|i| STEPS.contains(i) || LEAPS.contains(i)) {
            return false;
        }
        if sequence.iter().sum::<Interval>() != 0 || !allowed.contains(&leap_count(free)) {
            return false;
        }
        let phrase = Phrase::complete(sequence);
        self.rules.passes_partial(&phrase) && self.rules.passes_complete(&phrase)
    }

    fn resolve(&self, request: &GenerationRequest) -> Option<Bounds> {
        let bounds = Bounds::resolve(request);
        if bounds.is_none() {
            tracing::debug!(
                length = request.length,
                allowed = ?request.allowed_leap_counts,
                "no feasible leap count; nothing to generate"
            );
        }
        bounds
    }
}

fn log_summary(request: &GenerationRequest, stats: &SearchStats, mode: &str) {
    tracing::debug!(
        mode,
        length = request.length,
        nodes_visited = stats.nodes_visited,
        pruned = stats.pruned,
        candidates = stats.candidates,
        emitted = stats.emitted,
        "generation finished"
    );
}
