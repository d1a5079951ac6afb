// Strict-style cantus firmus contour generator.
//
// Enumerates every sequence of diatonic intervals ("contour") that obeys the
// codified melodic rules of strict-style counterpoint. The crate works purely
// on abstract integers: an interval is a signed scale-degree delta, and a
// contour starts from an implicit height of 0. Turning a contour into
// pitches in a concrete mode is the job of `strict_cantus_music`.
//
// Architecture:
// - interval.rs: step/leap alphabets and interval naming
// - phrase.rs: read-only view over a (possibly partial) interval slice with
//   the derived height series and melodic outline
// - rules.rs: the rule predicate library, each rule tagged partial-safe or
//   complete-only
// - rulebook.rs: immutable rule configuration (composer + JSON loading)
// - generator.rs: backtracking search with leap quota and prefix pruning,
//   sequential or rayon-parallel
//
// The search is deterministic: the same request and rule book always give
// the same sequences in the same order.

pub mod generator;
pub mod interval;
pub mod phrase;
pub mod rulebook;
pub mod rules;

pub use generator::{GenerationRequest, Generator, SearchStats};
pub use interval::{Interval, IntervalSequence, LEAPS, STEPS};
pub use phrase::Phrase;
pub use rulebook::{ConfigError, RuleBook};
pub use rules::{Rule, RuleKind};
