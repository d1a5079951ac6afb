// Seeded random selection for cantus firmus output.
//
// The generator itself is fully deterministic; randomness only enters when
// the CLI trims a large result list down to the number of melodies the user
// asked for. That trimming must be reproducible from a seed, so this crate
// carries its own xoshiro256++ generator (Blackman & Vigna, 2019) seeded
// through SplitMix64 instead of relying on a platform RNG.
//
// `CantusRng::select_random` implements reservoir sampling (Algorithm R):
// one pass over the candidates, uniform over all subsets of the requested
// size, with the first `count` items as the initial reservoir.
//
// Only integer arithmetic is used, so a seed produces the same selection on
// every platform.

use serde::{Deserialize, Serialize};

/// xoshiro256++ state. Clone it to fork an identical stream.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CantusRng {
    s: [u64; 4],
}

impl CantusRng {
    /// Seed a generator from a single `u64`.
    ///
    /// SplitMix64 expands the seed into the 256-bit state, so nearby seeds
    /// still give unrelated streams.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Uniform integer in `[low, high)`, rejection-sampled so small ranges
    /// carry no modulo bias.
    ///
    /// Panics if `low >= high`.
    pub fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let span = high - low;
        if span.is_power_of_two() {
            return low + (self.next_u64() & (span - 1));
        }
        let threshold = span.wrapping_neg() % span;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % span);
            }
        }
    }

    /// Uniform `usize` in `[low, high)`. Panics if `low >= high`.
    pub fn range_usize(&mut self, low: usize, high: usize) -> usize {
        self.range_u64(low as u64, high as u64) as usize
    }

    /// Pick `count` items uniformly at random without replacement.
    ///
    /// Returns an empty vec for `count == 0` or empty input, and a copy of
    /// every item (in input order) when `count >= items.len()`.
    /// Otherwise the result keeps reservoir order, not input order.
    pub fn select_random<T: Clone>(&mut self, items: &[T], count: usize) -> Vec<T> {
        if count == 0 || items.is_empty() {
            return Vec::new();
        }
        if count >= items.len() {
            return items.to_vec();
        }

        let mut reservoir: Vec<T> = items[..count].to_vec();
        for (i, item) in items.iter().enumerate().skip(count) {
            let j = self.range_usize(0, i + 1);
            if j < count {
                reservoir[j] = item.clone();
            }
        }
        reservoir
    }
}

/// SplitMix64 step, used only to expand the seed.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
