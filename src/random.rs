//! Random cycle-duration sources
//!
//! The cycling loop asks a [`RandomSource`] for the next duration instead of
//! building its own generator, so tests can script exact timings.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Supplies integers uniformly drawn from an inclusive range
pub trait RandomSource: Send {
    /// Next value in `[lo, hi]`. Callers guarantee `lo <= hi`.
    fn next_in_range(&mut self, lo: u64, hi: u64) -> u64;
}

/// [`RandomSource`] backed by a `rand` generator
#[derive(Debug, Clone)]
pub struct RngSource<R = StdRng> {
    rng: R,
}

impl RngSource<StdRng> {
    /// Generator seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible generator
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RngSource<R> {
    /// Wrap an existing generator
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> RandomSource for RngSource<R> {
    fn next_in_range(&mut self, lo: u64, hi: u64) -> u64 {
        self.rng.random_range(lo..=hi)
    }
}

/// Always answers the same value, clamped into the requested range
#[derive(Debug, Clone, Copy)]
pub struct FixedSource(pub u64);

impl RandomSource for FixedSource {
    fn next_in_range(&mut self, lo: u64, hi: u64) -> u64 {
        self.0.clamp(lo, hi)
    }
}

/// Cycles through a fixed list of values, each clamped into the requested range
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<u64>,
    next: usize,
}

impl SequenceSource {
    /// An empty list behaves like a source that always answers `lo`.
    pub fn new(values: impl Into<Vec<u64>>) -> Self {
        Self {
            values: values.into(),
            next: 0,
        }
    }
}

impl RandomSource for SequenceSource {
    fn next_in_range(&mut self, lo: u64, hi: u64) -> u64 {
        if self.values.is_empty() {
            return lo;
        }
        let value = self.values[self.next % self.values.len()];
        self.next = (self.next + 1) % self.values.len();
        value.clamp(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_source_stays_in_range() {
        let mut source = RngSource::from_entropy();
        for _ in 0..1000 {
            let value = source.next_in_range(4, 6);
            assert!((4..=6).contains(&value));
        }
    }

    #[test]
    fn test_rng_source_hits_both_bounds() {
        let mut source = RngSource::seeded(42);
        let draws: Vec<u64> = (0..500).map(|_| source.next_in_range(4, 6)).collect();
        assert!(draws.contains(&4));
        assert!(draws.contains(&5));
        assert!(draws.contains(&6));
    }

    #[test]
    fn test_seeded_sources_repeat() {
        let mut a = RngSource::seeded(7);
        let mut b = RngSource::seeded(7);
        let first: Vec<u64> = (0..20).map(|_| a.next_in_range(1, 100)).collect();
        let second: Vec<u64> = (0..20).map(|_| b.next_in_range(1, 100)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_degenerate_range() {
        let mut source = RngSource::seeded(1);
        assert_eq!(source.next_in_range(5, 5), 5);
    }

    #[test]
    fn test_fixed_source_clamps() {
        let mut source = FixedSource(10);
        assert_eq!(source.next_in_range(4, 6), 6);
        assert_eq!(source.next_in_range(10, 20), 10);
        assert_eq!(FixedSource(0).next_in_range(4, 6), 4);
    }

    #[test]
    fn test_sequence_source_cycles() {
        let mut source = SequenceSource::new(vec![4, 5, 6]);
        let draws: Vec<u64> = (0..6).map(|_| source.next_in_range(4, 6)).collect();
        assert_eq!(draws, vec![4, 5, 6, 4, 5, 6]);
    }

    #[test]
    fn test_empty_sequence_returns_lower_bound() {
        let mut source = SequenceSource::new(Vec::new());
        assert_eq!(source.next_in_range(3, 9), 3);
    }
}
