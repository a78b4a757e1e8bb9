//! Seedable random stream shared by every probabilistic rule of a run.
//!
//! A run owns exactly one `RandomStream`; all draws are consumed in the fixed
//! per-step order of the engine, so `(seed, config)` fully determines the trajectory.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};

use crate::gn_rules::clamp_probability;

pub struct RandomStream {
    seed: u64,
    rng: StdRng,
}

impl RandomStream {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Get or generate seed
    pub fn resolve_seed(seed: Option<u64>) -> u64 {
        seed.unwrap_or_else(|| StdRng::from_entropy().next_u64())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draw in [0, 1)
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Uniform draw in [low, high); a degenerate range returns `low`
    pub fn uniform_range(&mut self, low: f64, high: f64) -> f64 {
        if high > low {
            self.rng.gen_range(low..high)
        } else {
            low
        }
    }

    /// Bernoulli trial; the parameter is clamped so an out-of-range
    /// probability can never fail the draw
    pub fn bernoulli(&mut self, p: f64) -> bool {
        self.rng.gen_bool(clamp_probability(p))
    }

    /// Uniform index into a collection of length `len`
    pub fn index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.rng.gen_range(0..len))
        }
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_draws() {
        let mut a = RandomStream::new(42);
        let mut b = RandomStream::new(42);

        for _ in 0..100 {
            assert_eq!(a.uniform().to_bits(), b.uniform().to_bits());
        }

        let mut xs: Vec<u64> = (0..20).collect();
        let mut ys = xs.clone();
        a.shuffle(&mut xs);
        b.shuffle(&mut ys);
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_bernoulli_accepts_out_of_range() {
        let mut stream = RandomStream::new(7);
        assert!(stream.bernoulli(3.5));
        assert!(!stream.bernoulli(-1.0));
        assert!(!stream.bernoulli(f64::NAN));
    }

    #[test]
    fn test_index_and_range_edges() {
        let mut stream = RandomStream::new(1);
        assert_eq!(stream.index(0), None);
        assert_eq!(stream.index(1), Some(0));
        assert_eq!(stream.uniform_range(0.5, 0.5), 0.5);

        for _ in 0..50 {
            let v = stream.uniform_range(10.0, 30.0);
            assert!((10.0..30.0).contains(&v));
        }
    }

    #[test]
    fn test_resolve_seed_keeps_explicit_seed() {
        assert_eq!(RandomStream::resolve_seed(Some(42)), 42);
        assert_eq!(RandomStream::new(42).seed(), 42);
    }
}
