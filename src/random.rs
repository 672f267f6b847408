//! The single random stream that drives a simulation.
//!
//! Every probabilistic call site receives `&mut SimRng`; there are no independent or unseeded
//! sources, so a run is reproducible from its base seed.

use log::trace;
use rand::distr::uniform::{SampleRange, SampleUniform};
use rand::distr::Distribution;
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

pub struct SimRng {
    base_seed: u64,
    rng: SmallRng,
}

impl SimRng {
    pub fn new(base_seed: u64) -> SimRng {
        trace!("initializing random stream (seed={base_seed})");
        SimRng {
            base_seed,
            rng: SmallRng::seed_from_u64(base_seed),
        }
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Gets a random sample from the specified distribution.
    pub fn sample_distr<T>(&mut self, distribution: impl Distribution<T>) -> T {
        distribution.sample(&mut self.rng)
    }

    /// Gets a random sample within the range provided by `range`.
    pub fn sample_range<S, T>(&mut self, range: S) -> T
    where
        S: SampleRange<T>,
        T: SampleUniform,
    {
        self.rng.random_range(range)
    }

    /// Gets a random boolean value which is true with probability `p`. Values outside `[0, 1]`
    /// are clamped.
    pub fn sample_bool(&mut self, p: f64) -> bool {
        self.rng.random_bool(p.clamp(0.0, 1.0))
    }

    /// Samples an element uniformly from an iterator of known length.
    pub fn sample_from<I, T>(&mut self, iter: I) -> Option<T>
    where
        I: ExactSizeIterator<Item = T>,
    {
        sample_single_from_known_length(&mut self.rng, iter)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }
}

/// Sample a random element uniformly from a container of known length.
///
/// We do not assume the container is randomly indexable, only that it can be iterated over.
pub fn sample_single_from_known_length<I, R, T>(rng: &mut R, mut iter: I) -> Option<T>
where
    R: Rng,
    I: ExactSizeIterator<Item = T>,
{
    let len = iter.len();
    if len == 0 {
        return None;
    }
    let index = rng.random_range(0..len);
    // The set need not be randomly indexable, so we have to use the `nth` method.
    iter.nth(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_distr::Normal;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SimRng::new(42);
        let mut b = SimRng::new(42);
        for _ in 0..10 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn different_seed_different_stream() {
        let mut a = SimRng::new(42);
        let mut b = SimRng::new(88);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn sample_bool_extremes() {
        let mut rng = SimRng::new(7);
        for _ in 0..100 {
            assert!(!rng.sample_bool(0.0));
            assert!(rng.sample_bool(1.0));
            assert!(rng.sample_bool(3.5));
        }
    }

    #[test]
    fn sample_range_stays_in_bounds() {
        let mut rng = SimRng::new(1);
        for _ in 0..1000 {
            let value: f64 = rng.sample_range(14.0..20.0);
            assert!((14.0..20.0).contains(&value));
        }
    }

    #[test]
    fn usage_with_distribution() {
        let mut rng = SimRng::new(42);
        let normal = Normal::new(100.0, 20.0).unwrap();
        assert_ne!(rng.sample_distr(normal), rng.sample_distr(normal));
    }

    #[test]
    fn sample_from_empty_is_none() {
        let mut rng = SimRng::new(42);
        let empty: Vec<u32> = Vec::new();
        assert_eq!(rng.sample_from(empty.into_iter()), None);
    }

    #[test]
    fn sample_from_reaches_every_element() {
        let mut rng = SimRng::new(42);
        let items = [1usize, 2, 3, 4];
        let mut seen = [false; 4];
        for _ in 0..500 {
            let item = rng.sample_from(items.iter()).unwrap();
            seen[*item - 1] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
