//! Reproducibility helpers
//!
//! The fold permutation and split selection must not depend on platform,
//! hash seeds or thread scheduling. Everything random comes from [`LcgRng`]
//! and every scoring tie is settled by [`SplitTieBreaker`].

/// 31-bit linear congruential generator (glibc `rand` parameters).
#[derive(Clone, Debug)]
pub struct LcgRng {
    state: u32,
}

impl LcgRng {
    const MULTIPLIER: u32 = 1_103_515_245;
    const INCREMENT: u32 = 12_345;
    const MASK: u32 = (1 << 31) - 1;

    /// Negative seeds are folded onto their magnitude.
    pub fn new(seed: i64) -> Self {
        let folded = seed.unsigned_abs() & u64::from(Self::MASK);
        Self {
            state: folded as u32,
        }
    }

    /// Next value in `[0, 2^31)`
    pub fn next_i64(&mut self) -> i64 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
            & Self::MASK;
        i64::from(self.state)
    }

    /// Next value in `[0, bound)`; 0 when `bound` is not positive
    pub fn next_range(&mut self, bound: i64) -> i64 {
        match bound {
            b if b > 0 => self.next_i64() % b,
            _ => 0,
        }
    }

    /// In-place Fisher-Yates, walking from the back
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for upper in (1..items.len()).rev() {
            let pick = self.next_range(upper as i64 + 1) as usize;
            items.swap(upper, pick);
        }
    }
}

/// Ordering key for equally scored splits: lower feature, then lower
/// threshold, then lower node id wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SplitTieBreaker {
    pub feature_idx: usize,
    pub threshold: i64,
    pub node_id: usize,
}

impl SplitTieBreaker {
    pub fn new(feature_idx: usize, threshold: i64, node_id: usize) -> Self {
        Self {
            feature_idx,
            threshold,
            node_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_sequence() {
        let mut rng = LcgRng::new(0);
        assert_eq!(rng.next_i64(), 12_345);
        assert_eq!(rng.next_i64(), 1_406_932_606);
        assert_eq!(rng.next_i64(), 654_583_775);
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = LcgRng::new(42);
        let mut b = LcgRng::new(42);
        assert!((0..100).all(|_| a.next_i64() == b.next_i64()));
    }

    #[test]
    fn test_range_bounds() {
        let mut rng = LcgRng::new(0);
        assert!((0..100).map(|_| rng.next_range(10)).all(|v| (0..10).contains(&v)));
        assert_eq!(rng.next_range(0), 0);
        assert_eq!(rng.next_range(-3), 0);
    }

    #[test]
    fn test_extreme_seeds() {
        for seed in [i64::MIN, -1, i64::MAX] {
            let v = LcgRng::new(seed).next_i64();
            assert!((0..1 << 31).contains(&v));
        }
    }

    #[test]
    fn test_shuffle_permutes() {
        let mut items: Vec<usize> = (0..50).collect();
        LcgRng::new(0).shuffle(&mut items);

        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
        assert_ne!(items, sorted);

        let mut again: Vec<usize> = (0..50).collect();
        LcgRng::new(0).shuffle(&mut again);
        assert_eq!(items, again);
    }

    #[test]
    fn test_tie_breaker_ordering() {
        let base = SplitTieBreaker::new(0, 100, 0);
        assert!(base < SplitTieBreaker::new(0, 100, 1));
        assert!(base < SplitTieBreaker::new(0, 101, 0));
        assert!(base < SplitTieBreaker::new(1, 50, 0));
    }
}
