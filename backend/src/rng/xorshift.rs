//! xorshift64* random number generator
//!
//! Fast, high-quality PRNG with a 64-bit state. Deterministic: same seed,
//! same sequence, on every platform and in every release. The cohort
//! generator leans on this to make "seed 42" mean the same hundred patients
//! forever.
//!
//! # Algorithm
//!
//! xorshift64* passes TestU01's BigCrush statistical tests while being a
//! handful of shifts and one multiply per draw.

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use biosure_core_rs::RngManager;
///
/// let mut rng = RngManager::new(42);
/// let offset = rng.range(0, 366); // enrollment day offset, [0, 366)
/// let failed = rng.chance(0.30); // 30% failure draw
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit, never zero)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with the given seed
    ///
    /// A zero seed is remapped to 1 (xorshift state must be non-zero).
    ///
    /// # Example
    /// ```
    /// use biosure_core_rs::RngManager;
    ///
    /// let rng = RngManager::new(42);
    /// ```
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate the next random u64, advancing the internal state
    pub fn next(&mut self) -> u64 {
        // xorshift64* algorithm
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate a random value in range [min, max)
    ///
    /// # Arguments
    /// * `min` - Minimum value (inclusive)
    /// * `max` - Maximum value (exclusive)
    ///
    /// # Panics
    /// Panics if min >= max
    ///
    /// # Example
    /// ```
    /// use biosure_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(42);
    /// let fail_offset = rng.range(30, 201); // [30, 200] inclusive window
    /// ```
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "min must be less than max");

        let value = self.next();
        let range_size = (max - min) as u64;
        min + (value % range_size) as i64
    }

    /// Generate a random f64 in range [0.0, 1.0)
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next();
        // Convert to [0.0, 1.0) using the top 53 bits
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Bernoulli draw: true with probability `p`
    ///
    /// `p <= 0.0` never fires, `p >= 1.0` always fires. Exactly one draw is
    /// consumed regardless of `p`, so the stream position never depends on
    /// probability knobs.
    ///
    /// # Example
    /// ```
    /// use biosure_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(42);
    /// assert!(!rng.chance(0.0));
    /// assert!(rng.chance(1.0));
    /// ```
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Pick a uniformly random element of a non-empty slice
    ///
    /// # Panics
    /// Panics if `items` is empty
    ///
    /// # Example
    /// ```
    /// use biosure_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(42);
    /// let codes = ["J9359", "Z51.5"];
    /// let code = rng.pick(&codes);
    /// assert!(codes.contains(code));
    /// ```
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        assert!(!items.is_empty(), "cannot pick from an empty slice");

        let index = (self.next() % items.len() as u64) as usize;
        &items[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut rng1 = RngManager::new(99999);
        let mut rng2 = RngManager::new(99999);

        for _ in 0..100 {
            assert_eq!(rng1.next(), rng2.next(), "streams diverged");
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut rng1 = RngManager::new(1);
        let mut rng2 = RngManager::new(2);

        let a: Vec<u64> = (0..8).map(|_| rng1.next()).collect();
        let b: Vec<u64> = (0..8).map(|_| rng2.next()).collect();
        assert_ne!(a, b, "different seeds should produce different streams");
    }

    #[test]
    fn test_zero_seed_is_usable() {
        let mut rng1 = RngManager::new(0);
        let mut rng2 = RngManager::new(0);

        for _ in 0..10 {
            let value = rng1.next();
            assert_eq!(value, rng2.next());
            assert_ne!(value, 0, "zero seed must not produce a stuck stream");
        }
    }

    #[test]
    fn test_range_bounds() {
        let mut rng = RngManager::new(12345);

        for _ in 0..1000 {
            let val = rng.range(30, 201);
            assert!((30..201).contains(&val), "range(30, 201) produced {}", val);
        }
    }

    #[test]
    #[should_panic(expected = "min must be less than max")]
    fn test_range_invalid_bounds() {
        let mut rng = RngManager::new(12345);
        rng.range(100, 50);
    }

    #[test]
    fn test_next_f64_in_range() {
        let mut rng = RngManager::new(12345);

        for _ in 0..1000 {
            let val = rng.next_f64();
            assert!(
                (0.0..1.0).contains(&val),
                "next_f64() produced value {} outside [0.0, 1.0)",
                val
            );
        }
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = RngManager::new(7);

        for _ in 0..100 {
            assert!(!rng.chance(0.0));
            assert!(rng.chance(1.0));
        }
    }

    #[test]
    fn test_chance_consumes_stream_uniformly() {
        // Stream position after a draw must not depend on p, or changing a
        // probability knob would reshuffle every later draw in the cohort.
        let mut rng1 = RngManager::new(555);
        let mut rng2 = RngManager::new(555);

        rng1.chance(1.0);
        rng2.chance(0.5);
        assert_eq!(rng1.next(), rng2.next());
    }

    #[test]
    fn test_pick_is_deterministic() {
        let items = ["a", "b", "c"];
        let mut rng1 = RngManager::new(31337);
        let mut rng2 = RngManager::new(31337);

        for _ in 0..50 {
            assert_eq!(rng1.pick(&items), rng2.pick(&items));
        }
    }

    #[test]
    #[should_panic(expected = "cannot pick from an empty slice")]
    fn test_pick_empty_panics() {
        let mut rng = RngManager::new(1);
        let empty: [u8; 0] = [];
        rng.pick(&empty);
    }
}
