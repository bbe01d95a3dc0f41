//! Pool of name colors handed out to admitted clients.
//!
//! Tags are drawn at random without replacement. When the pool runs dry it
//! is refilled with the full set, so duplicates only appear once more than
//! six clients are connected. Not thread-safe on its own; the registry
//! keeps it behind its lock.

use murmur_common::ColorTag;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug)]
pub struct Palette {
    available: Vec<ColorTag>,
    rng: StdRng,
}

impl Palette {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic draw order, for tests.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            available: ColorTag::ALL.to_vec(),
            rng,
        }
    }

    pub fn draw(&mut self) -> ColorTag {
        if self.available.is_empty() {
            self.available = ColorTag::ALL.to_vec();
        }
        let index = self.rng.gen_range(0..self.available.len());
        self.available.swap_remove(index)
    }

    /// Return a tag whose holder left.
    pub fn release(&mut self, tag: ColorTag) {
        if !self.available.contains(&tag) {
            self.available.push(tag);
        }
    }

    pub fn remaining(&self) -> usize {
        self.available.len()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn draws_each_tag_once_before_reset() {
        let mut palette = Palette::seeded(7);
        let drawn: HashSet<_> = (0..ColorTag::ALL.len()).map(|_| palette.draw()).collect();
        assert_eq!(drawn.len(), ColorTag::ALL.len());
        assert_eq!(palette.remaining(), 0);
    }

    #[test]
    fn refills_when_exhausted() {
        let mut palette = Palette::seeded(7);
        for _ in 0..ColorTag::ALL.len() {
            palette.draw();
        }
        palette.draw();
        assert_eq!(palette.remaining(), ColorTag::ALL.len() - 1);
    }

    #[test]
    fn release_returns_tag_once() {
        let mut palette = Palette::seeded(1);
        let tag = palette.draw();
        assert_eq!(palette.remaining(), 5);

        palette.release(tag);
        palette.release(tag);
        assert_eq!(palette.remaining(), 6);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Palette::seeded(99);
        let mut b = Palette::seeded(99);
        for _ in 0..12 {
            assert_eq!(a.draw(), b.draw());
        }
    }
}
