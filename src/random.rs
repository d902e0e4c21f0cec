//! This module holds the capability the board engine draws its randomness from. Tile placement and
//! tile values are both rolled through the [`Source`] trait, so the engine never touches an ambient
//! generator and every spawn can be replayed from a seed or a scripted sequence.

use fastrand::Rng;

/// This trait is implemented by anything able to hand out uniformly distributed indices. It is the
/// only randomness the engine asks for.
pub trait Source {
    /// This function returns an index picked uniformly from `0..bound`. Callers never pass a zero
    /// bound.
    fn below(&mut self, bound: usize) -> usize;
}

impl Source for Rng {
    fn below(&mut self, bound: usize) -> usize {
        self.usize(..bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_generators_agree() {
        let mut first = Rng::with_seed(2048);
        let mut second = Rng::with_seed(2048);

        for bound in 1..64 {
            let rolled = first.below(bound);
            assert_eq!(rolled, second.below(bound), "same seed, same roll");
            assert!(rolled < bound, "roll {rolled} escaped its bound {bound}");
        }
    }
}
