//! Batch size fuzzing.
//!
//! Each cycle draws the nominal batch size plus a small non-negative
//! perturbation. The perturbation is a pluggable policy so tests can pin it.

use crate::core::constants::{
    FUZZ_ROLL_SCALE, FUZZ_THRESHOLD_ONE, FUZZ_THRESHOLD_TWO, FUZZ_THRESHOLD_ZERO, MAX_FUZZ,
};
use rand::Rng;

/// Source of the extra tokens added to each batch.
pub trait BatchFuzzer {
    /// Extra tokens to draw on top of the nominal batch size.
    fn extra_tokens<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize;
}

/// The reference policy: 0, 1, 2 or 3 extra tokens with probability
/// 20%, 30%, 30% and 20%.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReferenceFuzz;

impl BatchFuzzer for ReferenceFuzz {
    fn extra_tokens<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let roll = rng.gen::<f64>() * FUZZ_ROLL_SCALE;
        if roll < FUZZ_THRESHOLD_ZERO {
            0
        } else if roll < FUZZ_THRESHOLD_ONE {
            1
        } else if roll < FUZZ_THRESHOLD_TWO {
            2
        } else {
            MAX_FUZZ
        }
    }
}

/// Always the same amount. Zero gives fixed-size batches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstantFuzz(pub usize);

impl BatchFuzzer for ConstantFuzz {
    fn extra_tokens<R: Rng + ?Sized>(&mut self, _rng: &mut R) -> usize {
        self.0
    }
}

impl<F> BatchFuzzer for F
where
    F: FnMut() -> usize,
{
    fn extra_tokens<R: Rng + ?Sized>(&mut self, _rng: &mut R) -> usize {
        self()
    }
}
