//! Simulation configuration.

use crate::core::constants::{
    DEFAULT_COPIES_SWEEP, DEFAULT_NUM_TRIALS, DEFAULT_TOTAL_ROUNDS, MAX_FUZZ, NOMINAL_BATCH_SIZE,
    NUM_TOKEN_TYPES,
};
use crate::deck::{BatchFuzzer, ConstantFuzz, DeckConfig, DeckError, DrawPolicy, ReferenceFuzz};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Batch fuzz policy selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuzzMode {
    /// 0-3 extra tokens at 20/30/30/20%
    #[default]
    Reference,
    /// Fixed number of extra tokens
    Constant(usize),
}

impl FuzzMode {
    /// Largest number of extra tokens this mode can add to a batch.
    pub fn max_extra(&self) -> usize {
        match self {
            FuzzMode::Reference => MAX_FUZZ,
            FuzzMode::Constant(n) => *n,
        }
    }
}

impl BatchFuzzer for FuzzMode {
    fn extra_tokens<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        match self {
            FuzzMode::Reference => ReferenceFuzz.extra_tokens(rng),
            FuzzMode::Constant(n) => ConstantFuzz(*n).extra_tokens(rng),
        }
    }
}

/// Configuration for a sweep over copy counts and round counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Trials per (copies, rounds) point
    pub num_trials: u32,

    /// Random seed for reproducibility (None = OS entropy)
    pub seed: Option<u64>,

    /// Copies per type to evaluate, one series each
    pub copies_sweep: Vec<usize>,

    /// Rounds are swept over `0..total_rounds`
    pub total_rounds: u32,

    pub num_types: usize,

    /// Nominal batch size before fuzz
    pub batch_size: usize,

    pub fuzz: FuzzMode,

    pub draw_policy: DrawPolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_trials: DEFAULT_NUM_TRIALS,
            seed: None,
            copies_sweep: DEFAULT_COPIES_SWEEP.to_vec(),
            total_rounds: DEFAULT_TOTAL_ROUNDS,
            num_types: NUM_TOKEN_TYPES,
            batch_size: NOMINAL_BATCH_SIZE,
            fuzz: FuzzMode::Reference,
            draw_policy: DrawPolicy::Lenient,
        }
    }
}

impl SimConfig {
    /// The full study: 10,000 trials, copies 2-7, rounds 0-5, reference fuzz.
    pub fn reference_study() -> Self {
        Self::default()
    }

    /// Quick config for smoke checks
    pub fn quick() -> Self {
        Self {
            num_trials: 500,
            ..Default::default()
        }
    }

    /// Per-trial deck parameters for one sweep point.
    pub fn deck_config(&self, copies_per_type: usize, rounds_elapsed: u32) -> DeckConfig {
        DeckConfig {
            copies_per_type,
            num_types: self.num_types,
            batch_size: self.batch_size,
            rounds_elapsed,
            draw_policy: self.draw_policy,
        }
    }

    pub fn validate(&self) -> Result<(), DeckError> {
        if self.num_trials == 0 {
            return Err(DeckError::invalid("num_trials must be positive"));
        }
        if self.copies_sweep.is_empty() {
            return Err(DeckError::invalid("copies sweep is empty"));
        }
        if self.total_rounds == 0 {
            return Err(DeckError::invalid("total_rounds must be positive"));
        }
        if self.batch_size.checked_add(self.fuzz.max_extra()).is_none() {
            return Err(DeckError::invalid(format!(
                "batch size {} plus fuzz {} overflows",
                self.batch_size,
                self.fuzz.max_extra()
            )));
        }
        for &copies in &self.copies_sweep {
            self.deck_config(copies, 0).validate()?;
        }
        Ok(())
    }
}
