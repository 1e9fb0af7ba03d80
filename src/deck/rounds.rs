//! Round simulator: the draw/discard loop for one trial.

use super::builder::build_pool;
use super::engine::draw;
use super::error::DeckError;
use super::fuzz::BatchFuzzer;
use super::types::{Batch, DeckConfig, DiscardPile, Pool, TokenType};
use rand::Rng;
use serde::Serialize;
use tracing::warn;

/// Final state of one trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundOutcome {
    /// Batch in hand when the last round finished
    pub batch: Batch,
    /// Discard accumulator when the last round finished
    pub discard: DiscardPile,
    /// Tokens still undrawn in the pool
    pub pool_remaining: usize,
    /// Copies per type the trial was built with
    pub copies_per_type: usize,
    pub rounds_completed: u32,
    /// Draws that had to reshuffle the discard into the pool
    pub reshuffles: u32,
    /// Lenient draws that came back smaller than requested
    pub short_draws: u32,
    /// Times the discard drift guard reset the discard pile
    pub drift_resets: u32,
}

impl RoundOutcome {
    /// Types whose every copy is in the discard.
    pub fn exhausted_types(&self) -> Vec<TokenType> {
        self.discard.exhausted_types(self.copies_per_type)
    }

    pub fn discard_total(&self) -> usize {
        self.discard.total()
    }
}

/// Check that every copy of every type is in exactly one of pool, batch or discard.
pub fn conservation_holds(
    pool: &Pool,
    batch: &Batch,
    discard: &DiscardPile,
    copies_per_type: usize,
    num_types: usize,
) -> bool {
    let mut seen = vec![0usize; num_types];
    for &token in pool.tokens().iter().chain(batch.tokens()) {
        match seen.get_mut(token) {
            Some(slot) => *slot += 1,
            None => return false,
        }
    }
    for (token, count) in discard.iter() {
        match seen.get_mut(token) {
            Some(slot) => *slot += count,
            None => return false,
        }
    }
    seen.iter().all(|&count| count == copies_per_type)
}

#[derive(Debug, Default)]
struct CycleTally {
    reshuffles: u32,
    short_draws: u32,
}

impl CycleTally {
    fn record(&mut self, batch: &Batch) {
        if batch.reshuffled() {
            self.reshuffles += 1;
        }
        if batch.is_short() {
            self.short_draws += 1;
        }
    }
}

/// Run one trial: build a fresh pool, draw the opening batch, then
/// `rounds_elapsed` times discard the batch and draw a new one.
///
/// Batch size each draw is `batch_size + fuzzer.extra_tokens(rng)`, saturating
/// at `usize::MAX`; an oversized request is a short draw or an
/// `InsufficientTokens` error depending on the draw policy.
///
/// After each draw a drift guard resets the discard if discard plus batch
/// would exceed the total token count. That cannot happen while tokens are
/// conserved, so a reset is logged at `warn` and counted in `drift_resets`.
pub fn run_rounds<F, R>(
    config: &DeckConfig,
    fuzzer: &mut F,
    rng: &mut R,
) -> Result<RoundOutcome, DeckError>
where
    F: BatchFuzzer,
    R: Rng + ?Sized,
{
    config.validate()?;

    let capacity = config.total_tokens();
    let mut pool = build_pool(config.copies_per_type, config.num_types, rng);
    let mut discard = DiscardPile::new();
    let mut tally = CycleTally::default();

    let n = config.batch_size.saturating_add(fuzzer.extra_tokens(rng));
    let mut batch = draw(&mut pool, &mut discard, n, config.draw_policy, rng)?;
    tally.record(&batch);

    let mut drift_resets = 0;
    for round in 0..config.rounds_elapsed {
        discard.add_all(batch.tokens());

        let n = config.batch_size.saturating_add(fuzzer.extra_tokens(rng));
        batch = draw(&mut pool, &mut discard, n, config.draw_policy, rng)?;
        tally.record(&batch);

        debug_assert!(
            drift_resets > 0
                || conservation_holds(
                    &pool,
                    &batch,
                    &discard,
                    config.copies_per_type,
                    config.num_types
                ),
            "token conservation broken in round {round}"
        );

        if discard.total() + batch.len() > capacity {
            warn!(
                round,
                discard_total = discard.total(),
                batch_len = batch.len(),
                capacity,
                "discard drift guard fired, resetting discard pile"
            );
            discard.clear();
            drift_resets += 1;
        }
    }

    Ok(RoundOutcome {
        batch,
        pool_remaining: pool.len(),
        discard,
        copies_per_type: config.copies_per_type,
        rounds_completed: config.rounds_elapsed,
        reshuffles: tally.reshuffles,
        short_draws: tally.short_draws,
        drift_resets,
    })
}
