//! Trial aggregation: runs the round simulator across a sweep of copy
//! counts and round counts and reduces each point to summary statistics.

use super::analysis::{mean, population_std_dev};
use super::config::SimConfig;
use super::report::{CopiesSeries, RoundStats, SimReport};
use crate::deck::{build_pool, draw, run_rounds, DeckError, DiscardPile, DrawPolicy};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// ChaCha stream reserved for the opening-variety statistic of each series.
const OPENING_STREAM: u64 = u32::MAX as u64;

/// Run the full sweep and return a report.
pub fn run_sweep(config: &SimConfig) -> Result<SimReport, DeckError> {
    config.validate()?;

    let mut series = Vec::with_capacity(config.copies_sweep.len());
    for (series_idx, &copies) in config.copies_sweep.iter().enumerate() {
        let mut rounds = Vec::with_capacity(config.total_rounds as usize);
        for rounds_elapsed in 0..config.total_rounds {
            let stream = sweep_stream(series_idx, rounds_elapsed as u64);
            rounds.push(simulate_point(config, copies, rounds_elapsed, stream)?);
        }

        let (mean_unique, std_dev_unique) =
            simulate_opening_variety(config, copies, sweep_stream(series_idx, OPENING_STREAM))?;

        let copies_series = CopiesSeries::new(copies, rounds, mean_unique, std_dev_unique);
        info!(
            copies,
            peak_exhausted_pct = copies_series.peak_exhausted_pct,
            mean_unique_in_opening = mean_unique,
            "series complete"
        );
        series.push(copies_series);
    }

    Ok(SimReport::from_series(config.clone(), series))
}

/// Run `num_trials` trials at one `(copies, rounds)` point.
///
/// Trials that fail with `InsufficientTokens` (strict draw policy) are
/// skipped and counted; any other error aborts the sweep.
pub fn simulate_point(
    config: &SimConfig,
    copies_per_type: usize,
    rounds_elapsed: u32,
    stream: u64,
) -> Result<RoundStats, DeckError> {
    let deck = config.deck_config(copies_per_type, rounds_elapsed);
    deck.validate()?;

    let mut exhausted = Vec::with_capacity(config.num_trials as usize);
    let mut discard_totals = Vec::with_capacity(config.num_trials as usize);
    let mut failed_trials = 0u32;
    let mut reshuffles = 0u64;
    let mut short_draws = 0u64;
    let mut drift_resets = 0u64;

    for trial_idx in 0..config.num_trials {
        let mut rng = trial_rng(config.seed, trial_idx, stream);
        let mut fuzz = config.fuzz;

        match run_rounds(&deck, &mut fuzz, &mut rng) {
            Ok(outcome) => {
                exhausted.push(outcome.exhausted_types().len() as f64);
                discard_totals.push(outcome.discard_total() as f64);
                reshuffles += outcome.reshuffles as u64;
                short_draws += outcome.short_draws as u64;
                drift_resets += outcome.drift_resets as u64;
            }
            Err(DeckError::InsufficientTokens {
                requested,
                available,
            }) => {
                debug!(trial_idx, requested, available, "trial ran out of tokens, skipped");
                failed_trials += 1;
            }
            Err(err) => return Err(err),
        }
    }

    let mean_exhausted_types = mean(&exhausted);
    Ok(RoundStats {
        rounds_elapsed,
        completed_trials: exhausted.len() as u32,
        failed_trials,
        mean_exhausted_types,
        exhausted_pct: mean_exhausted_types / config.num_types as f64 * 100.0,
        mean_discard_total: mean(&discard_totals),
        reshuffles,
        short_draws,
        drift_resets,
    })
}

/// Mean and population standard deviation of the number of distinct types
/// in an opening batch of nominal size drawn from a fresh pool.
pub fn simulate_opening_variety(
    config: &SimConfig,
    copies_per_type: usize,
    stream: u64,
) -> Result<(f64, f64), DeckError> {
    config.deck_config(copies_per_type, 0).validate()?;

    let mut samples = Vec::with_capacity(config.num_trials as usize);
    for trial_idx in 0..config.num_trials {
        let mut rng = trial_rng(config.seed, trial_idx, stream);
        let mut pool = build_pool(copies_per_type, config.num_types, &mut rng);
        let mut discard = DiscardPile::new();
        let opening = draw(
            &mut pool,
            &mut discard,
            config.batch_size,
            DrawPolicy::Lenient,
            &mut rng,
        )?;
        samples.push(opening.unique_types() as f64);
    }

    Ok((mean(&samples), population_std_dev(&samples)))
}

/// Independent stream per sweep point so points never share a sequence.
fn sweep_stream(series_idx: usize, point: u64) -> u64 {
    ((series_idx as u64) << 32) | point
}

fn trial_rng(seed: Option<u64>, trial_idx: u32, stream: u64) -> ChaCha8Rng {
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(trial_idx as u64)),
        None => ChaCha8Rng::from_entropy(),
    };
    rng.set_stream(stream);
    rng
}
