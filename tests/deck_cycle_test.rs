//! Integration test: Deck draw/discard/reshuffle cycle
//!
//! Steps the cycle by hand through the public API and checks that no token is
//! ever lost or duplicated, then pins the reference scenarios and seeded
//! determinism of the round simulator.

use decksim::core::constants::{NOMINAL_BATCH_SIZE, NUM_TOKEN_TYPES};
use decksim::{
    build_pool, conservation_holds, draw, run_rounds, BatchFuzzer, ConstantFuzz, DeckConfig,
    DiscardPile, DrawPolicy, Pool, ReferenceFuzz,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// =========================================================================
// Conservation: every copy lives in exactly one of pool, batch, discard
// =========================================================================

#[test]
fn test_conservation_across_seeds_and_deck_sizes() {
    for copies in 2..=7 {
        for seed in 0..25u64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed * 31 + copies as u64);
            let mut fuzz = ReferenceFuzz;
            let mut pool = build_pool(copies, NUM_TOKEN_TYPES, &mut rng);
            let mut discard = DiscardPile::new();

            let n = NOMINAL_BATCH_SIZE + fuzz.extra_tokens(&mut rng);
            let mut batch = draw(&mut pool, &mut discard, n, DrawPolicy::Lenient, &mut rng).unwrap();
            assert!(conservation_holds(&pool, &batch, &discard, copies, NUM_TOKEN_TYPES));

            for round in 0..20 {
                discard.add_all(batch.tokens());
                let n = NOMINAL_BATCH_SIZE + fuzz.extra_tokens(&mut rng);
                batch = draw(&mut pool, &mut discard, n, DrawPolicy::Lenient, &mut rng).unwrap();

                assert!(
                    conservation_holds(&pool, &batch, &discard, copies, NUM_TOKEN_TYPES),
                    "copies {copies}, seed {seed}, round {round}: tokens not conserved"
                );
                assert_eq!(batch.len(), n, "deck of {copies} copies should never short-draw");
            }
        }
    }
}

#[test]
fn test_drift_guard_never_fires_on_reference_sweep() {
    for copies in 2..=7 {
        for rounds in 0..12 {
            let mut rng = ChaCha8Rng::seed_from_u64(1000 + rounds as u64);
            let outcome =
                run_rounds(&DeckConfig::new(copies, rounds), &mut ReferenceFuzz, &mut rng).unwrap();
            assert_eq!(outcome.drift_resets, 0, "copies {copies}, rounds {rounds}");
            assert_eq!(outcome.rounds_completed, rounds);
            assert!(outcome.discard_total() + outcome.batch.len() <= copies * NUM_TOKEN_TYPES);
        }
    }
}

#[test]
fn test_final_state_accounts_for_every_token() {
    let config = DeckConfig::new(4, 7);
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let outcome = run_rounds(&config, &mut ReferenceFuzz, &mut rng).unwrap();

    assert_eq!(
        outcome.pool_remaining + outcome.batch.len() + outcome.discard_total(),
        config.total_tokens()
    );
    for token in 0..NUM_TOKEN_TYPES {
        assert!(outcome.discard.count(token) + outcome.batch.count_of(token) <= 4);
    }
}

// =========================================================================
// Draw engine reference cases
// =========================================================================

#[test]
fn test_draw_exact_pool_without_reshuffle() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut pool = Pool::from_tokens(vec![1, 2, 3]);
    let mut discard: DiscardPile = [(2, 3)].into_iter().collect();

    let batch = draw(&mut pool, &mut discard, 3, DrawPolicy::Lenient, &mut rng).unwrap();

    assert!(pool.is_empty());
    assert_eq!(batch.tokens(), &[1, 2, 3]);
    assert_eq!(discard.count(2), 3);
    assert_eq!(discard.total(), 3);
}

#[test]
fn test_draw_past_pool_reshuffles_discard() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut pool = Pool::from_tokens(vec![1, 2, 3]);
    let mut discard: DiscardPile = [(2, 3)].into_iter().collect();

    let batch = draw(&mut pool, &mut discard, 5, DrawPolicy::Lenient, &mut rng).unwrap();

    assert_eq!(pool.tokens(), &[2]);
    assert_eq!(batch.tokens(), &[1, 2, 3, 2, 2]);
    assert!(discard.is_empty());
}

// =========================================================================
// Round simulator reference scenarios (fixed batch of 5, 6 types, 3 copies)
// =========================================================================

#[test]
fn test_reference_scenarios_with_zero_fuzz() {
    for seed in 0..10u64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let zero = run_rounds(&DeckConfig::new(3, 0), &mut ConstantFuzz(0), &mut rng).unwrap();
        assert_eq!(zero.discard_total(), 0);

        let two = run_rounds(&DeckConfig::new(3, 2), &mut || 0usize, &mut rng).unwrap();
        assert_eq!(two.discard_total(), 10);

        let three = run_rounds(&DeckConfig::new(3, 3), &mut ConstantFuzz(0), &mut rng).unwrap();
        assert_eq!(three.discard_total(), 0);
    }
}

#[test]
fn test_exhausted_types_match_discard() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let outcome = run_rounds(&DeckConfig::new(2, 2), &mut ConstantFuzz(0), &mut rng).unwrap();

    for token in outcome.exhausted_types() {
        assert_eq!(outcome.discard.count(token), 2);
        assert_eq!(outcome.batch.count_of(token), 0);
    }
}

// =========================================================================
// Determinism and policy
// =========================================================================

#[test]
fn test_seeded_runs_are_identical() {
    let config = DeckConfig::new(5, 6);
    let a = run_rounds(&config, &mut ConstantFuzz(0), &mut ChaCha8Rng::seed_from_u64(2024)).unwrap();
    let b = run_rounds(&config, &mut ConstantFuzz(0), &mut ChaCha8Rng::seed_from_u64(2024)).unwrap();
    assert_eq!(a, b);

    let c = run_rounds(&config, &mut ReferenceFuzz, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
    let d = run_rounds(&config, &mut ReferenceFuzz, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
    assert_eq!(c, d);
}

#[test]
fn test_strict_policy_matches_lenient_when_tokens_suffice() {
    let lenient = DeckConfig::new(3, 5);
    let strict = DeckConfig {
        draw_policy: DrawPolicy::Strict,
        ..lenient.clone()
    };
    let a = run_rounds(&lenient, &mut ReferenceFuzz, &mut ChaCha8Rng::seed_from_u64(5)).unwrap();
    let b = run_rounds(&strict, &mut ReferenceFuzz, &mut ChaCha8Rng::seed_from_u64(5)).unwrap();
    assert_eq!(a, b);
}
