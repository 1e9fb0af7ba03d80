//! Decksim - Monte Carlo deck depletion simulator
//!
//! Estimates how a shared pool of typed tokens (a deck of cards) depletes
//! individual types as batches (hands) are drawn, discarded, and reshuffled
//! back into the pool.

pub mod build_info;
pub mod core;
pub mod deck;
pub mod simulator;

pub use deck::{
    build_pool, conservation_holds, draw, run_rounds, Batch, BatchFuzzer, ConstantFuzz, DeckConfig, DeckError,
    DiscardPile, DrawPolicy, Pool, ReferenceFuzz, RoundOutcome, TokenType,
};
