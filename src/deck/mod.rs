//! Deck cycle: pool construction, batch fuzzing, drawing with reshuffle, and
//! the multi-round draw/discard loop.

pub mod builder;
pub mod engine;
pub mod error;
pub mod fuzz;
pub mod rounds;
pub mod types;

pub use builder::build_pool;
pub use engine::draw;
pub use error::DeckError;
pub use fuzz::{BatchFuzzer, ConstantFuzz, ReferenceFuzz};
pub use rounds::{conservation_holds, run_rounds, RoundOutcome};
pub use types::{Batch, DeckConfig, DiscardPile, DrawPolicy, Pool, TokenType};
