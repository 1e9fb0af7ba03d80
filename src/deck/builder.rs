//! Starting pool construction.

use super::types::{Pool, TokenType};
use rand::seq::SliceRandom;
use rand::Rng;

/// Build a pool with `copies_per_type` copies of each of `num_types` types,
/// uniformly shuffled.
pub fn build_pool<R: Rng + ?Sized>(copies_per_type: usize, num_types: usize, rng: &mut R) -> Pool {
    let mut tokens: Vec<TokenType> = (0..copies_per_type).flat_map(|_| 0..num_types).collect();
    tokens.shuffle(rng);
    Pool::from_tokens(tokens)
}
