//! Data structures for the deck cycle.

use super::error::DeckError;
use crate::core::constants::{NOMINAL_BATCH_SIZE, NUM_TOKEN_TYPES};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Token type identifier in `[0, num_types)`.
pub type TokenType = usize;

/// What a draw does when pool and discard together cannot cover the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawPolicy {
    /// Hand back whatever is left (a short batch)
    #[default]
    Lenient,
    /// Fail with `DeckError::InsufficientTokens` and leave the deck untouched
    Strict,
}

/// Parameters for one trial of the round simulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckConfig {
    /// Copies of each token type in the starting pool
    pub copies_per_type: usize,
    /// Number of distinct token types
    pub num_types: usize,
    /// Nominal batch (hand) size before fuzzing
    pub batch_size: usize,
    /// Discard/draw cycles to run after the opening draw
    pub rounds_elapsed: u32,
    /// Behavior when a reshuffle still cannot cover a draw
    pub draw_policy: DrawPolicy,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            copies_per_type: 3,
            num_types: NUM_TOKEN_TYPES,
            batch_size: NOMINAL_BATCH_SIZE,
            rounds_elapsed: 0,
            draw_policy: DrawPolicy::Lenient,
        }
    }
}

impl DeckConfig {
    /// Default deck shape with the given copy count and round count.
    pub fn new(copies_per_type: usize, rounds_elapsed: u32) -> Self {
        Self {
            copies_per_type,
            rounds_elapsed,
            ..Default::default()
        }
    }

    /// Total tokens in play: `copies_per_type * num_types`, saturating at `usize::MAX`.
    pub fn total_tokens(&self) -> usize {
        self.copies_per_type.saturating_mul(self.num_types)
    }

    /// Reject parameters that make the cycle meaningless.
    ///
    /// `rounds_elapsed == 0` is valid: it only performs the opening draw.
    pub fn validate(&self) -> Result<(), DeckError> {
        if self.copies_per_type == 0 {
            return Err(DeckError::invalid("copies_per_type must be positive"));
        }
        if self.num_types == 0 {
            return Err(DeckError::invalid("num_types must be positive"));
        }
        if self.batch_size == 0 {
            return Err(DeckError::invalid("batch_size must be positive"));
        }
        if self.copies_per_type.checked_mul(self.num_types).is_none() {
            return Err(DeckError::invalid(format!(
                "{} copies of {} types overflows the token count",
                self.copies_per_type, self.num_types
            )));
        }
        Ok(())
    }
}

/// Undrawn tokens, drawn from the front.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pool {
    tokens: Vec<TokenType>,
}

impl Pool {
    /// Pool holding `tokens` in the given order (no shuffle).
    pub fn from_tokens(tokens: Vec<TokenType>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[TokenType] {
        &self.tokens
    }

    pub fn count_of(&self, token: TokenType) -> usize {
        self.tokens.iter().filter(|&&t| t == token).count()
    }

    /// Remove and return up to `n` tokens from the front.
    pub(crate) fn take_front(&mut self, n: usize) -> Vec<TokenType> {
        let n = n.min(self.tokens.len());
        self.tokens.drain(..n).collect()
    }

    /// Remove and return every token, leaving the pool empty.
    pub(crate) fn take_all(&mut self) -> Vec<TokenType> {
        std::mem::take(&mut self.tokens)
    }
}

/// Discard accumulator: how many copies of each type sit in the discard.
///
/// Backed by an ordered map so expanding it for a reshuffle visits types in
/// ascending order; seeded runs depend on that.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiscardPile {
    counts: BTreeMap<TokenType, usize>,
}

impl DiscardPile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, token: TokenType) {
        *self.counts.entry(token).or_insert(0) += 1;
    }

    pub fn add_all(&mut self, tokens: &[TokenType]) {
        for &token in tokens {
            self.add(token);
        }
    }

    /// Copies of `token` in the discard (0 if never discarded).
    pub fn count(&self, token: TokenType) -> usize {
        self.counts.get(&token).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    /// `(type, count)` pairs in ascending type order.
    pub fn iter(&self) -> impl Iterator<Item = (TokenType, usize)> + '_ {
        self.counts.iter().map(|(&t, &c)| (t, c))
    }

    /// Types with all `copies_per_type` copies in the discard.
    pub fn exhausted_types(&self, copies_per_type: usize) -> Vec<TokenType> {
        self.iter()
            .filter(|&(_, count)| count == copies_per_type)
            .map(|(token, _)| token)
            .collect()
    }

    /// Expand every `(type, count)` entry into `count` tokens and empty the pile.
    pub(crate) fn drain_tokens(&mut self) -> Vec<TokenType> {
        let tokens = self
            .counts
            .iter()
            .flat_map(|(&token, &count)| std::iter::repeat(token).take(count))
            .collect();
        self.counts.clear();
        tokens
    }
}

impl FromIterator<(TokenType, usize)> for DiscardPile {
    fn from_iter<I: IntoIterator<Item = (TokenType, usize)>>(iter: I) -> Self {
        let mut pile = DiscardPile::new();
        for (token, count) in iter {
            *pile.counts.entry(token).or_insert(0) += count;
        }
        pile
    }
}

/// Tokens returned by a single draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Batch {
    tokens: Vec<TokenType>,
    requested: usize,
    reshuffled: bool,
}

impl Batch {
    pub(crate) fn new(tokens: Vec<TokenType>, requested: usize, reshuffled: bool) -> Self {
        Self {
            tokens,
            requested,
            reshuffled,
        }
    }

    pub fn tokens(&self) -> &[TokenType] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Batch size asked for, including fuzz.
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Whether the discard had to be reshuffled into the pool to fill this batch.
    pub fn reshuffled(&self) -> bool {
        self.reshuffled
    }

    /// Tokens missing from a lenient short draw (0 for a full batch).
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.tokens.len())
    }

    pub fn is_short(&self) -> bool {
        self.shortfall() > 0
    }

    pub fn count_of(&self, token: TokenType) -> usize {
        self.tokens.iter().filter(|&&t| t == token).count()
    }

    /// Number of distinct types in the batch.
    pub fn unique_types(&self) -> usize {
        self.tokens.iter().collect::<HashSet<_>>().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_reference_deck() {
        let config = DeckConfig::default();
        assert_eq!(config.num_types, 6);
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.total_tokens(), 18);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_copies() {
        let config = DeckConfig::new(0, 2);
        assert!(matches!(
            config.validate(),
            Err(DeckError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_types_and_zero_batch() {
        let no_types = DeckConfig {
            num_types: 0,
            ..Default::default()
        };
        assert!(no_types.validate().is_err());

        let no_batch = DeckConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(no_batch.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_zero_rounds() {
        assert!(DeckConfig::new(2, 0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_token_count_overflow() {
        let config = DeckConfig {
            copies_per_type: usize::MAX / 2,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DeckError::InvalidConfiguration { .. })
        ));
        assert_eq!(config.total_tokens(), usize::MAX);
    }

    #[test]
    fn test_pool_take_front_clamps_to_length() {
        let mut pool = Pool::from_tokens(vec![4, 5]);
        assert_eq!(pool.take_front(5), vec![4, 5]);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_discard_counts_and_total() {
        let mut discard = DiscardPile::new();
        discard.add_all(&[1, 1, 3]);
        assert_eq!(discard.count(1), 2);
        assert_eq!(discard.count(3), 1);
        assert_eq!(discard.count(0), 0);
        assert_eq!(discard.total(), 3);
    }

    #[test]
    fn test_discard_drain_expands_in_type_order() {
        let mut discard: DiscardPile = [(4, 1), (2, 2)].into_iter().collect();
        assert_eq!(discard.drain_tokens(), vec![2, 2, 4]);
        assert!(discard.is_empty());
    }

    #[test]
    fn test_exhausted_types_requires_every_copy() {
        let discard: DiscardPile = [(0, 3), (1, 2), (5, 3)].into_iter().collect();
        assert_eq!(discard.exhausted_types(3), vec![0, 5]);
    }

    #[test]
    fn test_batch_shortfall() {
        let batch = Batch::new(vec![0, 1, 1], 5, true);
        assert_eq!(batch.shortfall(), 2);
        assert!(batch.is_short());
        assert_eq!(batch.unique_types(), 2);
        assert_eq!(batch.count_of(1), 2);
    }

    #[test]
    fn test_draw_policy_serializes_snake_case() {
        let json = serde_json::to_string(&DrawPolicy::Strict).unwrap();
        assert_eq!(json, "\"strict\"");
    }
}
