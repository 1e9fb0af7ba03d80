//! Draw/reshuffle engine.
//!
//! A draw takes tokens from the front of the pool. When the pool runs out
//! partway, everything left is taken, the discard pile is shuffled into a
//! fresh pool, and the rest of the batch comes from that.

use super::error::DeckError;
use super::types::{Batch, DiscardPile, DrawPolicy, Pool};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Draw `n` tokens, reshuffling the discard into the pool if needed.
///
/// `pool` keeps the undrawn remainder and `discard` is emptied by a
/// reshuffle. If even the reshuffled discard cannot cover `n`, the result
/// depends on `policy`: `Lenient` returns a short batch, `Strict` returns
/// `InsufficientTokens` before touching either pile.
pub fn draw<R: Rng + ?Sized>(
    pool: &mut Pool,
    discard: &mut DiscardPile,
    n: usize,
    policy: DrawPolicy,
    rng: &mut R,
) -> Result<Batch, DeckError> {
    if pool.len() >= n {
        return Ok(Batch::new(pool.take_front(n), n, false));
    }

    let available = pool.len() + discard.total();
    if available < n && policy == DrawPolicy::Strict {
        return Err(DeckError::InsufficientTokens {
            requested: n,
            available,
        });
    }

    let mut drawn = pool.take_all();
    let mut fresh = discard.drain_tokens();
    fresh.shuffle(rng);
    *pool = Pool::from_tokens(fresh);

    debug!(
        requested = n,
        from_old_pool = drawn.len(),
        reshuffled = pool.len(),
        "pool exhausted, reshuffled discard"
    );

    let remaining = n - drawn.len();
    drawn.extend(pool.take_front(remaining));

    if drawn.len() < n {
        debug!(requested = n, drawn = drawn.len(), "short draw after reshuffle");
    }

    Ok(Batch::new(drawn, n, true))
}
