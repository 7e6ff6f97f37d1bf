use rand::prelude::*;

use crate::RandomlyError;

/// Pick one item uniformly at random. The caller brings the dice, so tests can
/// load them and the bot can hand over a fresh `thread_rng()` for every turn.
pub fn select_random<'a, T, R>(items: &'a [T], rng: &mut R) -> Result<&'a T, RandomlyError>
where
    R: Rng + ?Sized,
{
    items
        .choose(rng)
        .ok_or_else(|| RandomlyError::InvalidInput("cannot choose from an empty list".to_string()))
}
