//! Uniform random winner selection.
//!
//! Selection is an explicit Fisher–Yates shuffle of the participant ids
//! followed by a slice: every subset of the requested size is equally
//! likely, with no bias toward insertion order. Comparator-based shuffles
//! are not uniform and are deliberately avoided.

use rand::seq::SliceRandom;
use rand::Rng;
use tombola_types::{Lottery, LotteryStatus, Participant, ParticipantId, Result, TombolaError};

/// Picks a uniformly random winner subset from the participant set.
///
/// `requested` is silently capped at the participant count: asking for more
/// winners than participants never fails, it awards everyone. This is
/// intentional policy, not an error path.
///
/// The RNG is injected so tests can drive selection with a seeded
/// generator; production callers pass [`rand::rng()`].
///
/// # Errors
///
/// Returns [`TombolaError::AlreadyCompleted`] if the lottery has already
/// drawn, or [`TombolaError::NoParticipants`] if the participant set is
/// empty.
pub fn select_winners<R: Rng + ?Sized>(
    lottery: &Lottery,
    participants: &[Participant],
    requested: u32,
    rng: &mut R,
) -> Result<Vec<ParticipantId>> {
    if lottery.status == LotteryStatus::Completed {
        return Err(TombolaError::AlreadyCompleted { lottery_id: lottery.id });
    }
    if participants.is_empty() {
        return Err(TombolaError::NoParticipants { lottery_id: lottery.id });
    }

    let effective = (requested as usize).min(participants.len());

    let mut ids: Vec<ParticipantId> = participants.iter().map(|p| p.id).collect();
    ids.shuffle(rng);
    ids.truncate(effective);
    Ok(ids)
}
