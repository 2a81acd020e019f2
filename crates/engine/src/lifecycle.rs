//! Lifecycle guards for the two-state lottery machine.
//!
//! States: `active`, `completed`. Single transition `active → completed`,
//! fired after a draw commits. There is no transition out of `completed`.
//!
//! These functions are pure pre-checks; the store re-enforces the same
//! rules inside its write transactions, which makes the store the
//! authority and these guards the fast path.

use tombola_types::{Lottery, LotteryStatus, Result, TombolaError};

/// Checks whether a lottery can accept one more join.
///
/// # Errors
///
/// Returns [`TombolaError::LotteryNotActive`] if the lottery is not in the
/// `active` state, or [`TombolaError::LotteryFull`] if the current
/// participant count has reached capacity.
pub fn can_accept_join(lottery: &Lottery, current_count: u32) -> Result<()> {
    if !lottery.is_active() {
        return Err(TombolaError::LotteryNotActive { lottery_id: lottery.id });
    }
    if current_count >= lottery.max_participants {
        return Err(TombolaError::LotteryFull {
            lottery_id: lottery.id,
            max_participants: lottery.max_participants,
        });
    }
    Ok(())
}

/// Whether a lottery just reached capacity.
///
/// True iff `current_count == max_participants` exactly. A join that would
/// exceed capacity is rejected before insertion, so equality is the only
/// reachable condition at trigger time; `>=` would mask an over-fill bug
/// instead of letting the count assertion fail loudly in tests.
#[must_use]
pub fn is_now_full(current_count: u32, lottery: &Lottery) -> bool {
    current_count == lottery.max_participants
}

/// Returns the lottery transitioned to `completed`.
///
/// # Errors
///
/// Returns [`TombolaError::AlreadyCompleted`] if the lottery has already
/// completed; the transition fires exactly once.
pub fn mark_completed(lottery: &Lottery) -> Result<Lottery> {
    if lottery.status == LotteryStatus::Completed {
        return Err(TombolaError::AlreadyCompleted { lottery_id: lottery.id });
    }
    let mut completed = lottery.clone();
    completed.status = LotteryStatus::Completed;
    Ok(completed)
}
