//! Join orchestration and draw running.
//!
//! The engine is the only writer of lottery status and winner flags, both
//! through [`Store::commit_draw`]. Every join runs under the per-lottery
//! lock for the whole read-validate-insert-maybe-draw sequence.

use std::collections::HashSet;
use std::sync::Arc;

use tombola_store::Store;
use tombola_types::{
    ErrorCode, Lottery, LotteryId, Participant, ParticipantView, Result, TombolaError, UserId,
};

use crate::{draw, lifecycle, locks::LotteryLocks};

/// Counter: joins accepted.
pub const JOINS_TOTAL: &str = "lottery_joins_total";
/// Counter: joins rejected (any reason).
pub const JOIN_REJECTIONS_TOTAL: &str = "lottery_join_rejections_total";
/// Counter: draws committed.
pub const DRAWS_TOTAL: &str = "lottery_draws_total";
/// Counter: draws that failed after a successful join or admin trigger.
pub const DRAW_FAILURES_TOTAL: &str = "lottery_draw_failures_total";

/// Result of a successful join.
#[derive(Debug, Clone)]
pub struct JoinReceipt {
    /// The created participation record.
    pub participant: Participant,
    /// Whether this join filled the last slot and triggered the draw.
    pub filled: bool,
    /// Error code of the fill-triggered draw, if it failed.
    ///
    /// The join itself stands either way; a failed draw is reported
    /// distinctly and can be re-run via the selection endpoint because the
    /// draw is idempotent per lottery.
    pub draw_error: Option<ErrorCode>,
}

/// Result of a committed draw.
#[derive(Debug, Clone)]
pub struct DrawOutcome {
    /// The lottery, now completed.
    pub lottery: Lottery,
    /// The selected winners with users nested.
    pub winners: Vec<ParticipantView>,
}

/// The lottery engine: join orchestrator plus draw runner.
#[derive(Clone)]
pub struct Engine {
    store: Arc<Store>,
    locks: Arc<LotteryLocks>,
}

impl Engine {
    /// Creates an engine over the given store.
    pub fn new(store: Arc<Store>) -> Self {
        Self { store, locks: Arc::new(LotteryLocks::new()) }
    }

    /// Joins a user into a lottery and fires the fill-triggered draw when
    /// the join fills the last slot.
    ///
    /// Serialized per lottery: overlapping joins are ordered, so the count
    /// check, the insert, and the draw trigger observe consistent state.
    /// The join succeeds even if the triggered draw fails; the failure is
    /// logged, counted, and reported in the receipt.
    ///
    /// # Errors
    ///
    /// Returns [`TombolaError::LotteryNotFound`],
    /// [`TombolaError::UserNotFound`], [`TombolaError::LotteryNotActive`],
    /// [`TombolaError::LotteryFull`], [`TombolaError::AlreadyJoined`], or
    /// [`TombolaError::Store`].
    pub async fn join(&self, lottery_id: LotteryId, user_id: UserId) -> Result<JoinReceipt> {
        let _guard = self.locks.acquire(lottery_id).await;

        let result = self.join_locked(lottery_id, user_id);
        if result.is_err() {
            metrics::counter!(JOIN_REJECTIONS_TOTAL).increment(1);
        }
        result
    }

    fn join_locked(&self, lottery_id: LotteryId, user_id: UserId) -> Result<JoinReceipt> {
        let lottery = self
            .store
            .get_lottery(lottery_id)?
            .ok_or(TombolaError::LotteryNotFound { lottery_id })?;
        self.store.get_user(user_id)?.ok_or(TombolaError::UserNotFound { user_id })?;

        // Duplicate check first: a user who already holds a record gets
        // AlreadyJoined even when the lottery has since filled or closed.
        let current = self.store.list_participants(lottery_id)?;
        if current.iter().any(|p| p.user_id == user_id) {
            return Err(TombolaError::AlreadyJoined { lottery_id, user_id });
        }
        lifecycle::can_accept_join(&lottery, current.len() as u32)?;

        let insert = self.store.insert_participant(lottery_id, user_id)?;
        metrics::counter!(JOINS_TOTAL).increment(1);

        let mut receipt =
            JoinReceipt { participant: insert.participant, filled: false, draw_error: None };

        if lifecycle::is_now_full(insert.new_count, &lottery) {
            receipt.filled = true;
            match self.draw_locked(lottery_id, None) {
                Ok(outcome) => {
                    tracing::info!(
                        lottery_id = %lottery_id,
                        winners = outcome.winners.len(),
                        "lottery filled, winners drawn"
                    );
                },
                Err(err) => {
                    // The join stands; the draw can be re-run through the
                    // selection endpoint.
                    tracing::error!(
                        lottery_id = %lottery_id,
                        error = %err,
                        code = %err.code(),
                        "fill-triggered draw failed after successful join"
                    );
                    metrics::counter!(DRAW_FAILURES_TOTAL).increment(1);
                    receipt.draw_error = Some(err.code());
                },
            }
        }

        Ok(receipt)
    }

    /// Runs winner selection for a lottery, serialized against joins.
    ///
    /// `requested` of `None` draws the lottery's configured winner count.
    /// This is the admin-triggered path; it is also the retry path after a
    /// failed fill-triggered draw, which is safe because selection re-reads
    /// the participant set and the commit is atomic.
    ///
    /// # Errors
    ///
    /// Returns [`TombolaError::LotteryNotFound`],
    /// [`TombolaError::AlreadyCompleted`],
    /// [`TombolaError::NoParticipants`], [`TombolaError::PartialCommit`],
    /// or [`TombolaError::Store`].
    pub async fn run_draw(
        &self,
        lottery_id: LotteryId,
        requested: Option<u32>,
    ) -> Result<DrawOutcome> {
        let _guard = self.locks.acquire(lottery_id).await;
        self.draw_locked(lottery_id, requested)
    }

    /// Selection + commit. Caller must hold the per-lottery lock.
    fn draw_locked(&self, lottery_id: LotteryId, requested: Option<u32>) -> Result<DrawOutcome> {
        let lottery = self
            .store
            .get_lottery(lottery_id)?
            .ok_or(TombolaError::LotteryNotFound { lottery_id })?;
        let participants = self.store.list_participants(lottery_id)?;

        let requested = requested.unwrap_or(lottery.number_of_winners);
        let winner_ids =
            draw::select_winners(&lottery, &participants, requested, &mut rand::rng())?;
        let completed = self.store.commit_draw(lottery_id, &winner_ids)?;
        metrics::counter!(DRAWS_TOTAL).increment(1);

        let selected: HashSet<_> = winner_ids.into_iter().collect();
        let winners = self
            .store
            .list_participants_with_users(lottery_id)?
            .into_iter()
            .filter(|view| selected.contains(&view.id))
            .collect();

        Ok(DrawOutcome { lottery: completed, winners })
    }

    /// The store behind this engine.
    #[must_use]
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }
}
