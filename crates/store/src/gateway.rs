//! Gateway operations over the embedded database.
//!
//! Every mutating operation is a single write transaction. redb serializes
//! writers, so the capacity re-check inside [`Store::insert_participant`]
//! and the winner-flags-plus-status unit inside [`Store::commit_draw`] are
//! authoritative regardless of how many requests race above the store.

use std::path::Path;

use redb::{Database, ReadableTable};
use serde::{Deserialize, Serialize};
use tombola_types::{
    snowflake, Lottery, LotteryId, LotteryStatus, LotteryView, NewLottery, Participant,
    ParticipantId, ParticipantView, Result, TombolaError, User, UserId, UserType,
};

use crate::codec::{decode, encode, store_error};
use crate::keys;
use crate::tables::Tables;

/// A user row as persisted: the public record plus demo credentials.
///
/// The password never leaves this crate; login goes through
/// [`Store::authenticate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredUser {
    user: User,
    password: String,
}

/// Seed input for first-boot account creation.
#[derive(Debug, Clone)]
pub struct SeedUser {
    /// Login name, unique.
    pub username: String,
    /// Display name.
    pub name: String,
    /// Account role.
    pub user_type: UserType,
    /// Demo password, stored as-is.
    pub password: String,
}

/// Result of a successful participant insert.
#[derive(Debug, Clone)]
pub struct JoinInsert {
    /// The created participation record.
    pub participant: Participant,
    /// Authoritative participant count after the insert.
    pub new_count: u32,
}

/// The store gateway.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct Store {
    db: Database,
}

impl Store {
    /// Opens (or creates) the database at `path` and ensures all tables
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns [`TombolaError::Store`] if the database cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Database::create(path).map_err(store_error)?;

        // Create all tables up front so read transactions never observe a
        // missing table.
        let txn = db.begin_write().map_err(store_error)?;
        {
            txn.open_table(Tables::USERS).map_err(store_error)?;
            txn.open_table(Tables::USERNAMES).map_err(store_error)?;
            txn.open_table(Tables::LOTTERIES).map_err(store_error)?;
            txn.open_table(Tables::PARTICIPANTS).map_err(store_error)?;
            txn.open_table(Tables::MEMBERS).map_err(store_error)?;
        }
        txn.commit().map_err(store_error)?;

        Ok(Self { db })
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Inserts seed accounts that do not exist yet, keyed by username.
    ///
    /// Idempotent across restarts: usernames already present are skipped.
    /// Returns the number of accounts created.
    ///
    /// # Errors
    ///
    /// Returns [`TombolaError::Store`] on persistence failure.
    pub fn seed_users(&self, seeds: &[SeedUser]) -> Result<usize> {
        let txn = self.db.begin_write().map_err(store_error)?;
        let mut created = 0;
        {
            let mut users = txn.open_table(Tables::USERS).map_err(store_error)?;
            let mut usernames = txn.open_table(Tables::USERNAMES).map_err(store_error)?;

            for seed in seeds {
                if usernames.get(seed.username.as_str()).map_err(store_error)?.is_some() {
                    continue;
                }
                let id = new_user_id()?;
                let stored = StoredUser {
                    user: User {
                        id,
                        username: seed.username.clone(),
                        name: seed.name.clone(),
                        user_type: seed.user_type,
                    },
                    password: seed.password.clone(),
                };
                users.insert(id.value(), encode(&stored)?.as_slice()).map_err(store_error)?;
                usernames.insert(seed.username.as_str(), id.value()).map_err(store_error)?;
                created += 1;
            }
        }
        txn.commit().map_err(store_error)?;
        if created > 0 {
            tracing::info!(created, "seeded user accounts");
        }
        Ok(created)
    }

    /// Fetches a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`TombolaError::Store`] on persistence failure.
    pub fn get_user(&self, id: UserId) -> Result<Option<User>> {
        let txn = self.db.begin_read().map_err(store_error)?;
        let users = txn.open_table(Tables::USERS).map_err(store_error)?;
        read_user(&users, id)
    }

    /// Fetches a user by username.
    ///
    /// # Errors
    ///
    /// Returns [`TombolaError::Store`] on persistence failure.
    pub fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let txn = self.db.begin_read().map_err(store_error)?;
        let usernames = txn.open_table(Tables::USERNAMES).map_err(store_error)?;
        let Some(id) = usernames.get(username).map_err(store_error)?.map(|g| g.value()) else {
            return Ok(None);
        };
        let users = txn.open_table(Tables::USERS).map_err(store_error)?;
        read_user(&users, UserId::new(id))
    }

    /// Checks a username/password pair against the stored credentials.
    ///
    /// # Errors
    ///
    /// Returns [`TombolaError::InvalidCredentials`] on any mismatch; the
    /// response does not reveal whether the username exists.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let txn = self.db.begin_read().map_err(store_error)?;
        let usernames = txn.open_table(Tables::USERNAMES).map_err(store_error)?;
        let Some(id) = usernames.get(username).map_err(store_error)?.map(|g| g.value()) else {
            return Err(TombolaError::InvalidCredentials);
        };
        let users = txn.open_table(Tables::USERS).map_err(store_error)?;
        let bytes = match users.get(id).map_err(store_error)? {
            Some(guard) => guard.value().to_vec(),
            None => return Err(TombolaError::InvalidCredentials),
        };
        let stored: StoredUser = decode(&bytes)?;
        if stored.password != password {
            return Err(TombolaError::InvalidCredentials);
        }
        Ok(stored.user)
    }

    // ------------------------------------------------------------------
    // Lotteries
    // ------------------------------------------------------------------

    /// Creates a lottery from validated input.
    ///
    /// Callers are expected to have run
    /// [`tombola_types::validation::validate_new_lottery`] first; the store
    /// does not re-validate.
    ///
    /// # Errors
    ///
    /// Returns [`TombolaError::Store`] on persistence failure.
    pub fn create_lottery(&self, new: &NewLottery) -> Result<Lottery> {
        let lottery = Lottery {
            id: new_lottery_id()?,
            name: new.name.clone(),
            max_participants: new.max_participants,
            number_of_winners: new.number_of_winners,
            status: LotteryStatus::Active,
            created_at: chrono::Utc::now(),
            created_by: new.created_by,
            prize: new.prize.clone(),
        };

        let txn = self.db.begin_write().map_err(store_error)?;
        {
            let mut lotteries = txn.open_table(Tables::LOTTERIES).map_err(store_error)?;
            lotteries
                .insert(lottery.id.value(), encode(&lottery)?.as_slice())
                .map_err(store_error)?;
        }
        txn.commit().map_err(store_error)?;

        tracing::debug!(lottery_id = %lottery.id, name = %lottery.name, "created lottery");
        Ok(lottery)
    }

    /// Fetches a lottery by id.
    ///
    /// # Errors
    ///
    /// Returns [`TombolaError::Store`] on persistence failure.
    pub fn get_lottery(&self, id: LotteryId) -> Result<Option<Lottery>> {
        let txn = self.db.begin_read().map_err(store_error)?;
        let lotteries = txn.open_table(Tables::LOTTERIES).map_err(store_error)?;
        read_lottery(&lotteries, id)
    }

    /// Lists all lotteries, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TombolaError::Store`] on persistence failure.
    pub fn list_lotteries(&self) -> Result<Vec<Lottery>> {
        let txn = self.db.begin_read().map_err(store_error)?;
        let lotteries = txn.open_table(Tables::LOTTERIES).map_err(store_error)?;

        let mut all = Vec::new();
        for item in lotteries.iter().map_err(store_error)? {
            let (_, value) = item.map_err(store_error)?;
            all.push(decode::<Lottery>(value.value())?);
        }
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    /// Lists all lotteries with nested participants and users, newest
    /// first. This is the `GET /lotteries` read path.
    ///
    /// # Errors
    ///
    /// Returns [`TombolaError::Store`] on persistence failure.
    pub fn list_lotteries_with_participants(&self) -> Result<Vec<LotteryView>> {
        let txn = self.db.begin_read().map_err(store_error)?;
        let lotteries = txn.open_table(Tables::LOTTERIES).map_err(store_error)?;
        let participants = txn.open_table(Tables::PARTICIPANTS).map_err(store_error)?;
        let users = txn.open_table(Tables::USERS).map_err(store_error)?;

        let mut views = Vec::new();
        for item in lotteries.iter().map_err(store_error)? {
            let (_, value) = item.map_err(store_error)?;
            let lottery: Lottery = decode(value.value())?;
            let records = scan_participants(&participants, lottery.id)?;
            let mut nested = Vec::with_capacity(records.len());
            for record in records {
                let user = read_user(&users, record.user_id)?.ok_or_else(|| {
                    TombolaError::UserNotFound { user_id: record.user_id }
                })?;
                nested.push(ParticipantView::new(record, user));
            }
            views.push(LotteryView { lottery, participants: nested });
        }
        views.sort_by(|a, b| b.lottery.created_at.cmp(&a.lottery.created_at));
        Ok(views)
    }

    /// Flips a lottery's status outside the draw path.
    ///
    /// The lifecycle engine is the only production caller. Transitions out
    /// of `Completed` are refused: a completed lottery is never reopened.
    ///
    /// # Errors
    ///
    /// Returns [`TombolaError::LotteryNotFound`] if absent and
    /// [`TombolaError::AlreadyCompleted`] if the lottery already completed.
    pub fn set_lottery_status(&self, id: LotteryId, status: LotteryStatus) -> Result<Lottery> {
        let txn = self.db.begin_write().map_err(store_error)?;
        let updated = {
            let mut lotteries = txn.open_table(Tables::LOTTERIES).map_err(store_error)?;
            let mut lottery = read_lottery(&lotteries, id)?
                .ok_or(TombolaError::LotteryNotFound { lottery_id: id })?;
            if lottery.status == LotteryStatus::Completed {
                return Err(TombolaError::AlreadyCompleted { lottery_id: id });
            }
            lottery.status = status;
            lotteries.insert(id.value(), encode(&lottery)?.as_slice()).map_err(store_error)?;
            lottery
        };
        txn.commit().map_err(store_error)?;
        Ok(updated)
    }

    // ------------------------------------------------------------------
    // Participants
    // ------------------------------------------------------------------

    /// Counts the participation records of a lottery.
    ///
    /// # Errors
    ///
    /// Returns [`TombolaError::Store`] on persistence failure.
    pub fn count_participants(&self, lottery_id: LotteryId) -> Result<u32> {
        let txn = self.db.begin_read().map_err(store_error)?;
        let members = txn.open_table(Tables::MEMBERS).map_err(store_error)?;
        count_members(&members, lottery_id)
    }

    /// Lists the participation records of a lottery in join order.
    ///
    /// # Errors
    ///
    /// Returns [`TombolaError::Store`] on persistence failure.
    pub fn list_participants(&self, lottery_id: LotteryId) -> Result<Vec<Participant>> {
        let txn = self.db.begin_read().map_err(store_error)?;
        let participants = txn.open_table(Tables::PARTICIPANTS).map_err(store_error)?;
        scan_participants(&participants, lottery_id)
    }

    /// Lists the participation records of a lottery with users nested.
    ///
    /// # Errors
    ///
    /// Returns [`TombolaError::Store`] on persistence failure, or
    /// [`TombolaError::UserNotFound`] if a record references a missing user.
    pub fn list_participants_with_users(
        &self,
        lottery_id: LotteryId,
    ) -> Result<Vec<ParticipantView>> {
        let txn = self.db.begin_read().map_err(store_error)?;
        let participants = txn.open_table(Tables::PARTICIPANTS).map_err(store_error)?;
        let users = txn.open_table(Tables::USERS).map_err(store_error)?;

        let records = scan_participants(&participants, lottery_id)?;
        let mut views = Vec::with_capacity(records.len());
        for record in records {
            let user = read_user(&users, record.user_id)?
                .ok_or(TombolaError::UserNotFound { user_id: record.user_id })?;
            views.push(ParticipantView::new(record, user));
        }
        Ok(views)
    }

    /// Inserts a participation record, enforcing every join invariant
    /// inside one write transaction:
    ///
    /// - the lottery exists and is active
    /// - the authoritative count is below capacity
    /// - no record exists for this `(lottery, user)` pair
    ///
    /// Concurrent joins therefore cannot over-fill a lottery or duplicate a
    /// membership, whatever the callers observed before entering.
    ///
    /// # Errors
    ///
    /// Returns [`TombolaError::LotteryNotFound`],
    /// [`TombolaError::LotteryNotActive`], [`TombolaError::LotteryFull`],
    /// [`TombolaError::AlreadyJoined`], or [`TombolaError::Store`].
    pub fn insert_participant(
        &self,
        lottery_id: LotteryId,
        user_id: UserId,
    ) -> Result<JoinInsert> {
        let txn = self.db.begin_write().map_err(store_error)?;
        let insert = {
            let lotteries = txn.open_table(Tables::LOTTERIES).map_err(store_error)?;
            let mut participants = txn.open_table(Tables::PARTICIPANTS).map_err(store_error)?;
            let mut members = txn.open_table(Tables::MEMBERS).map_err(store_error)?;

            let lottery = read_lottery(&lotteries, lottery_id)?
                .ok_or(TombolaError::LotteryNotFound { lottery_id })?;
            if !lottery.is_active() {
                return Err(TombolaError::LotteryNotActive { lottery_id });
            }

            let member = keys::member_key(lottery_id, user_id);
            if members.get(&member[..]).map_err(store_error)?.is_some() {
                return Err(TombolaError::AlreadyJoined { lottery_id, user_id });
            }

            let count = count_members(&members, lottery_id)?;
            if count >= lottery.max_participants {
                return Err(TombolaError::LotteryFull {
                    lottery_id,
                    max_participants: lottery.max_participants,
                });
            }

            let participant = Participant {
                id: new_participant_id()?,
                lottery_id,
                user_id,
                is_winner: false,
                joined_at: chrono::Utc::now(),
            };
            let key = keys::participant_key(lottery_id, participant.id);
            participants
                .insert(&key[..], encode(&participant)?.as_slice())
                .map_err(store_error)?;
            members.insert(&member[..], participant.id.value()).map_err(store_error)?;

            JoinInsert { participant, new_count: count + 1 }
        };
        txn.commit().map_err(store_error)?;

        tracing::debug!(
            lottery_id = %lottery_id,
            user_id = %user_id,
            new_count = insert.new_count,
            "participant joined"
        );
        Ok(insert)
    }

    /// Commits a draw: flags every selected participant as a winner and
    /// flips the lottery to `Completed`, all in one write transaction.
    ///
    /// If any winner row cannot be updated the transaction is aborted:
    /// nothing is persisted and the status stays `Active`, so selection can
    /// be re-run.
    ///
    /// # Errors
    ///
    /// Returns [`TombolaError::LotteryNotFound`],
    /// [`TombolaError::AlreadyCompleted`],
    /// [`TombolaError::PartialCommit`] (winner row missing; transaction
    /// aborted), or [`TombolaError::Store`].
    pub fn commit_draw(
        &self,
        lottery_id: LotteryId,
        winner_ids: &[ParticipantId],
    ) -> Result<Lottery> {
        let txn = self.db.begin_write().map_err(store_error)?;
        let updated = {
            let mut lotteries = txn.open_table(Tables::LOTTERIES).map_err(store_error)?;
            let mut participants = txn.open_table(Tables::PARTICIPANTS).map_err(store_error)?;

            let mut lottery = read_lottery(&lotteries, lottery_id)?
                .ok_or(TombolaError::LotteryNotFound { lottery_id })?;
            if lottery.status == LotteryStatus::Completed {
                return Err(TombolaError::AlreadyCompleted { lottery_id });
            }

            for (written, winner_id) in winner_ids.iter().enumerate() {
                let key = keys::participant_key(lottery_id, *winner_id);
                let bytes = match participants.get(&key[..]).map_err(store_error)? {
                    Some(guard) => guard.value().to_vec(),
                    None => {
                        // Dropping the transaction aborts every staged write.
                        return Err(TombolaError::PartialCommit {
                            lottery_id,
                            written,
                            requested: winner_ids.len(),
                        });
                    },
                };
                let mut record: Participant = decode(&bytes)?;
                record.is_winner = true;
                participants.insert(&key[..], encode(&record)?.as_slice()).map_err(store_error)?;
            }

            lottery.status = LotteryStatus::Completed;
            lotteries
                .insert(lottery_id.value(), encode(&lottery)?.as_slice())
                .map_err(store_error)?;
            lottery
        };
        txn.commit().map_err(store_error)?;

        tracing::debug!(
            lottery_id = %lottery_id,
            winners = winner_ids.len(),
            "draw committed, lottery completed"
        );
        Ok(updated)
    }
}

// ----------------------------------------------------------------------
// Shared read helpers
// ----------------------------------------------------------------------

fn read_user(
    users: &impl ReadableTable<u64, &'static [u8]>,
    id: UserId,
) -> Result<Option<User>> {
    match users.get(id.value()).map_err(store_error)? {
        Some(guard) => {
            let stored: StoredUser = decode(guard.value())?;
            Ok(Some(stored.user))
        },
        None => Ok(None),
    }
}

fn read_lottery(
    lotteries: &impl ReadableTable<u64, &'static [u8]>,
    id: LotteryId,
) -> Result<Option<Lottery>> {
    match lotteries.get(id.value()).map_err(store_error)? {
        Some(guard) => Ok(Some(decode(guard.value())?)),
        None => Ok(None),
    }
}

fn scan_participants(
    participants: &impl ReadableTable<&'static [u8], &'static [u8]>,
    lottery_id: LotteryId,
) -> Result<Vec<Participant>> {
    let prefix = keys::lottery_prefix(lottery_id);
    let mut records = Vec::new();
    for item in participants.range(&prefix[..]..).map_err(store_error)? {
        let (key, value) = item.map_err(store_error)?;
        if !keys::in_prefix(key.value(), &prefix) {
            break;
        }
        records.push(decode::<Participant>(value.value())?);
    }
    Ok(records)
}

fn count_members(
    members: &impl ReadableTable<&'static [u8], u64>,
    lottery_id: LotteryId,
) -> Result<u32> {
    let prefix = keys::lottery_prefix(lottery_id);
    let mut count = 0u32;
    for item in members.range(&prefix[..]..).map_err(store_error)? {
        let (key, _) = item.map_err(store_error)?;
        if !keys::in_prefix(key.value(), &prefix) {
            break;
        }
        count += 1;
    }
    Ok(count)
}

fn new_user_id() -> Result<UserId> {
    snowflake::generate_user_id().map_err(id_error)
}

fn new_lottery_id() -> Result<LotteryId> {
    snowflake::generate_lottery_id().map_err(id_error)
}

fn new_participant_id() -> Result<ParticipantId> {
    snowflake::generate_participant_id().map_err(id_error)
}

#[track_caller]
fn id_error(err: snowflake::SnowflakeError) -> TombolaError {
    let loc = std::panic::Location::caller();
    TombolaError::Internal {
        message: format!("id generation failed: {err}"),
        location: snafu::Location::new(loc.file(), loc.line(), loc.column()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tombola_types::ErrorCode;

    use super::*;

    fn open_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("tombola.redb")).unwrap();
        (dir, store)
    }

    fn seed(store: &Store, usernames: &[&str]) -> Vec<User> {
        let seeds: Vec<SeedUser> = usernames
            .iter()
            .map(|u| SeedUser {
                username: (*u).to_string(),
                name: format!("{u} name"),
                user_type: UserType::Participant,
                password: (*u).to_string(),
            })
            .collect();
        store.seed_users(&seeds).unwrap();
        usernames
            .iter()
            .map(|u| store.find_user_by_username(u).unwrap().unwrap())
            .collect()
    }

    fn make_lottery(store: &Store, admin: UserId, max: u32, winners: u32) -> Lottery {
        store
            .create_lottery(&NewLottery {
                name: "Test draw".to_string(),
                max_participants: max,
                number_of_winners: winners,
                created_by: admin,
                prize: None,
            })
            .unwrap()
    }

    #[test]
    fn test_seed_users_is_idempotent() {
        let (_dir, store) = open_store();
        let seeds = vec![SeedUser {
            username: "admin".to_string(),
            name: "Admin User".to_string(),
            user_type: UserType::Admin,
            password: "admin".to_string(),
        }];
        assert_eq!(store.seed_users(&seeds).unwrap(), 1);
        assert_eq!(store.seed_users(&seeds).unwrap(), 0, "second seed must be a no-op");

        let user = store.find_user_by_username("admin").unwrap().unwrap();
        assert_eq!(user.user_type, UserType::Admin);
        assert_eq!(store.get_user(user.id).unwrap().unwrap(), user);
    }

    #[test]
    fn test_authenticate() {
        let (_dir, store) = open_store();
        seed(&store, &["alice"]);

        let user = store.authenticate("alice", "alice").unwrap();
        assert_eq!(user.username, "alice");

        let err = store.authenticate("alice", "wrong").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidCredentials);
        let err = store.authenticate("nobody", "alice").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidCredentials);
    }

    #[test]
    fn test_create_and_list_lotteries_newest_first() {
        let (_dir, store) = open_store();
        let users = seed(&store, &["admin"]);

        let first = make_lottery(&store, users[0].id, 5, 2);
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = make_lottery(&store, users[0].id, 3, 1);

        let listed = store.list_lotteries().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id, "newest lottery first");
        assert_eq!(listed[1].id, first.id);
        assert_eq!(store.get_lottery(first.id).unwrap().unwrap().status, LotteryStatus::Active);
    }

    #[test]
    fn test_insert_participant_enforces_uniqueness() {
        let (_dir, store) = open_store();
        let users = seed(&store, &["admin", "p1"]);
        let lottery = make_lottery(&store, users[0].id, 5, 1);

        let insert = store.insert_participant(lottery.id, users[1].id).unwrap();
        assert_eq!(insert.new_count, 1);
        assert!(!insert.participant.is_winner);

        let err = store.insert_participant(lottery.id, users[1].id).unwrap_err();
        assert_eq!(err.code(), ErrorCode::AlreadyJoined);
        assert_eq!(store.count_participants(lottery.id).unwrap(), 1);
    }

    #[test]
    fn test_insert_participant_enforces_capacity() {
        let (_dir, store) = open_store();
        let users = seed(&store, &["admin", "p1", "p2", "p3"]);
        let lottery = make_lottery(&store, users[0].id, 2, 1);

        store.insert_participant(lottery.id, users[1].id).unwrap();
        let insert = store.insert_participant(lottery.id, users[2].id).unwrap();
        assert_eq!(insert.new_count, 2);

        let err = store.insert_participant(lottery.id, users[3].id).unwrap_err();
        assert_eq!(err.code(), ErrorCode::LotteryFull);
        assert_eq!(store.count_participants(lottery.id).unwrap(), 2);
    }

    #[test]
    fn test_insert_participant_rejects_unknown_lottery() {
        let (_dir, store) = open_store();
        let users = seed(&store, &["p1"]);
        let err = store.insert_participant(LotteryId::new(12345), users[0].id).unwrap_err();
        assert_eq!(err.code(), ErrorCode::LotteryNotFound);
    }

    #[test]
    fn test_commit_draw_flags_winners_and_completes() {
        let (_dir, store) = open_store();
        let users = seed(&store, &["admin", "p1", "p2", "p3"]);
        let lottery = make_lottery(&store, users[0].id, 3, 2);

        for user in &users[1..] {
            store.insert_participant(lottery.id, user.id).unwrap();
        }
        let records = store.list_participants(lottery.id).unwrap();
        assert_eq!(records.len(), 3);

        let winners = [records[0].id, records[2].id];
        let updated = store.commit_draw(lottery.id, &winners).unwrap();
        assert_eq!(updated.status, LotteryStatus::Completed);

        let after = store.list_participants(lottery.id).unwrap();
        let flagged: Vec<ParticipantId> =
            after.iter().filter(|p| p.is_winner).map(|p| p.id).collect();
        assert_eq!(flagged.len(), 2);
        assert!(flagged.contains(&winners[0]));
        assert!(flagged.contains(&winners[1]));
    }

    #[test]
    fn test_commit_draw_refuses_completed_lottery() {
        let (_dir, store) = open_store();
        let users = seed(&store, &["admin", "p1"]);
        let lottery = make_lottery(&store, users[0].id, 2, 1);
        let insert = store.insert_participant(lottery.id, users[1].id).unwrap();

        store.commit_draw(lottery.id, &[insert.participant.id]).unwrap();
        let err = store.commit_draw(lottery.id, &[insert.participant.id]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::AlreadyCompleted);
    }

    #[test]
    fn test_commit_draw_aborts_on_missing_winner_row() {
        let (_dir, store) = open_store();
        let users = seed(&store, &["admin", "p1"]);
        let lottery = make_lottery(&store, users[0].id, 3, 2);
        let insert = store.insert_participant(lottery.id, users[1].id).unwrap();

        // Second winner id does not exist: the whole transaction must abort.
        let bogus = ParticipantId::new(999_999);
        let err = store.commit_draw(lottery.id, &[insert.participant.id, bogus]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::PartialCommit);

        // Nothing persisted: no winner flag, status still active.
        let after = store.list_participants(lottery.id).unwrap();
        assert!(after.iter().all(|p| !p.is_winner), "no winner flag may survive the abort");
        assert_eq!(
            store.get_lottery(lottery.id).unwrap().unwrap().status,
            LotteryStatus::Active,
            "status must not flip on a failed draw commit"
        );

        // And the draw remains re-runnable.
        store.commit_draw(lottery.id, &[insert.participant.id]).unwrap();
    }

    #[test]
    fn test_set_lottery_status_refuses_reopen() {
        let (_dir, store) = open_store();
        let users = seed(&store, &["admin"]);
        let lottery = make_lottery(&store, users[0].id, 2, 1);

        let updated = store.set_lottery_status(lottery.id, LotteryStatus::Completed).unwrap();
        assert_eq!(updated.status, LotteryStatus::Completed);

        let err = store.set_lottery_status(lottery.id, LotteryStatus::Active).unwrap_err();
        assert_eq!(err.code(), ErrorCode::AlreadyCompleted);
    }

    #[test]
    fn test_nested_listing_shape() {
        let (_dir, store) = open_store();
        let users = seed(&store, &["admin", "p1", "p2"]);
        let lottery = make_lottery(&store, users[0].id, 4, 1);
        store.insert_participant(lottery.id, users[1].id).unwrap();
        store.insert_participant(lottery.id, users[2].id).unwrap();

        let views = store.list_lotteries_with_participants().unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].participants.len(), 2);
        assert_eq!(views[0].participants[0].user.username, "p1");
        assert_eq!(views[0].participants[1].user.username, "p2");
    }

    #[test]
    fn test_participants_isolated_per_lottery() {
        let (_dir, store) = open_store();
        let users = seed(&store, &["admin", "p1"]);
        let a = make_lottery(&store, users[0].id, 3, 1);
        let b = make_lottery(&store, users[0].id, 3, 1);

        store.insert_participant(a.id, users[1].id).unwrap();
        // Same user may join a different lottery.
        store.insert_participant(b.id, users[1].id).unwrap();

        assert_eq!(store.count_participants(a.id).unwrap(), 1);
        assert_eq!(store.count_participants(b.id).unwrap(), 1);
        assert_eq!(store.list_participants(a.id).unwrap().len(), 1);
    }
}
