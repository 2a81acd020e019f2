//! Table definitions for redb storage.
//!
//! Entity tables are keyed by the raw Snowflake ID; association tables use
//! composite big-endian byte keys so that all rows of one lottery form a
//! contiguous range (see the keys module).

use redb::TableDefinition;

/// Table definitions for lottery storage.
pub struct Tables;

impl Tables {
    /// User storage: user_id → serialized StoredUser
    pub const USERS: TableDefinition<'static, u64, &'static [u8]> = TableDefinition::new("users");

    /// Username index: username → user_id
    /// Enforces username uniqueness and serves login lookups.
    pub const USERNAMES: TableDefinition<'static, &'static str, u64> =
        TableDefinition::new("usernames");

    /// Lottery storage: lottery_id → serialized Lottery
    pub const LOTTERIES: TableDefinition<'static, u64, &'static [u8]> =
        TableDefinition::new("lotteries");

    /// Participation records: {lottery_id:8BE}{participant_id:8BE} → serialized Participant
    /// Prefix scan by lottery_id yields a lottery's participants in join order.
    pub const PARTICIPANTS: TableDefinition<'static, &'static [u8], &'static [u8]> =
        TableDefinition::new("participants");

    /// Membership index: {lottery_id:8BE}{user_id:8BE} → participant_id
    /// Enforces the one-record-per-(lottery, user) invariant and serves
    /// duplicate-join checks and participant counting.
    pub const MEMBERS: TableDefinition<'static, &'static [u8], u64> =
        TableDefinition::new("members");
}

#[cfg(test)]
mod tests {
    use redb::TableHandle;

    use super::*;

    #[test]
    fn test_table_names_unique() {
        let names = [
            Tables::USERS.name().to_string(),
            Tables::USERNAMES.name().to_string(),
            Tables::LOTTERIES.name().to_string(),
            Tables::PARTICIPANTS.name().to_string(),
            Tables::MEMBERS.name().to_string(),
        ];
        for (i, a) in names.iter().enumerate() {
            for b in names.iter().skip(i + 1) {
                assert_ne!(a, b, "table names must be distinct");
            }
        }
    }
}
