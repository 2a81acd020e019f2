//! Composite key encoding for association tables.
//!
//! Keys are big-endian so lexicographic byte order matches numeric order:
//! all rows of one lottery are contiguous and can be walked with a prefix
//! scan.

use tombola_types::{LotteryId, ParticipantId, UserId};

/// Length of the per-lottery key prefix.
pub const PREFIX_LEN: usize = 8;

/// Encodes the `{lottery_id:8BE}` scan prefix.
pub fn lottery_prefix(lottery_id: LotteryId) -> [u8; PREFIX_LEN] {
    lottery_id.value().to_be_bytes()
}

/// Encodes a participation-record key: `{lottery_id:8BE}{participant_id:8BE}`.
pub fn participant_key(lottery_id: LotteryId, participant_id: ParticipantId) -> [u8; 16] {
    compose(lottery_id.value(), participant_id.value())
}

/// Encodes a membership-index key: `{lottery_id:8BE}{user_id:8BE}`.
pub fn member_key(lottery_id: LotteryId, user_id: UserId) -> [u8; 16] {
    compose(lottery_id.value(), user_id.value())
}

fn compose(prefix: u64, suffix: u64) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&prefix.to_be_bytes());
    key[8..].copy_from_slice(&suffix.to_be_bytes());
    key
}

/// Whether a composite key belongs to the given lottery prefix.
pub fn in_prefix(key: &[u8], prefix: &[u8; PREFIX_LEN]) -> bool {
    key.len() >= PREFIX_LEN && key[..PREFIX_LEN] == prefix[..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_key_layout() {
        let key = participant_key(LotteryId::new(0x0102), ParticipantId::new(0x0304));
        assert_eq!(&key[..8], &0x0102u64.to_be_bytes());
        assert_eq!(&key[8..], &0x0304u64.to_be_bytes());
    }

    #[test]
    fn test_prefix_membership() {
        let prefix = lottery_prefix(LotteryId::new(7));
        let inside = member_key(LotteryId::new(7), UserId::new(1));
        let outside = member_key(LotteryId::new(8), UserId::new(1));
        assert!(in_prefix(&inside, &prefix));
        assert!(!in_prefix(&outside, &prefix));
    }

    #[test]
    fn test_keys_sort_by_lottery_then_suffix() {
        let a = participant_key(LotteryId::new(1), ParticipantId::new(u64::MAX));
        let b = participant_key(LotteryId::new(2), ParticipantId::new(0));
        assert!(a < b, "all keys of lottery 1 must sort before lottery 2");
    }
}
