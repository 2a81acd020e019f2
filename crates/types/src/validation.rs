//! Input validation for request fields.
//!
//! Used at the HTTP boundary before anything touches the store. The
//! capacity/winner-count relationship is the load-bearing rule: every
//! persisted lottery satisfies `1 <= number_of_winners < max_participants`.

use crate::error::{Result, TombolaError};
use crate::model::NewLottery;

/// Maximum lottery name length in UTF-8 bytes.
pub const MAX_NAME_BYTES: usize = 120;

/// Minimum lottery capacity. A draw over fewer than two participants is
/// not a lottery.
pub const MIN_CAPACITY: u32 = 2;

/// Validates a lottery name.
///
/// Names must be non-empty after trimming and at most [`MAX_NAME_BYTES`]
/// bytes.
///
/// # Errors
///
/// Returns [`TombolaError::Validation`] naming the violated constraint.
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(TombolaError::Validation {
            field: "name".to_string(),
            constraint: "must not be empty".to_string(),
        });
    }
    if name.len() > MAX_NAME_BYTES {
        return Err(TombolaError::Validation {
            field: "name".to_string(),
            constraint: format!(
                "length {} bytes exceeds maximum {} bytes",
                name.len(),
                MAX_NAME_BYTES
            ),
        });
    }
    Ok(())
}

/// Validates the capacity/winner-count pair.
///
/// Requires `max_participants >= 2` and
/// `1 <= number_of_winners < max_participants`.
///
/// # Errors
///
/// Returns [`TombolaError::Validation`] naming the violated constraint.
pub fn validate_draw_shape(max_participants: u32, number_of_winners: u32) -> Result<()> {
    if max_participants < MIN_CAPACITY {
        return Err(TombolaError::Validation {
            field: "max_participants".to_string(),
            constraint: format!("must be at least {MIN_CAPACITY}, got {max_participants}"),
        });
    }
    if number_of_winners == 0 {
        return Err(TombolaError::Validation {
            field: "number_of_winners".to_string(),
            constraint: "must be at least 1".to_string(),
        });
    }
    if number_of_winners >= max_participants {
        return Err(TombolaError::Validation {
            field: "number_of_winners".to_string(),
            constraint: format!(
                "must be strictly below max_participants ({number_of_winners} >= {max_participants})"
            ),
        });
    }
    Ok(())
}

/// Validates a complete lottery creation request.
///
/// # Errors
///
/// Returns [`TombolaError::Validation`] for the first violated constraint.
pub fn validate_new_lottery(new: &NewLottery) -> Result<()> {
    validate_name(&new.name)?;
    validate_draw_shape(new.max_participants, new.number_of_winners)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::UserId;

    fn new_lottery(max: u32, winners: u32) -> NewLottery {
        NewLottery {
            name: "Launch raffle".to_string(),
            max_participants: max,
            number_of_winners: winners,
            created_by: UserId::new(1),
            prize: None,
        }
    }

    #[test]
    fn test_accepts_valid_shape() {
        assert!(validate_new_lottery(&new_lottery(10, 3)).is_ok());
        assert!(validate_new_lottery(&new_lottery(2, 1)).is_ok());
    }

    #[test]
    fn test_rejects_empty_name() {
        let mut lottery = new_lottery(10, 3);
        lottery.name = "   ".to_string();
        let err = validate_new_lottery(&lottery).unwrap_err();
        assert!(matches!(err, TombolaError::Validation { ref field, .. } if field == "name"));
    }

    #[test]
    fn test_rejects_oversized_name() {
        let mut lottery = new_lottery(10, 3);
        lottery.name = "x".repeat(MAX_NAME_BYTES + 1);
        assert!(validate_new_lottery(&lottery).is_err());
    }

    #[test]
    fn test_rejects_capacity_below_two() {
        for max in [0, 1] {
            let err = validate_draw_shape(max, 1).unwrap_err();
            assert!(
                matches!(err, TombolaError::Validation { ref field, .. } if field == "max_participants"),
                "capacity {max} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_zero_winners() {
        let err = validate_draw_shape(10, 0).unwrap_err();
        assert!(
            matches!(err, TombolaError::Validation { ref field, .. } if field == "number_of_winners")
        );
    }

    #[test]
    fn test_rejects_winners_at_or_above_capacity() {
        // number_of_winners must be strictly below max_participants
        assert!(validate_draw_shape(10, 10).is_err());
        assert!(validate_draw_shape(10, 11).is_err());
        assert!(validate_draw_shape(10, 9).is_ok());
    }
}
