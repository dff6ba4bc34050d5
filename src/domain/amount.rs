//! Bounds shared by every money column (`NUMERIC(14, 2)`) and the odds
//! column (`NUMERIC(10, 3)`).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{BetTrackerError, Result};

/// Largest magnitude a money column can hold
pub const MAX_AMOUNT: Decimal = dec!(999_999_999_999.99);

/// Largest odds the odds column can hold
pub const MAX_ODDS: Decimal = dec!(9_999_999.999);

/// Reject a money value whose magnitude the schema cannot store
pub fn check_amount(field: &str, value: Decimal) -> Result<Decimal> {
    if value.abs() > MAX_AMOUNT {
        return Err(BetTrackerError::Validation(format!(
            "{} exceeds the maximum of {}",
            field, MAX_AMOUNT
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_amount_bounds() {
        assert_eq!(check_amount("stake", MAX_AMOUNT).unwrap(), MAX_AMOUNT);
        assert_eq!(check_amount("stake", -MAX_AMOUNT).unwrap(), -MAX_AMOUNT);
        assert!(check_amount("stake", MAX_AMOUNT + dec!(0.01)).is_err());
        assert!(check_amount("stake", Decimal::MAX).is_err());
        assert!(check_amount("stake", Decimal::MIN).is_err());
    }
}
