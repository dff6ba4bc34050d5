use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{check_amount, Mode, MAX_ODDS};
use crate::error::{BetTrackerError, Result};

/// Bet outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    Pending,
    Won,
    Lost,
}

impl BetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BetStatus::Pending => "pending",
            BetStatus::Won => "won",
            BetStatus::Lost => "lost",
        }
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, BetStatus::Pending)
    }
}

impl std::fmt::Display for BetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for BetStatus {
    type Error = String;

    fn try_from(s: &str) -> std::result::Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(BetStatus::Pending),
            "won" => Ok(BetStatus::Won),
            "lost" => Ok(BetStatus::Lost),
            _ => Err(format!("Unknown bet status: {}", s)),
        }
    }
}

/// A recorded bet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mode: Mode,
    pub date: DateTime<Utc>,
    pub stake: Decimal,
    pub odds: Decimal,
    pub payout: Decimal,
    pub profit: Decimal,
    pub status: BetStatus,
    pub bet_type: Option<String>,
    pub hippodrome: Option<String>,
    pub platform: Option<String>,
    pub tipster_id: Option<Uuid>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bet {
    pub fn is_won(&self) -> bool {
        self.status == BetStatus::Won
    }

    pub fn is_lost(&self) -> bool {
        self.status == BetStatus::Lost
    }
}

/// Payout and profit implied by a bet's status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub payout: Decimal,
    pub profit: Decimal,
}

impl Settlement {
    /// Won bets pay `payout` (or stake × odds when omitted); lost bets forfeit
    /// the stake; pending bets carry no result yet.
    pub fn compute(
        status: BetStatus,
        stake: Decimal,
        odds: Decimal,
        payout: Option<Decimal>,
    ) -> Result<Self> {
        let settlement = match status {
            BetStatus::Won => {
                let payout = match payout {
                    Some(payout) => payout,
                    None => stake.checked_mul(odds).ok_or_else(|| {
                        BetTrackerError::Validation("stake × odds is out of range".to_string())
                    })?,
                };
                let profit = payout.checked_sub(stake).ok_or_else(|| {
                    BetTrackerError::Validation("profit is out of range".to_string())
                })?;
                Self { payout, profit }
            }
            BetStatus::Lost => Self {
                payout: Decimal::ZERO,
                profit: -stake,
            },
            BetStatus::Pending => Self {
                payout: Decimal::ZERO,
                profit: Decimal::ZERO,
            },
        };
        check_amount("payout", settlement.payout)?;
        check_amount("profit", settlement.profit)?;
        Ok(settlement)
    }
}

/// Input for creating or replacing a bet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetDraft {
    #[serde(default)]
    pub mode: Mode,
    pub date: DateTime<Utc>,
    pub stake: Decimal,
    pub odds: Decimal,
    #[serde(default = "default_status")]
    pub status: BetStatus,
    /// Only meaningful for won bets; derived from stake × odds when omitted
    #[serde(default)]
    pub payout: Option<Decimal>,
    #[serde(default)]
    pub bet_type: Option<String>,
    #[serde(default)]
    pub hippodrome: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub tipster_id: Option<Uuid>,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_status() -> BetStatus {
    BetStatus::Pending
}

impl BetDraft {
    pub fn validate(&self) -> Result<()> {
        if self.stake <= Decimal::ZERO {
            return Err(BetTrackerError::Validation(
                "stake must be greater than zero".to_string(),
            ));
        }
        if self.odds < Decimal::ONE {
            return Err(BetTrackerError::Validation(
                "odds must be at least 1.0".to_string(),
            ));
        }
        if self.odds > MAX_ODDS {
            return Err(BetTrackerError::Validation(format!(
                "odds exceeds the maximum of {}",
                MAX_ODDS
            )));
        }
        check_amount("stake", self.stake)?;
        if let Some(payout) = self.payout {
            if payout < Decimal::ZERO {
                return Err(BetTrackerError::Validation(
                    "payout cannot be negative".to_string(),
                ));
            }
            check_amount("payout", payout)?;
        }
        self.settlement().map(|_| ())
    }

    pub fn settlement(&self) -> Result<Settlement> {
        Settlement::compute(self.status, self.stake, self.odds, self.payout)
    }
}

/// Filters accepted by the bet listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BetFilter {
    #[serde(default)]
    pub mode: Mode,
    pub status: Option<BetStatus>,
    pub platform: Option<String>,
    pub tipster_id: Option<Uuid>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl BetFilter {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn draft(status: BetStatus, stake: Decimal, odds: Decimal) -> BetDraft {
        BetDraft {
            mode: Mode::Real,
            date: Utc::now(),
            stake,
            odds,
            status,
            payout: None,
            bet_type: None,
            hippodrome: None,
            platform: None,
            tipster_id: None,
            description: None,
        }
    }

    #[test]
    fn test_settlement_won_derives_payout() {
        let s = Settlement::compute(BetStatus::Won, dec!(10), dec!(2.5), None).unwrap();
        assert_eq!(s.payout, dec!(25.0));
        assert_eq!(s.profit, dec!(15.0));
    }

    #[test]
    fn test_settlement_won_explicit_payout() {
        let s = Settlement::compute(BetStatus::Won, dec!(10), dec!(2.5), Some(dec!(22))).unwrap();
        assert_eq!(s.payout, dec!(22));
        assert_eq!(s.profit, dec!(12));
    }

    #[test]
    fn test_settlement_lost_and_pending() {
        let lost =
            Settlement::compute(BetStatus::Lost, dec!(10), dec!(3), Some(dec!(30))).unwrap();
        assert_eq!(lost.payout, Decimal::ZERO);
        assert_eq!(lost.profit, dec!(-10));

        let pending = Settlement::compute(BetStatus::Pending, dec!(10), dec!(3), None).unwrap();
        assert_eq!(pending.payout, Decimal::ZERO);
        assert_eq!(pending.profit, Decimal::ZERO);
    }

    #[test]
    fn test_draft_validation() {
        assert!(draft(BetStatus::Pending, dec!(10), dec!(1.5)).validate().is_ok());
        assert!(draft(BetStatus::Pending, dec!(0), dec!(1.5)).validate().is_err());
        assert!(draft(BetStatus::Pending, dec!(10), dec!(0.9)).validate().is_err());

        let mut negative = draft(BetStatus::Won, dec!(10), dec!(2));
        negative.payout = Some(dec!(-1));
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_draft_rejects_values_beyond_column_range() {
        let huge: Decimal = "79228162514264337593543950335".parse().unwrap();
        let err = draft(BetStatus::Won, huge, dec!(2)).validate();
        assert!(matches!(err, Err(BetTrackerError::Validation(_))));
        assert!(draft(BetStatus::Won, huge, dec!(2)).settlement().is_err());

        assert!(draft(BetStatus::Pending, dec!(10), dec!(10000000)).validate().is_err());
        assert!(draft(BetStatus::Pending, dec!(10), MAX_ODDS).validate().is_ok());

        // Each input fits, the derived payout does not
        let derived = draft(BetStatus::Won, dec!(999999999999), dec!(2));
        assert!(matches!(
            derived.validate(),
            Err(BetTrackerError::Validation(_))
        ));

        let mut payout = draft(BetStatus::Won, dec!(10), dec!(2));
        payout.payout = Some(dec!(1000000000000));
        assert!(payout.validate().is_err());
    }

    #[test]
    fn test_settlement_overflow_is_an_error() {
        let err = Settlement::compute(BetStatus::Won, Decimal::MAX, dec!(2), None);
        assert!(matches!(err, Err(BetTrackerError::Validation(_))));
    }

    #[test]
    fn test_filter_limits() {
        let filter = BetFilter {
            limit: Some(500),
            offset: Some(-3),
            ..Default::default()
        };
        assert_eq!(filter.limit(), 100);
        assert_eq!(filter.offset(), 0);
        assert_eq!(BetFilter::default().limit(), 20);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(BetStatus::try_from("WON").unwrap(), BetStatus::Won);
        assert!(BetStatus::try_from("void").is_err());
        assert!(BetStatus::Lost.is_settled());
        assert!(!BetStatus::Pending.is_settled());
    }
}
