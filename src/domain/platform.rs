use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{check_amount, Mode};
use crate::error::{BetTrackerError, Result};

/// A bookmaker account with a tracked bankroll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mode: Mode,
    pub name: String,
    pub initial_bankroll: Decimal,
    pub current_bankroll: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformDraft {
    #[serde(default)]
    pub mode: Mode,
    pub name: String,
    #[serde(default)]
    pub initial_bankroll: Decimal,
}

impl PlatformDraft {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(BetTrackerError::Validation(
                "platform name is required".to_string(),
            ));
        }
        if self.initial_bankroll < Decimal::ZERO {
            return Err(BetTrackerError::Validation(
                "initial_bankroll cannot be negative".to_string(),
            ));
        }
        check_amount("initial_bankroll", self.initial_bankroll)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformUpdate {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

/// Ledger entry kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    /// Signed correction (bonus, fee, manual reconciliation)
    Adjustment,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
            TransactionKind::Adjustment => "adjustment",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = String;

    fn try_from(s: &str) -> std::result::Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "deposit" => Ok(TransactionKind::Deposit),
            "withdrawal" => Ok(TransactionKind::Withdrawal),
            "adjustment" => Ok(TransactionKind::Adjustment),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformTransaction {
    pub id: Uuid,
    pub platform_id: Uuid,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub balance_after: Decimal,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}

/// New balance after applying a ledger entry
pub fn apply_transaction(
    balance: Decimal,
    kind: TransactionKind,
    amount: Decimal,
) -> Result<Decimal> {
    check_amount("amount", amount)?;
    let next = match kind {
        TransactionKind::Deposit => {
            if amount <= Decimal::ZERO {
                return Err(BetTrackerError::Validation(
                    "deposit amount must be positive".to_string(),
                ));
            }
            balance.checked_add(amount)
        }
        TransactionKind::Withdrawal => {
            if amount <= Decimal::ZERO {
                return Err(BetTrackerError::Validation(
                    "withdrawal amount must be positive".to_string(),
                ));
            }
            if amount > balance {
                return Err(BetTrackerError::Validation(format!(
                    "insufficient bankroll: balance {}, requested {}",
                    balance, amount
                )));
            }
            balance.checked_sub(amount)
        }
        TransactionKind::Adjustment => {
            if amount.is_zero() {
                return Err(BetTrackerError::Validation(
                    "adjustment amount cannot be zero".to_string(),
                ));
            }
            balance.checked_add(amount)
        }
    };
    let next = next
        .ok_or_else(|| BetTrackerError::Validation("balance is out of range".to_string()))?;
    check_amount("balance", next)
}
