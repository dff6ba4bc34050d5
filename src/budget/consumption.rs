use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{BudgetPeriod, NewNotification, NotificationKind};

/// How much of a period's limit has been staked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetConsumption {
    pub period: BudgetPeriod,
    pub period_start: DateTime<Utc>,
    pub limit: Option<Decimal>,
    pub consumed: Decimal,
    pub remaining: Option<Decimal>,
    /// consumed / limit × 100; null when no limit is configured
    pub percentage: Option<f64>,
}

pub fn consumption(
    period: BudgetPeriod,
    period_start: DateTime<Utc>,
    consumed: Decimal,
    limit: Option<Decimal>,
) -> BudgetConsumption {
    let limit = limit.filter(|l| *l > Decimal::ZERO);
    let percentage = limit.and_then(|l| {
        (consumed * Decimal::ONE_HUNDRED)
            .checked_div(l)
            .and_then(|p| p.to_f64())
    });

    BudgetConsumption {
        period,
        period_start,
        limit,
        consumed,
        remaining: limit.map(|l| (l - consumed).max(Decimal::ZERO)),
        percentage,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    /// Threshold reached
    Warning,
    /// Limit reached or exceeded
    Error,
}

impl AlertLevel {
    pub fn notification_kind(&self) -> NotificationKind {
        match self {
            AlertLevel::Warning => NotificationKind::Warning,
            AlertLevel::Error => NotificationKind::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAlert {
    pub period: BudgetPeriod,
    pub level: AlertLevel,
    pub percentage: f64,
    pub consumed: Decimal,
    pub limit: Decimal,
}

impl BudgetAlert {
    pub fn to_notification(&self, user_id: Uuid) -> NewNotification {
        let (title, message) = match self.level {
            AlertLevel::Error => (
                format!("{} budget exceeded", capitalize(self.period.as_str())),
                format!(
                    "You have staked {} of your {} {} limit ({:.0}%).",
                    self.consumed, self.limit, self.period, self.percentage
                ),
            ),
            AlertLevel::Warning => (
                format!("{} budget alert", capitalize(self.period.as_str())),
                format!(
                    "You have used {:.0}% of your {} limit ({} of {}).",
                    self.percentage, self.period, self.consumed, self.limit
                ),
            ),
        };

        NewNotification {
            user_id,
            kind: self.level.notification_kind(),
            title,
            message,
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Error at 100% and above, warning from `threshold` upwards
pub fn evaluate_alert(consumption: &BudgetConsumption, threshold: i32) -> Option<BudgetAlert> {
    let percentage = consumption.percentage?;
    let limit = consumption.limit?;

    let level = if percentage >= 100.0 {
        AlertLevel::Error
    } else if percentage >= threshold as f64 {
        AlertLevel::Warning
    } else {
        return None;
    };

    Some(BudgetAlert {
        period: consumption.period,
        level,
        percentage,
        consumed: consumption.consumed,
        limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn daily(consumed: Decimal, limit: Option<Decimal>) -> BudgetConsumption {
        consumption(BudgetPeriod::Daily, Utc::now(), consumed, limit)
    }

    #[test]
    fn test_percentage_null_without_limit() {
        let c = daily(dec!(40), None);
        assert_eq!(c.percentage, None);
        assert_eq!(c.remaining, None);
        assert!(evaluate_alert(&c, 80).is_none());
    }

    #[test]
    fn test_percentage_with_limit() {
        let c = daily(dec!(40), Some(dec!(50)));
        assert_eq!(c.percentage, Some(80.0));
        assert_eq!(c.remaining, Some(dec!(10)));

        let over = daily(dec!(75), Some(dec!(50)));
        assert_eq!(over.percentage, Some(150.0));
        assert_eq!(over.remaining, Some(Decimal::ZERO));
    }

    #[test]
    fn test_zero_limit_treated_as_unset() {
        let c = daily(dec!(10), Some(Decimal::ZERO));
        assert_eq!(c.limit, None);
        assert_eq!(c.percentage, None);
    }

    #[test]
    fn test_alert_levels() {
        assert!(evaluate_alert(&daily(dec!(39), Some(dec!(50))), 80).is_none());

        let warning = evaluate_alert(&daily(dec!(40), Some(dec!(50))), 80).unwrap();
        assert_eq!(warning.level, AlertLevel::Warning);

        let error = evaluate_alert(&daily(dec!(50), Some(dec!(50))), 80).unwrap();
        assert_eq!(error.level, AlertLevel::Error);
        assert_eq!(error.limit, dec!(50));
    }

    #[test]
    fn test_threshold_of_100_only_errors() {
        assert!(evaluate_alert(&daily(dec!(49), Some(dec!(50))), 100).is_none());
        let alert = evaluate_alert(&daily(dec!(50), Some(dec!(50))), 100).unwrap();
        assert_eq!(alert.level, AlertLevel::Error);
    }

    #[test]
    fn test_alert_notification() {
        let alert = evaluate_alert(&daily(dec!(60), Some(dec!(50))), 80).unwrap();
        let user = Uuid::new_v4();
        let n = alert.to_notification(user);
        assert_eq!(n.user_id, user);
        assert_eq!(n.kind, NotificationKind::Error);
        assert_eq!(n.title, "Daily budget exceeded");
        assert!(n.message.contains("120%"));
    }
}
