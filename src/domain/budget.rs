use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{check_amount, Mode};
use crate::error::{BetTrackerError, Result};

/// Per-(user, mode) spending limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSettings {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mode: Mode,
    pub daily_limit: Option<Decimal>,
    pub weekly_limit: Option<Decimal>,
    pub monthly_limit: Option<Decimal>,
    /// Percentage of a limit at which a warning is raised
    pub alert_threshold: i32,
    pub alerts_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BudgetSettings {
    pub fn limit_for(&self, period: BudgetPeriod) -> Option<Decimal> {
        match period {
            BudgetPeriod::Daily => self.daily_limit,
            BudgetPeriod::Weekly => self.weekly_limit,
            BudgetPeriod::Monthly => self.monthly_limit,
        }
    }
}

/// Partial update of budget settings. Absent fields keep their value;
/// `clear_*` flags remove a limit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetSettingsUpdate {
    #[serde(default)]
    pub daily_limit: Option<Decimal>,
    #[serde(default)]
    pub weekly_limit: Option<Decimal>,
    #[serde(default)]
    pub monthly_limit: Option<Decimal>,
    #[serde(default)]
    pub clear_daily_limit: bool,
    #[serde(default)]
    pub clear_weekly_limit: bool,
    #[serde(default)]
    pub clear_monthly_limit: bool,
    #[serde(default)]
    pub alert_threshold: Option<i32>,
    #[serde(default)]
    pub alerts_enabled: Option<bool>,
}

impl BudgetSettingsUpdate {
    pub fn validate(&self) -> Result<()> {
        for (name, limit) in [
            ("daily_limit", self.daily_limit),
            ("weekly_limit", self.weekly_limit),
            ("monthly_limit", self.monthly_limit),
        ] {
            let Some(limit) = limit else { continue };
            if limit <= Decimal::ZERO {
                return Err(BetTrackerError::Validation(format!(
                    "{} must be greater than zero",
                    name
                )));
            }
            check_amount(name, limit)?;
        }
        if let Some(threshold) = self.alert_threshold {
            if !(1..=100).contains(&threshold) {
                return Err(BetTrackerError::Validation(
                    "alert_threshold must be between 1 and 100".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Apply onto existing settings
    pub fn apply(&self, settings: &mut BudgetSettings) {
        fn merge(current: &mut Option<Decimal>, new: Option<Decimal>, clear: bool) {
            if clear {
                *current = None;
            } else if new.is_some() {
                *current = new;
            }
        }

        merge(&mut settings.daily_limit, self.daily_limit, self.clear_daily_limit);
        merge(&mut settings.weekly_limit, self.weekly_limit, self.clear_weekly_limit);
        merge(&mut settings.monthly_limit, self.monthly_limit, self.clear_monthly_limit);
        if let Some(threshold) = self.alert_threshold {
            settings.alert_threshold = threshold;
        }
        if let Some(enabled) = self.alerts_enabled {
            settings.alerts_enabled = enabled;
        }
    }
}

/// Budget accounting window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Daily,
    Weekly,
    Monthly,
}

impl BudgetPeriod {
    pub const ALL: [BudgetPeriod; 3] = [
        BudgetPeriod::Daily,
        BudgetPeriod::Weekly,
        BudgetPeriod::Monthly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPeriod::Daily => "daily",
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Monthly => "monthly",
        }
    }

    /// Start of the window containing `now` (UTC; weeks start on Monday)
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive();
        let day = match self {
            BudgetPeriod::Daily => today,
            BudgetPeriod::Weekly => {
                today - Duration::days(today.weekday().num_days_from_monday() as i64)
            }
            BudgetPeriod::Monthly => today.with_day(1).unwrap_or(today),
        };
        Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN))
    }
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn settings() -> BudgetSettings {
        BudgetSettings {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            mode: Mode::Real,
            daily_limit: Some(dec!(50)),
            weekly_limit: None,
            monthly_limit: Some(dec!(1000)),
            alert_threshold: 80,
            alerts_enabled: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_period_starts() {
        // Thursday 2024-03-14 15:30 UTC
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 15, 30, 0).unwrap();
        assert_eq!(
            BudgetPeriod::Daily.start(now),
            Utc.with_ymd_and_hms(2024, 3, 14, 0, 0, 0).unwrap()
        );
        assert_eq!(
            BudgetPeriod::Weekly.start(now),
            Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap()
        );
        assert_eq!(
            BudgetPeriod::Monthly.start(now),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_weekly_start_on_monday_is_same_day() {
        let monday = Utc.with_ymd_and_hms(2024, 3, 11, 9, 0, 0).unwrap();
        assert_eq!(
            BudgetPeriod::Weekly.start(monday),
            Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_update_apply_and_clear() {
        let mut s = settings();
        let update = BudgetSettingsUpdate {
            weekly_limit: Some(dec!(200)),
            clear_daily_limit: true,
            alert_threshold: Some(90),
            ..Default::default()
        };
        update.validate().unwrap();
        update.apply(&mut s);

        assert_eq!(s.daily_limit, None);
        assert_eq!(s.weekly_limit, Some(dec!(200)));
        assert_eq!(s.monthly_limit, Some(dec!(1000)));
        assert_eq!(s.alert_threshold, 90);
        assert_eq!(s.limit_for(BudgetPeriod::Weekly), Some(dec!(200)));
    }

    #[test]
    fn test_update_validation() {
        let bad_threshold = BudgetSettingsUpdate {
            alert_threshold: Some(0),
            ..Default::default()
        };
        assert!(bad_threshold.validate().is_err());

        let negative = BudgetSettingsUpdate {
            monthly_limit: Some(dec!(-5)),
            ..Default::default()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_update_rejects_limit_beyond_column_range() {
        let oversized = BudgetSettingsUpdate {
            daily_limit: Some(dec!(1000000000000)),
            ..Default::default()
        };
        assert!(matches!(
            oversized.validate(),
            Err(BetTrackerError::Validation(_))
        ));

        let largest = BudgetSettingsUpdate {
            weekly_limit: Some(crate::domain::MAX_AMOUNT),
            ..Default::default()
        };
        assert!(largest.validate().is_ok());
    }
}
