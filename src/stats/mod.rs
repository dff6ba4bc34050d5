//! Bet statistics: period aggregates, trends, streaks, dispersion and
//! grouping helpers, all computed from bet rows on demand.

pub mod grouping;
pub mod risk;
pub mod service;
pub mod streaks;
pub mod summary;

pub use grouping::{
    breakdown, group_by_period, odds_breakdown, BreakdownRow, Dimension, Granularity, TimeBucket,
};
pub use risk::{consistency_score, max_drawdown, performance, volatility, PerformanceStats};
pub use service::{BetSource, Dashboard, DashboardPeriod, DateRange, StatisticsService};
pub use streaks::{compute_streaks, StreakKind, StreakStats};
pub use summary::{roi, summarize, trend, win_rate, PeriodSummary, Trends};

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::domain::{Bet, BetStatus, Mode, Settlement};

    /// Settled bet placed `hour` hours after 2024-01-01 00:00 UTC
    pub fn bet(hour: i64, status: BetStatus, stake: Decimal, odds: Decimal) -> Bet {
        let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(hour);
        let settlement = Settlement::compute(status, stake, odds, None).unwrap();
        Bet {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            mode: Mode::Real,
            date,
            stake,
            odds,
            payout: settlement.payout,
            profit: settlement.profit,
            status,
            bet_type: None,
            hippodrome: None,
            platform: None,
            tipster_id: None,
            description: None,
            created_at: date,
            updated_at: date,
        }
    }
}
