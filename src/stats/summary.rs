//! Period aggregates and period-over-period trends.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{Bet, BetStatus};

/// Aggregate figures over a set of bets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub total_bets: i64,
    pub won_bets: i64,
    pub lost_bets: i64,
    pub pending_bets: i64,
    pub total_stake: Decimal,
    pub total_payout: Decimal,
    pub total_profit: Decimal,
    pub average_odds: f64,
    /// Won bets over all bets, in percent
    pub win_rate: f64,
    /// Profit over stake, in percent
    pub roi: f64,
}

pub fn summarize<'a, I>(bets: I) -> PeriodSummary
where
    I: IntoIterator<Item = &'a Bet>,
{
    let mut summary = PeriodSummary::default();
    let mut odds_sum = Decimal::ZERO;

    for bet in bets {
        summary.total_bets += 1;
        summary.total_stake += bet.stake;
        summary.total_payout += bet.payout;
        summary.total_profit += bet.profit;
        odds_sum += bet.odds;
        match bet.status {
            BetStatus::Won => summary.won_bets += 1,
            BetStatus::Lost => summary.lost_bets += 1,
            BetStatus::Pending => summary.pending_bets += 1,
        }
    }

    summary.average_odds = if summary.total_bets > 0 {
        to_f64(odds_sum / Decimal::from(summary.total_bets))
    } else {
        0.0
    };
    summary.win_rate = win_rate(summary.won_bets, summary.total_bets);
    summary.roi = roi(summary.total_profit, summary.total_stake);
    summary
}

/// profit / stake × 100, or 0 when nothing was staked
pub fn roi(profit: Decimal, stake: Decimal) -> f64 {
    if stake.is_zero() {
        return 0.0;
    }
    profit
        .checked_div(stake)
        .map(|r| to_f64(r * Decimal::ONE_HUNDRED))
        .unwrap_or(0.0)
}

/// won / total × 100, or 0 for an empty set
pub fn win_rate(won: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    to_f64(Decimal::from(won) * Decimal::ONE_HUNDRED / Decimal::from(total))
}

/// Relative change in percent. A zero baseline reports 100 for any positive
/// current value and 0 otherwise.
pub fn trend(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    (current - previous) / previous * 100.0
}

/// Period-over-period changes of the headline figures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trends {
    pub bets: f64,
    pub stake: f64,
    pub profit: f64,
    pub roi: f64,
    pub win_rate: f64,
}

impl Trends {
    pub fn between(current: &PeriodSummary, previous: &PeriodSummary) -> Self {
        Self {
            bets: trend(current.total_bets as f64, previous.total_bets as f64),
            stake: trend(to_f64(current.total_stake), to_f64(previous.total_stake)),
            profit: trend(to_f64(current.total_profit), to_f64(previous.total_profit)),
            roi: trend(current.roi, previous.roi),
            win_rate: trend(current.win_rate, previous.win_rate),
        }
    }
}

pub(crate) fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}
