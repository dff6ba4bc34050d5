use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::summary::{summarize, PeriodSummary};
use crate::domain::Bet;

/// Time bucket width for evolution charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    Week,
    Month,
}

impl Granularity {
    /// Sortable bucket key: `2024-03-14`, `2024-W11` (ISO week), `2024-03`
    pub fn key(&self, date: DateTime<Utc>) -> String {
        match self {
            Granularity::Day => date.format("%Y-%m-%d").to_string(),
            Granularity::Week => date.format("%G-W%V").to_string(),
            Granularity::Month => date.format("%Y-%m").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub period: String,
    #[serde(flatten)]
    pub summary: PeriodSummary,
    /// Running profit including this bucket
    pub cumulative_profit: Decimal,
}

pub fn group_by_period(bets: &[Bet], granularity: Granularity) -> Vec<TimeBucket> {
    let mut groups: BTreeMap<String, Vec<&Bet>> = BTreeMap::new();
    for bet in bets {
        groups.entry(granularity.key(bet.date)).or_default().push(bet);
    }

    let mut cumulative = Decimal::ZERO;
    groups
        .into_iter()
        .map(|(period, group)| {
            let summary = summarize(group);
            cumulative += summary.total_profit;
            TimeBucket {
                period,
                summary,
                cumulative_profit: cumulative,
            }
        })
        .collect()
}

/// Attribute to break results down by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    #[default]
    BetType,
    Hippodrome,
    Platform,
    Tipster,
}

pub const UNKNOWN_KEY: &str = "unknown";

impl Dimension {
    pub fn key(&self, bet: &Bet) -> String {
        let value = match self {
            Dimension::BetType => bet.bet_type.clone(),
            Dimension::Hippodrome => bet.hippodrome.clone(),
            Dimension::Platform => bet.platform.clone(),
            Dimension::Tipster => bet.tipster_id.map(|id| id.to_string()),
        };
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| UNKNOWN_KEY.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub key: String,
    #[serde(flatten)]
    pub summary: PeriodSummary,
}

/// Per-value summaries, most profitable first
pub fn breakdown(bets: &[Bet], dimension: Dimension) -> Vec<BreakdownRow> {
    let mut groups: BTreeMap<String, Vec<&Bet>> = BTreeMap::new();
    for bet in bets {
        groups.entry(dimension.key(bet)).or_default().push(bet);
    }

    let mut rows: Vec<BreakdownRow> = groups
        .into_iter()
        .map(|(key, group)| BreakdownRow {
            key,
            summary: summarize(group),
        })
        .collect();
    rows.sort_by(|a, b| b.summary.total_profit.cmp(&a.summary.total_profit));
    rows
}

/// Lower bounds of the odds ranges; the last range is open-ended
const ODDS_BOUNDS: [Decimal; 5] = [dec!(1), dec!(2), dec!(3), dec!(5), dec!(10)];

fn odds_range_label(index: usize) -> String {
    match ODDS_BOUNDS.get(index + 1) {
        Some(upper) => format!("{}-{}", ODDS_BOUNDS[index], upper),
        None => format!("{}+", ODDS_BOUNDS[index]),
    }
}

/// Summaries per odds range, in ascending range order; empty ranges are omitted
pub fn odds_breakdown(bets: &[Bet]) -> Vec<BreakdownRow> {
    let mut groups: BTreeMap<usize, Vec<&Bet>> = BTreeMap::new();
    for bet in bets {
        let index = ODDS_BOUNDS
            .iter()
            .rposition(|lower| bet.odds >= *lower)
            .unwrap_or(0);
        groups.entry(index).or_default().push(bet);
    }

    groups
        .into_iter()
        .map(|(index, group)| BreakdownRow {
            key: odds_range_label(index),
            summary: summarize(group),
        })
        .collect()
}
