use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::grouping::{
    breakdown, group_by_period, odds_breakdown, BreakdownRow, Dimension, Granularity, TimeBucket,
};
use super::risk::{performance, PerformanceStats};
use super::summary::{summarize, PeriodSummary, Trends};
use crate::domain::{Bet, Mode};
use crate::error::{BetTrackerError, Result};

/// Half-open date window `[start, end)`; either side may be unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Result<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(BetTrackerError::Validation(
                    "start must not be after end".to_string(),
                ));
            }
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date < e)
    }
}

/// Where the aggregator reads bets from
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BetSource: Send + Sync {
    async fn bets_in_range(
        &self,
        user_id: Uuid,
        mode: Mode,
        range: DateRange,
    ) -> Result<Vec<Bet>>;
}

/// Rolling window compared against the window just before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardPeriod {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

impl DashboardPeriod {
    pub fn duration(&self) -> Duration {
        match self {
            DashboardPeriod::Week => Duration::days(7),
            DashboardPeriod::Month => Duration::days(30),
            DashboardPeriod::Quarter => Duration::days(90),
            DashboardPeriod::Year => Duration::days(365),
        }
    }

    /// (current, previous) windows ending at `now`
    pub fn windows(&self, now: DateTime<Utc>) -> (DateRange, DateRange) {
        let span = self.duration();
        let current_start = now - span;
        let current = DateRange {
            start: Some(current_start),
            end: None,
        };
        let previous = DateRange {
            start: Some(current_start - span),
            end: Some(current_start),
        };
        (current, previous)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub mode: Mode,
    pub period: DashboardPeriod,
    pub current: PeriodSummary,
    pub previous: PeriodSummary,
    pub trends: Trends,
    pub performance: PerformanceStats,
    pub generated_at: DateTime<Utc>,
}

/// Statistics over a user's bets. Nothing is cached: every call recomputes
/// from the bet rows.
#[derive(Clone)]
pub struct StatisticsService {
    source: Arc<dyn BetSource>,
}

impl StatisticsService {
    pub fn new(source: Arc<dyn BetSource>) -> Self {
        Self { source }
    }

    #[instrument(skip(self))]
    pub async fn dashboard(
        &self,
        user_id: Uuid,
        mode: Mode,
        period: DashboardPeriod,
        now: DateTime<Utc>,
    ) -> Result<Dashboard> {
        let (current_range, previous_range) = period.windows(now);
        let (current_bets, previous_bets) = tokio::try_join!(
            self.source.bets_in_range(user_id, mode, current_range),
            self.source.bets_in_range(user_id, mode, previous_range),
        )?;
        debug!(
            current = current_bets.len(),
            previous = previous_bets.len(),
            "dashboard windows loaded"
        );

        let current = summarize(&current_bets);
        let previous = summarize(&previous_bets);
        let trends = Trends::between(&current, &previous);

        Ok(Dashboard {
            mode,
            period,
            trends,
            performance: performance(&current_bets),
            current,
            previous,
            generated_at: now,
        })
    }

    pub async fn summary(
        &self,
        user_id: Uuid,
        mode: Mode,
        range: DateRange,
    ) -> Result<PeriodSummary> {
        let bets = self.source.bets_in_range(user_id, mode, range).await?;
        Ok(summarize(&bets))
    }

    pub async fn evolution(
        &self,
        user_id: Uuid,
        mode: Mode,
        range: DateRange,
        granularity: Granularity,
    ) -> Result<Vec<TimeBucket>> {
        let bets = self.source.bets_in_range(user_id, mode, range).await?;
        Ok(group_by_period(&bets, granularity))
    }

    pub async fn breakdown(
        &self,
        user_id: Uuid,
        mode: Mode,
        range: DateRange,
        dimension: Dimension,
    ) -> Result<Vec<BreakdownRow>> {
        let bets = self.source.bets_in_range(user_id, mode, range).await?;
        Ok(breakdown(&bets, dimension))
    }

    pub async fn odds_breakdown(
        &self,
        user_id: Uuid,
        mode: Mode,
        range: DateRange,
    ) -> Result<Vec<BreakdownRow>> {
        let bets = self.source.bets_in_range(user_id, mode, range).await?;
        Ok(odds_breakdown(&bets))
    }

    pub async fn performance(
        &self,
        user_id: Uuid,
        mode: Mode,
        range: DateRange,
    ) -> Result<PerformanceStats> {
        let bets = self.source.bets_in_range(user_id, mode, range).await?;
        Ok(performance(&bets))
    }
}
