use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Mode, Platform, PlatformTransaction, TicketStatus};
use crate::error::Result;
use crate::stats::{DashboardPeriod, DateRange, Dimension, Granularity};

// ============================================================================
// Query Types
// ============================================================================

/// `?mode=` on its own
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ModeQuery {
    #[serde(default)]
    pub mode: Mode,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub period: DashboardPeriod,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct StatsQuery {
    #[serde(default)]
    pub mode: Mode,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub granularity: Granularity,
    #[serde(default)]
    pub dimension: Dimension,
}

impl StatsQuery {
    pub fn range(&self) -> Result<DateRange> {
        DateRange::new(self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
}

impl NotificationQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(50).clamp(1, 200)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(50).clamp(1, 200)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>, total: i64) -> Self {
        Self { items, total }
    }
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(items: Vec<T>) -> Self {
        let total = items.len() as i64;
        Self { items, total }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub transaction: PlatformTransaction,
    pub platform: Platform,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketStatusRequest {
    pub status: TicketStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

// ============================================================================
// System Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub db: String,
    pub uptime_secs: i64,
    pub version: String,
}
