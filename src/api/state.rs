use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::adapters::PostgresStore;
use crate::api::auth::JwtKeys;
use crate::budget::BudgetService;
use crate::domain::{AuditEntry, Mode};
use crate::stats::StatisticsService;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct AppState {
    /// Database access
    pub store: Arc<PostgresStore>,

    pub stats: StatisticsService,

    pub budget: BudgetService,

    /// Bearer token verification keys
    pub jwt: Arc<JwtKeys>,

    /// Application start time
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: Arc<PostgresStore>, jwt: JwtKeys, default_alert_threshold: i32) -> Self {
        let stats = StatisticsService::new(store.clone());
        let budget = BudgetService::new(store.clone(), store.clone(), default_alert_threshold);

        Self {
            store,
            stats,
            budget,
            jwt: Arc::new(jwt),
            start_time: Utc::now(),
        }
    }

    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.start_time).num_seconds()
    }

    /// Write an audit row; failures are logged and never fail the request
    pub async fn audit(&self, entry: AuditEntry) {
        let action = entry.action;
        if let Err(e) = self.store.record_audit(entry).await {
            warn!(action, error = %e, "failed to write audit log");
        }
    }

    /// Run budget checks after a stake changes; failures are logged only
    pub async fn check_budget(&self, user_id: Uuid, mode: Mode) {
        if let Err(e) = self.budget.check_alerts(user_id, mode, Utc::now()).await {
            warn!(%user_id, %mode, error = %e, "budget check failed");
        }
    }
}
