use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::consumption::{consumption, evaluate_alert, BudgetAlert, BudgetConsumption};
use crate::domain::{BudgetPeriod, BudgetSettings, BudgetSettingsUpdate, Mode};
use crate::error::Result;
use crate::notifier::Notifier;

/// Persistence needed by the budget service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BudgetStore: Send + Sync {
    async fn find_budget_settings(&self, user_id: Uuid, mode: Mode)
        -> Result<Option<BudgetSettings>>;

    /// Insert default settings, returning the existing row if another request won the race
    async fn create_budget_settings(
        &self,
        user_id: Uuid,
        mode: Mode,
        alert_threshold: i32,
    ) -> Result<BudgetSettings>;

    async fn save_budget_settings(&self, settings: &BudgetSettings) -> Result<BudgetSettings>;

    /// Sum of stakes on bets dated at or after `since`
    async fn stake_since(&self, user_id: Uuid, mode: Mode, since: DateTime<Utc>)
        -> Result<Decimal>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetOverview {
    pub mode: Mode,
    pub alert_threshold: i32,
    pub alerts_enabled: bool,
    pub daily: BudgetConsumption,
    pub weekly: BudgetConsumption,
    pub monthly: BudgetConsumption,
}

impl BudgetOverview {
    pub fn periods(&self) -> [&BudgetConsumption; 3] {
        [&self.daily, &self.weekly, &self.monthly]
    }
}

#[derive(Clone)]
pub struct BudgetService {
    store: Arc<dyn BudgetStore>,
    notifier: Arc<dyn Notifier>,
    default_threshold: i32,
}

impl BudgetService {
    pub fn new(
        store: Arc<dyn BudgetStore>,
        notifier: Arc<dyn Notifier>,
        default_threshold: i32,
    ) -> Self {
        Self {
            store,
            notifier,
            default_threshold,
        }
    }

    /// Settings for (user, mode), created with defaults on first access
    pub async fn settings(&self, user_id: Uuid, mode: Mode) -> Result<BudgetSettings> {
        if let Some(settings) = self.store.find_budget_settings(user_id, mode).await? {
            return Ok(settings);
        }
        info!(%user_id, %mode, "creating default budget settings");
        self.store
            .create_budget_settings(user_id, mode, self.default_threshold)
            .await
    }

    pub async fn update_settings(
        &self,
        user_id: Uuid,
        mode: Mode,
        update: BudgetSettingsUpdate,
    ) -> Result<BudgetSettings> {
        update.validate()?;
        let mut settings = self.settings(user_id, mode).await?;
        update.apply(&mut settings);
        settings.updated_at = Utc::now();
        self.store.save_budget_settings(&settings).await
    }

    pub async fn overview(
        &self,
        user_id: Uuid,
        mode: Mode,
        now: DateTime<Utc>,
    ) -> Result<BudgetOverview> {
        let settings = self.settings(user_id, mode).await?;
        let starts = BudgetPeriod::ALL.map(|p| p.start(now));

        let (daily, weekly, monthly) = tokio::try_join!(
            self.store.stake_since(user_id, mode, starts[0]),
            self.store.stake_since(user_id, mode, starts[1]),
            self.store.stake_since(user_id, mode, starts[2]),
        )?;
        let totals = [daily, weekly, monthly];
        let [daily, weekly, monthly] = std::array::from_fn(|i| {
            let period = BudgetPeriod::ALL[i];
            consumption(period, starts[i], totals[i], settings.limit_for(period))
        });

        Ok(BudgetOverview {
            mode,
            alert_threshold: settings.alert_threshold,
            alerts_enabled: settings.alerts_enabled,
            daily,
            weekly,
            monthly,
        })
    }

    /// Evaluate every period and notify once per alert raised in this call.
    /// Repeated calls notify again; there is no suppression window.
    #[instrument(skip(self))]
    pub async fn check_alerts(
        &self,
        user_id: Uuid,
        mode: Mode,
        now: DateTime<Utc>,
    ) -> Result<Vec<BudgetAlert>> {
        let overview = self.overview(user_id, mode, now).await?;
        if !overview.alerts_enabled {
            return Ok(Vec::new());
        }

        let alerts: Vec<BudgetAlert> = overview
            .periods()
            .into_iter()
            .filter_map(|c| evaluate_alert(c, overview.alert_threshold))
            .collect();

        for alert in &alerts {
            warn!(
                %user_id,
                period = %alert.period,
                level = ?alert.level,
                percentage = alert.percentage,
                "budget threshold reached"
            );
            self.notifier.notify(alert.to_notification(user_id)).await?;
        }

        Ok(alerts)
    }
}
