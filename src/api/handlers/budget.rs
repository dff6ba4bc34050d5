use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::json;

use crate::api::{
    auth::AuthUser,
    extract::{ApiJson, ApiQuery},
    state::AppState,
    types::ModeQuery,
};
use crate::budget::{BudgetAlert, BudgetOverview};
use crate::domain::{AuditEntry, BudgetSettings, BudgetSettingsUpdate};
use crate::error::Result;

/// GET /api/budget/settings
pub async fn get_budget_settings(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(q): ApiQuery<ModeQuery>,
) -> Result<Json<BudgetSettings>> {
    Ok(Json(state.budget.settings(auth.user_id, q.mode).await?))
}

/// PUT /api/budget/settings
pub async fn update_budget_settings(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(q): ApiQuery<ModeQuery>,
    ApiJson(update): ApiJson<BudgetSettingsUpdate>,
) -> Result<Json<BudgetSettings>> {
    let settings = state
        .budget
        .update_settings(auth.user_id, q.mode, update)
        .await?;

    state
        .audit(
            AuditEntry::new(auth.user_id, "update", "budget_settings")
                .entity(settings.id)
                .details(json!({
                    "mode": settings.mode,
                    "daily_limit": settings.daily_limit,
                    "weekly_limit": settings.weekly_limit,
                    "monthly_limit": settings.monthly_limit,
                    "alert_threshold": settings.alert_threshold,
                    "alerts_enabled": settings.alerts_enabled,
                })),
        )
        .await;

    Ok(Json(settings))
}

/// GET /api/budget/overview
pub async fn get_budget_overview(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(q): ApiQuery<ModeQuery>,
) -> Result<Json<BudgetOverview>> {
    let overview = state.budget.overview(auth.user_id, q.mode, Utc::now()).await?;
    Ok(Json(overview))
}

/// POST /api/budget/check
pub async fn check_budget_alerts(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(q): ApiQuery<ModeQuery>,
) -> Result<Json<Vec<BudgetAlert>>> {
    let alerts = state
        .budget
        .check_alerts(auth.user_id, q.mode, Utc::now())
        .await?;
    Ok(Json(alerts))
}
