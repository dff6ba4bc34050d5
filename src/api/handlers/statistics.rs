use axum::{extract::State, Json};
use chrono::Utc;

use crate::api::{
    auth::AuthUser,
    extract::ApiQuery,
    state::AppState,
    types::{DashboardQuery, StatsQuery},
};
use crate::error::Result;
use crate::stats::{BreakdownRow, Dashboard, PerformanceStats, PeriodSummary, TimeBucket};

/// GET /api/statistics/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(q): ApiQuery<DashboardQuery>,
) -> Result<Json<Dashboard>> {
    let dashboard = state
        .stats
        .dashboard(auth.user_id, q.mode, q.period, Utc::now())
        .await?;
    Ok(Json(dashboard))
}

/// GET /api/statistics/summary
pub async fn get_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(q): ApiQuery<StatsQuery>,
) -> Result<Json<PeriodSummary>> {
    let summary = state.stats.summary(auth.user_id, q.mode, q.range()?).await?;
    Ok(Json(summary))
}

/// GET /api/statistics/evolution
pub async fn get_evolution(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(q): ApiQuery<StatsQuery>,
) -> Result<Json<Vec<TimeBucket>>> {
    let buckets = state
        .stats
        .evolution(auth.user_id, q.mode, q.range()?, q.granularity)
        .await?;
    Ok(Json(buckets))
}

/// GET /api/statistics/breakdown
pub async fn get_breakdown(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(q): ApiQuery<StatsQuery>,
) -> Result<Json<Vec<BreakdownRow>>> {
    let rows = state
        .stats
        .breakdown(auth.user_id, q.mode, q.range()?, q.dimension)
        .await?;
    Ok(Json(rows))
}

/// GET /api/statistics/odds
pub async fn get_odds_breakdown(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(q): ApiQuery<StatsQuery>,
) -> Result<Json<Vec<BreakdownRow>>> {
    let rows = state
        .stats
        .odds_breakdown(auth.user_id, q.mode, q.range()?)
        .await?;
    Ok(Json(rows))
}

/// GET /api/statistics/performance
pub async fn get_performance(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(q): ApiQuery<StatsQuery>,
) -> Result<Json<PerformanceStats>> {
    let stats = state
        .stats
        .performance(auth.user_id, q.mode, q.range()?)
        .await?;
    Ok(Json(stats))
}
