use axum::{extract::State, Json};

use crate::api::{
    auth::AuthUser,
    extract::ApiQuery,
    state::AppState,
    types::{ListResponse, PageQuery},
};
use crate::domain::AuditLog;
use crate::error::Result;

/// GET /api/audit-logs
pub async fn list_audit_logs(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> Result<Json<ListResponse<AuditLog>>> {
    let logs = state
        .store
        .list_audit_logs(auth.user_id, page.limit(), page.offset())
        .await?;
    Ok(Json(logs.into()))
}
