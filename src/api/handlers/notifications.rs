use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::api::{
    auth::AuthUser,
    extract::ApiQuery,
    state::AppState,
    types::{ListResponse, MarkAllReadResponse, NotificationQuery},
};
use crate::domain::Notification;
use crate::error::Result;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(q): ApiQuery<NotificationQuery>,
) -> Result<Json<ListResponse<Notification>>> {
    let notifications = state
        .store
        .list_notifications(auth.user_id, q.unread_only, q.limit())
        .await?;
    Ok(Json(notifications.into()))
}

/// POST /api/notifications/:id/read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.store.mark_notification_read(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/notifications/read-all
pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MarkAllReadResponse>> {
    let updated = state.store.mark_all_notifications_read(auth.user_id).await?;
    Ok(Json(MarkAllReadResponse { updated }))
}
