use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::api::{auth::AuthUser, extract::ApiJson, state::AppState, types::ListResponse};
use crate::domain::{AuditEntry, Tipster, TipsterDraft, TipsterUpdate};
use crate::error::Result;

/// GET /api/tipsters
pub async fn list_tipsters(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ListResponse<Tipster>>> {
    Ok(Json(state.store.list_tipsters(auth.user_id).await?.into()))
}

/// POST /api/tipsters
pub async fn create_tipster(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(draft): ApiJson<TipsterDraft>,
) -> Result<(StatusCode, Json<Tipster>)> {
    draft.validate()?;
    let tipster = state.store.insert_tipster(auth.user_id, &draft).await?;
    state
        .audit(
            AuditEntry::new(auth.user_id, "create", "tipster")
                .entity(tipster.id)
                .details(json!({ "name": tipster.name })),
        )
        .await;
    Ok((StatusCode::CREATED, Json(tipster)))
}

/// GET /api/tipsters/:id
pub async fn get_tipster(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Tipster>> {
    Ok(Json(state.store.get_tipster(auth.user_id, id).await?))
}

/// PUT /api/tipsters/:id
pub async fn update_tipster(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(update): ApiJson<TipsterUpdate>,
) -> Result<Json<Tipster>> {
    let tipster = state.store.update_tipster(auth.user_id, id, &update).await?;
    state
        .audit(AuditEntry::new(auth.user_id, "update", "tipster").entity(id))
        .await;
    Ok(Json(tipster))
}

/// DELETE /api/tipsters/:id
pub async fn delete_tipster(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.store.delete_tipster(auth.user_id, id).await?;
    state
        .audit(AuditEntry::new(auth.user_id, "delete", "tipster").entity(id))
        .await;
    Ok(StatusCode::NO_CONTENT)
}
