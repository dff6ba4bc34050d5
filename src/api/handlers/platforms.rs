use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::api::{
    auth::AuthUser,
    extract::{ApiJson, ApiQuery},
    state::AppState,
    types::{ListResponse, ModeQuery, TransactionResponse},
};
use crate::domain::{
    AuditEntry, NewTransaction, Platform, PlatformDraft, PlatformTransaction, PlatformUpdate,
};
use crate::error::Result;

/// GET /api/platforms
pub async fn list_platforms(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(q): ApiQuery<ModeQuery>,
) -> Result<Json<ListResponse<Platform>>> {
    let platforms = state.store.list_platforms(auth.user_id, q.mode).await?;
    Ok(Json(platforms.into()))
}

/// POST /api/platforms
pub async fn create_platform(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(draft): ApiJson<PlatformDraft>,
) -> Result<(StatusCode, Json<Platform>)> {
    draft.validate()?;
    let platform = state.store.insert_platform(auth.user_id, &draft).await?;

    state
        .audit(
            AuditEntry::new(auth.user_id, "create", "platform")
                .entity(platform.id)
                .details(json!({
                    "name": platform.name,
                    "initial_bankroll": platform.initial_bankroll,
                })),
        )
        .await;

    Ok((StatusCode::CREATED, Json(platform)))
}

/// GET /api/platforms/:id
pub async fn get_platform(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Platform>> {
    Ok(Json(state.store.get_platform(auth.user_id, id).await?))
}

/// PUT /api/platforms/:id
pub async fn update_platform(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(update): ApiJson<PlatformUpdate>,
) -> Result<Json<Platform>> {
    let platform = state.store.update_platform(auth.user_id, id, &update).await?;
    state
        .audit(AuditEntry::new(auth.user_id, "update", "platform").entity(id))
        .await;
    Ok(Json(platform))
}

/// DELETE /api/platforms/:id
pub async fn delete_platform(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.store.delete_platform(auth.user_id, id).await?;
    state
        .audit(AuditEntry::new(auth.user_id, "delete", "platform").entity(id))
        .await;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/platforms/:id/transactions
pub async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ListResponse<PlatformTransaction>>> {
    let transactions = state.store.list_transactions(auth.user_id, id).await?;
    Ok(Json(transactions.into()))
}

/// POST /api/platforms/:id/transactions
pub async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(new): ApiJson<NewTransaction>,
) -> Result<(StatusCode, Json<TransactionResponse>)> {
    let (transaction, platform) = state
        .store
        .create_transaction(auth.user_id, id, &new)
        .await?;
    info!(
        platform_id = %id,
        kind = new.kind.as_str(),
        amount = %new.amount,
        balance = %platform.current_bankroll,
        "bankroll transaction recorded"
    );

    state
        .audit(
            AuditEntry::new(auth.user_id, "create", "platform_transaction")
                .entity(transaction.id)
                .details(json!({
                    "platform_id": id,
                    "kind": transaction.kind,
                    "amount": transaction.amount,
                    "balance_after": transaction.balance_after,
                })),
        )
        .await;

    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse {
            transaction,
            platform,
        }),
    ))
}
