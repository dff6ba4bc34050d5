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
    types::ListResponse,
};
use crate::domain::{AuditEntry, Bet, BetDraft, BetFilter};
use crate::error::Result;

/// A bet may only reference one of the caller's own tipsters
async fn ensure_tipster_owned(state: &AppState, user_id: Uuid, draft: &BetDraft) -> Result<()> {
    if let Some(tipster_id) = draft.tipster_id {
        state.store.get_tipster(user_id, tipster_id).await?;
    }
    Ok(())
}

/// GET /api/bets
pub async fn list_bets(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(filter): ApiQuery<BetFilter>,
) -> Result<Json<ListResponse<Bet>>> {
    let (bets, total) = state.store.list_bets(auth.user_id, &filter).await?;
    Ok(Json(ListResponse::new(bets, total)))
}

/// POST /api/bets
pub async fn create_bet(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(draft): ApiJson<BetDraft>,
) -> Result<(StatusCode, Json<Bet>)> {
    draft.validate()?;
    ensure_tipster_owned(&state, auth.user_id, &draft).await?;
    let bet = state.store.insert_bet(auth.user_id, &draft).await?;
    info!(user_id = %auth.user_id, bet_id = %bet.id, stake = %bet.stake, "bet recorded");

    state
        .audit(
            AuditEntry::new(auth.user_id, "create", "bet")
                .entity(bet.id)
                .details(json!({ "mode": bet.mode, "stake": bet.stake, "status": bet.status })),
        )
        .await;
    state.check_budget(auth.user_id, bet.mode).await;

    Ok((StatusCode::CREATED, Json(bet)))
}

/// GET /api/bets/:id
pub async fn get_bet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Bet>> {
    Ok(Json(state.store.get_bet(auth.user_id, id).await?))
}

/// PUT /api/bets/:id
pub async fn update_bet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(draft): ApiJson<BetDraft>,
) -> Result<Json<Bet>> {
    draft.validate()?;
    ensure_tipster_owned(&state, auth.user_id, &draft).await?;
    let bet = state.store.update_bet(auth.user_id, id, &draft).await?;

    state
        .audit(
            AuditEntry::new(auth.user_id, "update", "bet")
                .entity(bet.id)
                .details(json!({ "status": bet.status, "profit": bet.profit })),
        )
        .await;

    Ok(Json(bet))
}

/// DELETE /api/bets/:id
pub async fn delete_bet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.store.delete_bet(auth.user_id, id).await?;
    state
        .audit(AuditEntry::new(auth.user_id, "delete", "bet").entity(id))
        .await;
    Ok(StatusCode::NO_CONTENT)
}
