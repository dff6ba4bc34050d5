use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::api::{
    auth::AuthUser,
    extract::ApiJson,
    state::AppState,
    types::{ListResponse, TicketStatusRequest},
};
use crate::domain::{AuditEntry, SupportTicket, TicketDraft};
use crate::error::{BetTrackerError, Result};

/// GET /api/support/tickets
pub async fn list_tickets(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ListResponse<SupportTicket>>> {
    Ok(Json(state.store.list_tickets(auth.user_id).await?.into()))
}

/// POST /api/support/tickets
pub async fn create_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(draft): ApiJson<TicketDraft>,
) -> Result<(StatusCode, Json<SupportTicket>)> {
    draft.validate()?;
    let ticket = state.store.insert_ticket(auth.user_id, &draft).await?;
    state
        .audit(
            AuditEntry::new(auth.user_id, "create", "support_ticket")
                .entity(ticket.id)
                .details(json!({ "priority": ticket.priority })),
        )
        .await;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// GET /api/support/tickets/:id
pub async fn get_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SupportTicket>> {
    Ok(Json(state.store.get_ticket(auth.user_id, id).await?))
}

/// PUT /api/support/tickets/:id/status
pub async fn update_ticket_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<TicketStatusRequest>,
) -> Result<Json<SupportTicket>> {
    let current = state.store.get_ticket(auth.user_id, id).await?;
    if !current.status.can_transition_to(req.status) {
        return Err(BetTrackerError::Conflict(format!(
            "ticket is {} and cannot move to {}",
            current.status.as_str(),
            req.status.as_str()
        )));
    }

    let ticket = state
        .store
        .update_ticket_status(auth.user_id, id, req.status)
        .await?;
    state
        .audit(
            AuditEntry::new(auth.user_id, "update_status", "support_ticket")
                .entity(id)
                .details(json!({ "from": current.status, "to": ticket.status })),
        )
        .await;
    Ok(Json(ticket))
}
