use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_handler))
        // Bets
        .route("/api/bets", get(handlers::list_bets).post(handlers::create_bet))
        .route(
            "/api/bets/:id",
            get(handlers::get_bet)
                .put(handlers::update_bet)
                .delete(handlers::delete_bet),
        )
        // Statistics
        .route("/api/statistics/dashboard", get(handlers::get_dashboard))
        .route("/api/statistics/summary", get(handlers::get_summary))
        .route("/api/statistics/evolution", get(handlers::get_evolution))
        .route("/api/statistics/breakdown", get(handlers::get_breakdown))
        .route("/api/statistics/odds", get(handlers::get_odds_breakdown))
        .route("/api/statistics/performance", get(handlers::get_performance))
        // Budget
        .route(
            "/api/budget/settings",
            get(handlers::get_budget_settings).put(handlers::update_budget_settings),
        )
        .route("/api/budget/overview", get(handlers::get_budget_overview))
        .route("/api/budget/check", post(handlers::check_budget_alerts))
        // Platforms
        .route(
            "/api/platforms",
            get(handlers::list_platforms).post(handlers::create_platform),
        )
        .route(
            "/api/platforms/:id",
            get(handlers::get_platform)
                .put(handlers::update_platform)
                .delete(handlers::delete_platform),
        )
        .route(
            "/api/platforms/:id/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        // Tipsters
        .route(
            "/api/tipsters",
            get(handlers::list_tipsters).post(handlers::create_tipster),
        )
        .route(
            "/api/tipsters/:id",
            get(handlers::get_tipster)
                .put(handlers::update_tipster)
                .delete(handlers::delete_tipster),
        )
        // Notifications
        .route("/api/notifications", get(handlers::list_notifications))
        .route(
            "/api/notifications/read-all",
            post(handlers::mark_all_notifications_read),
        )
        .route(
            "/api/notifications/:id/read",
            post(handlers::mark_notification_read),
        )
        // Support
        .route(
            "/api/support/tickets",
            get(handlers::list_tickets).post(handlers::create_ticket),
        )
        .route("/api/support/tickets/:id", get(handlers::get_ticket))
        .route(
            "/api/support/tickets/:id/status",
            put(handlers::update_ticket_status),
        )
        // Audit
        .route("/api/audit-logs", get(handlers::list_audit_logs))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
