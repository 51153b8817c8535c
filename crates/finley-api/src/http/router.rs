//! Axum router configuration with middleware.
//!
//! Proxy routes sit at the root (with `/api/token` and `/api/finley` kept
//! as aliases for older frontends); finance routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Budget
        .route(
            "/budget",
            get(handlers::budget::get_budget).put(handlers::budget::save_budget),
        )
        .route("/budget/allocate", post(handlers::budget::allocate))
        // Savings goals
        .route(
            "/goals",
            get(handlers::goal::list_goals).post(handlers::goal::create_goal),
        )
        .route("/goals/project", post(handlers::goal::project))
        .route("/goals/{id}/progress", put(handlers::goal::update_progress))
        // Expenses
        .route(
            "/expenses",
            get(handlers::expense::list_expenses).post(handlers::expense::add_expense),
        )
        // Achievements
        .route("/achievements", get(handlers::achievement::list_achievements))
        .route("/achievements/evaluate", post(handlers::achievement::evaluate))
        // Profile and dashboard
        .route(
            "/profile",
            get(handlers::profile::get_profile).put(handlers::profile::update_profile),
        )
        .route("/dashboard", get(handlers::profile::dashboard));

    Router::new()
        .route("/token", post(handlers::proxy::issue_token))
        .route("/chat", post(handlers::proxy::chat))
        .route("/api/token", post(handlers::proxy::issue_token))
        .route("/api/finley", post(handlers::proxy::chat))
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness plus which integrations are configured.
async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "inference_configured": state.relay.is_configured(),
        "finance_enabled": state.finance.is_some(),
    }))
}
