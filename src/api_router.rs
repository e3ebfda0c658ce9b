//! API Router
//!
//! Combines the API endpoints from the specialized modules into a unified
//! router consumed by the HTTP server.

use axum::Router;
use std::sync::Arc;

use crate::shared::state::AppState;

/// Configure all API routes from all modules
pub fn configure_api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // ===== Identity (directory module) =====
        .merge(crate::directory::configure_user_routes())
        // ===== Helpdesk tickets (tickets module) =====
        .merge(crate::tickets::configure_tickets_routes())
}
