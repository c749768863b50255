use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::session::require_session;
use crate::state::AppState;
use crate::{auth, payment, pricing, templates, valentines};

/// Prefix every API route is mounted under.
pub const API_PREFIX: &str = "/api";

pub fn api_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/session", post(auth::create_session))
        .route("/auth/logout", post(auth::logout))
        .route("/templates", get(templates::list_templates))
        .route("/valentines/{valentine_id}", get(valentines::get_valentine))
        .route(
            "/valentines/{valentine_id}/response",
            post(valentines::record_response),
        )
        .route("/payment/pricing", post(pricing::get_pricing))
        .route("/payment/create-order", post(payment::create_order))
        .route("/payment/verify", post(payment::verify_payment));

    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .route(
            "/valentines",
            post(valentines::create_valentine).get(valentines::list_valentines),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .nest(API_PREFIX, public_routes.merge(protected_routes))
        .with_state(state)
}
