use axum::middleware;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

pub mod auth;
pub mod customers;
pub mod loyalty_cards;

use auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router. Registration, login, health, and the
/// docs are public; everything else passes through [`auth::resolve_vendor`].
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let protected = Router::new()
        .route("/auth/me", get(auth::me).put(auth::update_me))
        .route("/customer/register", post(customers::register))
        .route("/customer/all", get(customers::all))
        .route(
            "/customer/:id",
            get(customers::get).put(customers::update).delete(customers::delete),
        )
        .route("/loyaltyCard/", post(loyalty_cards::create).get(loyalty_cards::list))
        .route("/loyaltyCard/:id", get(loyalty_cards::get))
        .route("/loyaltyCard/:id/punch", put(loyalty_cards::punch))
        .route("/loyaltyCard/:id/redeem", put(loyalty_cards::redeem))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::resolve_vendor));

    let docs = SwaggerUi::new("/docs").url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi());

    public
        .merge(protected)
        .merge(docs)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
