use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::Serialize;
use uuid::Uuid;

use service::auth::domain::{AuthVendor, LoginInput, RegisterInput, VendorUpdate};
use service::auth::repo::seaorm::SeaOrmVendorRepository;
use service::auth::{AuthService, TokenService};
use service::enrollment::EnrollmentStore;

use crate::errors::ApiError;

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub tokens: TokenService,
    pub enrollment: Arc<dyn EnrollmentStore>,
}

/// Authenticated vendor identity, injected by [`resolve_vendor`] into the
/// request extensions for protected handlers.
#[derive(Clone)]
pub struct CurrentVendor(pub AuthVendor);

fn auth_service(state: &ServerState) -> AuthService<SeaOrmVendorRepository> {
    AuthService::new(
        Arc::new(SeaOrmVendorRepository { db: state.db.clone() }),
        state.tokens.clone(),
    )
}

#[derive(Serialize)]
pub struct RegisterOutput {
    pub message: String,
    pub vendor_id: Uuid,
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub access_token: String,
}

#[derive(Serialize)]
pub struct MessageOutput {
    pub message: String,
}

/// Protected-route middleware: extract the bearer token, validate it, and
/// resolve the vendor it names. A valid token for a vendor that no longer
/// exists is 404, not 401.
pub async fn resolve_vendor(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("missing Authorization header"))?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("invalid Authorization format (expect Bearer)"))?;

    let claims = state.tokens.validate(token)?;
    let vendor = models::vendor::Entity::find_by_id(claims.vendor_id)
        .one(&state.db)
        .await
        .map_err(|e| {
            ApiError::new(axum::http::StatusCode::INTERNAL_SERVER_ERROR, 1500, e.to_string())
        })?
        .ok_or_else(|| ApiError::not_found("vendor not found"))?;

    req.extensions_mut().insert(CurrentVendor(AuthVendor {
        id: vendor.id,
        email: vendor.email,
        name: vendor.name,
        business_name: vendor.business_name,
        created_at: vendor.created_at,
        updated_at: vendor.updated_at,
    }));
    Ok(next.run(req).await)
}

#[utoipa::path(post, path = "/auth/register", tag = "auth",
    request_body = crate::openapi::RegisterRequest,
    responses((status = 201, description = "Registered"), (status = 400, description = "Duplicate email or invalid input")))]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<(axum::http::StatusCode, Json<RegisterOutput>), ApiError> {
    let vendor = auth_service(&state).register(input).await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(RegisterOutput {
            message: "Vendor registered successfully".into(),
            vendor_id: vendor.id,
        }),
    ))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses((status = 200, description = "Logged in"), (status = 401, description = "Invalid credentials")))]
pub async fn login(
    State(state): State<ServerState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<LoginOutput>, ApiError> {
    let session = auth_service(&state).login(input).await?;
    Ok(Json(LoginOutput { access_token: session.token }))
}

#[utoipa::path(get, path = "/auth/me", tag = "auth",
    responses((status = 200, description = "Current vendor profile"), (status = 401, description = "Unauthorized")))]
pub async fn me(
    axum::Extension(CurrentVendor(vendor)): axum::Extension<CurrentVendor>,
) -> Json<AuthVendor> {
    Json(vendor)
}

#[utoipa::path(put, path = "/auth/me", tag = "auth",
    request_body = crate::openapi::VendorUpdateRequest,
    responses((status = 200, description = "Updated profile or no-op message")))]
pub async fn update_me(
    State(state): State<ServerState>,
    axum::Extension(CurrentVendor(vendor)): axum::Extension<CurrentVendor>,
    Json(update): Json<VendorUpdate>,
) -> Result<axum::response::Response, ApiError> {
    use axum::response::IntoResponse;
    if update.is_empty() {
        return Ok(Json(MessageOutput { message: "No fields to update".into() }).into_response());
    }
    let updated = auth_service(&state).update_profile(vendor.id, update).await?;
    Ok(Json(updated).into_response())
}
