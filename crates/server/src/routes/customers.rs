use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use service::customer_service::{CustomerService, CustomerUpdate};

use crate::errors::ApiError;
use crate::routes::auth::{CurrentVendor, MessageOutput, ServerState};

fn customer_service(state: &ServerState) -> CustomerService {
    CustomerService::new(state.db.clone(), state.enrollment.clone())
}

/// Path ids arrive as opaque strings; a malformed UUID is a client error.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("invalid id: {raw}")))
}

#[derive(Deserialize)]
pub struct RegisterCustomerInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[utoipa::path(post, path = "/customer/register", tag = "customer",
    request_body = crate::openapi::RegisterCustomerRequest,
    responses((status = 201, description = "Customer registered"), (status = 400, description = "Invalid input")))]
pub async fn register(
    State(state): State<ServerState>,
    Extension(CurrentVendor(vendor)): Extension<CurrentVendor>,
    Json(input): Json<RegisterCustomerInput>,
) -> Result<(StatusCode, Json<models::customer::Model>), ApiError> {
    let created = customer_service(&state)
        .register(vendor.id, &input.name, input.email, input.phone)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/customer/all", tag = "customer",
    responses((status = 200, description = "Vendor's customers")))]
pub async fn all(
    State(state): State<ServerState>,
    Extension(CurrentVendor(vendor)): Extension<CurrentVendor>,
) -> Result<Json<Vec<models::customer::Model>>, ApiError> {
    let customers = customer_service(&state).list(vendor.id).await?;
    Ok(Json(customers))
}

#[utoipa::path(get, path = "/customer/{id}", tag = "customer",
    responses((status = 200, description = "Customer"), (status = 404, description = "Not found"), (status = 403, description = "Owned by another vendor")))]
pub async fn get(
    State(state): State<ServerState>,
    Extension(CurrentVendor(vendor)): Extension<CurrentVendor>,
    Path(id): Path<String>,
) -> Result<Json<models::customer::Model>, ApiError> {
    let id = parse_id(&id)?;
    let customer = customer_service(&state).get(vendor.id, id).await?;
    Ok(Json(customer))
}

#[utoipa::path(put, path = "/customer/{id}", tag = "customer",
    request_body = crate::openapi::CustomerUpdateRequest,
    responses((status = 200, description = "Updated customer"), (status = 400, description = "Empty update or invalid input")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(CurrentVendor(vendor)): Extension<CurrentVendor>,
    Path(id): Path<String>,
    Json(update): Json<CustomerUpdate>,
) -> Result<Json<models::customer::Model>, ApiError> {
    let id = parse_id(&id)?;
    if update.is_empty() {
        return Err(ApiError::bad_request("no fields to update"));
    }
    let updated = customer_service(&state).update(vendor.id, id, update).await?;
    Ok(Json(updated))
}

#[utoipa::path(delete, path = "/customer/{id}", tag = "customer",
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(CurrentVendor(vendor)): Extension<CurrentVendor>,
    Path(id): Path<String>,
) -> Result<Json<MessageOutput>, ApiError> {
    let id = parse_id(&id)?;
    customer_service(&state).delete(vendor.id, id).await?;
    Ok(Json(MessageOutput { message: format!("Customer {} deleted successfully", id) }))
}
