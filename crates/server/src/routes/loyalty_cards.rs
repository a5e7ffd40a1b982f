use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use service::loyalty::domain::Card;
use service::loyalty::repo::seaorm::SeaOrmCardRepository;
use service::loyalty::CardService;

use crate::errors::ApiError;
use crate::routes::auth::{CurrentVendor, ServerState};
use crate::routes::customers::parse_id;

fn card_service(state: &ServerState) -> CardService<SeaOrmCardRepository> {
    CardService::new(Arc::new(SeaOrmCardRepository { db: state.db.clone() }))
}

#[derive(Deserialize)]
pub struct CreateCardInput {
    pub customer_id: String,
    pub reward_threshold: i32,
}

#[derive(Deserialize)]
pub struct ListCardsQuery {
    pub vendor_id: Option<String>,
}

#[utoipa::path(post, path = "/loyaltyCard/", tag = "loyaltyCard",
    request_body = crate::openapi::CreateCardRequest,
    responses((status = 201, description = "Card created"), (status = 400, description = "Duplicate card or invalid input"), (status = 404, description = "Customer not found")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(CurrentVendor(vendor)): Extension<CurrentVendor>,
    Json(input): Json<CreateCardInput>,
) -> Result<(StatusCode, Json<Card>), ApiError> {
    let customer_id = parse_id(&input.customer_id)?;
    let card = card_service(&state)
        .create(vendor.id, customer_id, input.reward_threshold)
        .await?;
    Ok((StatusCode::CREATED, Json(card)))
}

#[utoipa::path(get, path = "/loyaltyCard/{id}", tag = "loyaltyCard",
    responses((status = 200, description = "Card"), (status = 404, description = "Not found"), (status = 403, description = "Owned by another vendor")))]
pub async fn get(
    State(state): State<ServerState>,
    Extension(CurrentVendor(vendor)): Extension<CurrentVendor>,
    Path(id): Path<String>,
) -> Result<Json<Card>, ApiError> {
    let id = parse_id(&id)?;
    let card = card_service(&state).get(vendor.id, id).await?;
    Ok(Json(card))
}

#[utoipa::path(get, path = "/loyaltyCard/", tag = "loyaltyCard",
    responses((status = 200, description = "Vendor's cards, newest first"), (status = 403, description = "Filter names another vendor")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(CurrentVendor(vendor)): Extension<CurrentVendor>,
    Query(query): Query<ListCardsQuery>,
) -> Result<Json<Vec<Card>>, ApiError> {
    let filter: Option<Uuid> = match query.vendor_id {
        Some(raw) => Some(parse_id(&raw)?),
        None => None,
    };
    let cards = card_service(&state).list(vendor.id, filter).await?;
    Ok(Json(cards))
}

#[utoipa::path(put, path = "/loyaltyCard/{id}/punch", tag = "loyaltyCard",
    responses((status = 200, description = "Punched card"), (status = 400, description = "Reward already claimed")))]
pub async fn punch(
    State(state): State<ServerState>,
    Extension(CurrentVendor(vendor)): Extension<CurrentVendor>,
    Path(id): Path<String>,
) -> Result<Json<Card>, ApiError> {
    let id = parse_id(&id)?;
    let card = card_service(&state).punch(vendor.id, id).await?;
    Ok(Json(card))
}

#[utoipa::path(put, path = "/loyaltyCard/{id}/redeem", tag = "loyaltyCard",
    responses((status = 200, description = "Redeemed card"), (status = 400, description = "Already claimed or not enough punches")))]
pub async fn redeem(
    State(state): State<ServerState>,
    Extension(CurrentVendor(vendor)): Extension<CurrentVendor>,
    Path(id): Path<String>,
) -> Result<Json<Card>, ApiError> {
    let id = parse_id(&id)?;
    let card = card_service(&state).redeem(vendor.id, id).await?;
    Ok(Json(card))
}
