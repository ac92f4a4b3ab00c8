//! Merch admin JSON API.
//!
//! Mounted under `/admin/api/merch` only when `STOREFRONT_ADMIN_ENABLED` is
//! set. There is no authentication; deployments that enable it are expected
//! to restrict the path upstream.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::instrument;
use veilbound_core::{MerchProduct, MerchProductId, MerchProductInput, NewMerchProduct};

use crate::error::{AppError, Result};
use crate::state::AppState;

fn parse_id(id: &str) -> Result<MerchProductId> {
    id.parse()
        .map_err(|_| AppError::BadRequest(format!("invalid product id: {id}")))
}

fn not_found(id: MerchProductId) -> AppError {
    AppError::NotFound(format!("merch product {id}"))
}

/// List every merch product, newest first.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<MerchProduct>>> {
    Ok(Json(state.catalog().list_all().await?))
}

/// Create a merch product.
#[instrument(skip(state, input), fields(name = %input.name))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<MerchProductInput>,
) -> Result<impl IntoResponse> {
    let product = NewMerchProduct::parse(&input)?;
    let created = state.catalog().create(&product).await?;
    tracing::info!(id = %created.id, name = %created.name, "Merch product created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace a merch product's fields.
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<MerchProductInput>,
) -> Result<Json<MerchProduct>> {
    let id = parse_id(&id)?;
    let product = NewMerchProduct::parse(&input)?;
    let updated = state
        .catalog()
        .update(id, &product)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(id = %id, "Merch product updated");

    Ok(Json(updated))
}

/// Delete a merch product.
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    let id = parse_id(&id)?;
    if !state.catalog().delete(id).await? {
        return Err(not_found(id));
    }
    tracing::info!(id = %id, "Merch product deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Flip a product between shown and hidden on the shop page.
#[instrument(skip(state))]
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MerchProduct>> {
    let id = parse_id(&id)?;
    let current = state.catalog().get(id).await?.ok_or_else(|| not_found(id))?;
    let updated = state
        .catalog()
        .set_active(id, !current.is_active)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(id = %id, is_active = updated.is_active, "Merch product toggled");

    Ok(Json(updated))
}
