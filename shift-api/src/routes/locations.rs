/// Location endpoints, scoped to the caller's company
///
/// - `GET /v1/locations`
/// - `POST /v1/locations`
/// - `PUT /v1/locations/:id`
/// - `DELETE /v1/locations/:id`

use super::ListResponse;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    tenant::CurrentTenant,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shift_shared::forms::{FormInput, LocationForm};
use shift_shared::models::location::Location;
use shift_shared::store::{Record, StoreError};

pub async fn list_locations(
    State(state): State<AppState>,
    tenant: CurrentTenant,
) -> ApiResult<Json<ListResponse<Record<Location>>>> {
    let Some(company_id) = tenant.id() else {
        return Ok(Json(ListResponse::unresolved()));
    };

    let locations = Location::list(state.store.as_ref(), company_id).await?;
    Ok(Json(ListResponse::new(true, locations)))
}

pub async fn create_location(
    State(state): State<AppState>,
    tenant: CurrentTenant,
    Json(form): Json<LocationForm>,
) -> ApiResult<(StatusCode, Json<Record<Location>>)> {
    let company = tenant.require()?;
    let location = form.parse()?;

    let created = Location::create(state.store.as_ref(), &company.id, location).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_location(
    State(state): State<AppState>,
    tenant: CurrentTenant,
    Path(id): Path<String>,
    Json(form): Json<LocationForm>,
) -> ApiResult<Json<Record<Location>>> {
    let company = tenant.require()?;
    let location = form.parse()?;

    match Location::update(state.store.as_ref(), &company.id, &id, location.clone()).await {
        Ok(()) => Ok(Json(Record { id, data: location })),
        Err(StoreError::NotFound { .. }) => Err(ApiError::NotFound(format!("Location {} not found", id))),
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_location(
    State(state): State<AppState>,
    tenant: CurrentTenant,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let company = tenant.require()?;

    if Location::delete(state.store.as_ref(), &company.id, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Location {} not found", id)))
    }
}
