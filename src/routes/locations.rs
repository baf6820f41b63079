use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use super::require_manager;
use crate::{
    middleware::tenant::TenantSlug,
    models::{
        auth::AuthenticatedUser,
        location::{CreateLocationRequest, Location, UpdateLocationRequest},
    },
    services::locations::LocationService,
    AppState,
};

pub async fn list_locations(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<Location>>, (StatusCode, Json<Value>)> {
    Ok(Json(LocationService::list(state.store.as_ref(), &tenant).await?))
}

pub async fn create_location(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    user: AuthenticatedUser,
    Json(body): Json<CreateLocationRequest>,
) -> Result<(StatusCode, Json<Location>), (StatusCode, Json<Value>)> {
    require_manager(&user)?;
    let location = LocationService::create(state.store.as_ref(), &tenant, &body).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

pub async fn update_location(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateLocationRequest>,
) -> Result<Json<Location>, (StatusCode, Json<Value>)> {
    require_manager(&user)?;
    Ok(Json(LocationService::update(state.store.as_ref(), &tenant, id, &body).await?))
}

pub async fn delete_location(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    require_manager(&user)?;
    LocationService::delete(state.store.as_ref(), &tenant, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
