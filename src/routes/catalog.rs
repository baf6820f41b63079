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
        service::{Service, ServiceInput},
    },
    services::catalog::CatalogService,
    AppState,
};

/// Includes hidden services, unlike the public listing.
pub async fn list_services(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<Service>>, (StatusCode, Json<Value>)> {
    Ok(Json(CatalogService::list(state.store.as_ref(), &tenant, true).await?))
}

pub async fn get_service(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Service>, (StatusCode, Json<Value>)> {
    Ok(Json(CatalogService::get(state.store.as_ref(), &tenant, id).await?))
}

pub async fn create_service(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    user: AuthenticatedUser,
    Json(body): Json<ServiceInput>,
) -> Result<(StatusCode, Json<Service>), (StatusCode, Json<Value>)> {
    require_manager(&user)?;
    let service = CatalogService::create(state.store.as_ref(), &tenant, &body).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

pub async fn update_service(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<ServiceInput>,
) -> Result<Json<Service>, (StatusCode, Json<Value>)> {
    require_manager(&user)?;
    Ok(Json(CatalogService::update(state.store.as_ref(), &tenant, id, &body).await?))
}

pub async fn delete_service(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    require_manager(&user)?;
    CatalogService::delete(state.store.as_ref(), &tenant, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
