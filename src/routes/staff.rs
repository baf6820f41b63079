use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use super::require_manager;
use crate::{
    error::ApiError,
    middleware::tenant::TenantSlug,
    models::{
        auth::AuthenticatedUser,
        staff::{CreateStaffRequest, ExtraMinutesRequest, Staff, UpdateStaffRequest},
    },
    services::staff::StaffService,
    AppState,
};

pub async fn list_staff(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<Staff>>, (StatusCode, Json<Value>)> {
    Ok(Json(StaffService::list(state.store.as_ref(), &tenant).await?))
}

pub async fn create_staff(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    user: AuthenticatedUser,
    Json(body): Json<CreateStaffRequest>,
) -> Result<(StatusCode, Json<Staff>), (StatusCode, Json<Value>)> {
    require_manager(&user)?;
    let staff = StaffService::create(state.store.as_ref(), &tenant, &body).await?;
    Ok((StatusCode::CREATED, Json(staff)))
}

pub async fn update_staff(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStaffRequest>,
) -> Result<Json<Staff>, (StatusCode, Json<Value>)> {
    require_manager(&user)?;
    let name = body.name.ok_or_else(|| ApiError::validation("Nothing to update"))?;
    Ok(Json(StaffService::rename(state.store.as_ref(), &tenant, id, &name).await?))
}

pub async fn set_extra_minutes(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<ExtraMinutesRequest>,
) -> Result<Json<Staff>, (StatusCode, Json<Value>)> {
    require_manager(&user)?;
    Ok(Json(
        StaffService::set_extra_minutes(state.store.as_ref(), &tenant, id, body.extra_minutes).await?,
    ))
}

pub async fn delete_staff(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    require_manager(&user)?;
    StaffService::delete(state.store.as_ref(), &tenant, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
