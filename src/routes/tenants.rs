use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::{
    middleware::auth::SuperAdminAuth,
    models::tenant::{CreateSalonRequest, Salon},
    services::tenants::TenantService,
    AppState,
};

pub async fn list_salons(
    State(state): State<AppState>,
    _auth: SuperAdminAuth,
) -> Result<Json<Vec<Salon>>, (StatusCode, Json<Value>)> {
    Ok(Json(TenantService::list(state.store.as_ref()).await?))
}

pub async fn create_salon(
    State(state): State<AppState>,
    _auth: SuperAdminAuth,
    Json(body): Json<CreateSalonRequest>,
) -> Result<(StatusCode, Json<Salon>), (StatusCode, Json<Value>)> {
    let salon = TenantService::create(state.store.as_ref(), &body).await?;
    Ok((StatusCode::CREATED, Json(salon)))
}

pub async fn deactivate_salon(
    State(state): State<AppState>,
    _auth: SuperAdminAuth,
    Path(slug): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    TenantService::deactivate(state.store.as_ref(), &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
