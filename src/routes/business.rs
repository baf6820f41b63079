use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;

use super::require_manager;
use crate::{
    middleware::tenant::TenantSlug,
    models::{
        auth::AuthenticatedUser,
        business::{BusinessInfo, BusinessInfoInput},
    },
    services::business::BusinessService,
    AppState,
};

pub async fn get_business(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    _user: AuthenticatedUser,
) -> Result<Json<BusinessInfo>, (StatusCode, Json<Value>)> {
    Ok(Json(BusinessService::get(state.store.as_ref(), &tenant).await?))
}

pub async fn update_business(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    user: AuthenticatedUser,
    Json(body): Json<BusinessInfoInput>,
) -> Result<Json<BusinessInfo>, (StatusCode, Json<Value>)> {
    require_manager(&user)?;
    Ok(Json(BusinessService::save(state.store.as_ref(), &tenant, &body).await?))
}
