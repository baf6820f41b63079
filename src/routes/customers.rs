use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use super::require_manager;
use crate::{
    middleware::tenant::TenantSlug,
    models::{
        auth::AuthenticatedUser,
        customer::{Customer, CustomerInput, CustomerSearchQuery, UpdateCustomerRequest},
    },
    services::customers::CustomerService,
    AppState,
};

pub async fn list_customers(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    _user: AuthenticatedUser,
    Query(query): Query<CustomerSearchQuery>,
) -> Result<Json<Vec<Customer>>, (StatusCode, Json<Value>)> {
    Ok(Json(CustomerService::list(state.store.as_ref(), &tenant, query.q.as_deref()).await?))
}

pub async fn get_customer(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Customer>, (StatusCode, Json<Value>)> {
    Ok(Json(CustomerService::get(state.store.as_ref(), &tenant, id).await?))
}

/// Creates the customer, or merges into the one already holding this phone.
pub async fn create_customer(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    user: AuthenticatedUser,
    Json(body): Json<CustomerInput>,
) -> Result<(StatusCode, Json<Customer>), (StatusCode, Json<Value>)> {
    require_manager(&user)?;
    let (customer, created) = CustomerService::upsert_by_phone(state.store.as_ref(), &tenant, &body).await?;
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(customer)))
}

pub async fn update_customer(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCustomerRequest>,
) -> Result<Json<Customer>, (StatusCode, Json<Value>)> {
    require_manager(&user)?;
    Ok(Json(CustomerService::update(state.store.as_ref(), &tenant, id, &body).await?))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    require_manager(&user)?;
    CustomerService::delete(state.store.as_ref(), &tenant, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn export_customers(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    require_manager(&user)?;
    let customers = CustomerService::list(state.store.as_ref(), &tenant, None).await?;
    let csv = CustomerService::export_csv(&customers).map_err(|e| {
        tracing::error!("customer export failed for {tenant}: {e}");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "Export failed" })))
    })?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{tenant}-customers.csv\"")),
        ],
        csv,
    ))
}
