//! Unauthenticated endpoints backing the public booking page.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;

use crate::{
    middleware::tenant::TenantSlug,
    models::{
        appointment::{BookingConfirmation, BookingRequest},
        business::BusinessInfo,
        service::Service,
        staff::StaffSummary,
    },
    services::{
        booking::BookingService, business::BusinessService, catalog::CatalogService,
        metrics::BOOKINGS_COUNTER, staff::StaffService,
    },
    AppState,
};

pub async fn info(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
) -> Result<Json<BusinessInfo>, (StatusCode, Json<Value>)> {
    Ok(Json(BusinessService::get(state.store.as_ref(), &tenant).await?))
}

pub async fn services(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
) -> Result<Json<Vec<Service>>, (StatusCode, Json<Value>)> {
    Ok(Json(CatalogService::list(state.store.as_ref(), &tenant, false).await?))
}

pub async fn staff(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
) -> Result<Json<Vec<StaffSummary>>, (StatusCode, Json<Value>)> {
    let roster = StaffService::list(state.store.as_ref(), &tenant).await?;
    Ok(Json(roster.into_iter().map(StaffSummary::from).collect()))
}

pub async fn book(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    Json(body): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookingConfirmation>), (StatusCode, Json<Value>)> {
    match BookingService::book(state.store.as_ref(), &tenant, body).await {
        Ok(confirmation) => {
            BOOKINGS_COUNTER.with_label_values(&[&tenant, "accepted"]).inc();
            Ok((StatusCode::CREATED, Json(confirmation)))
        }
        Err(e) => {
            BOOKINGS_COUNTER.with_label_values(&[&tenant, "rejected"]).inc();
            Err(e.into())
        }
    }
}
