use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use super::require_manager;
use crate::{
    middleware::tenant::TenantSlug,
    models::{
        appointment::{
            Appointment, AppointmentDateQuery, CreateAppointmentRequest, DayViewQuery,
            UpdateAppointmentRequest,
        },
        auth::AuthenticatedUser,
        schedule::DaySchedule,
    },
    services::appointments::AppointmentService,
    AppState,
};

pub async fn list_appointments(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    _user: AuthenticatedUser,
    Query(query): Query<AppointmentDateQuery>,
) -> Result<Json<Vec<Appointment>>, (StatusCode, Json<Value>)> {
    Ok(Json(AppointmentService::list(state.store.as_ref(), &tenant, query.date).await?))
}

pub async fn get_appointment(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, (StatusCode, Json<Value>)> {
    Ok(Json(AppointmentService::get(state.store.as_ref(), &tenant, id).await?))
}

/// GET /appointments/day?date=YYYY-MM-DD[&staffId=...]
pub async fn day_view(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    _user: AuthenticatedUser,
    Query(query): Query<DayViewQuery>,
) -> Result<Json<DaySchedule>, (StatusCode, Json<Value>)> {
    Ok(Json(
        AppointmentService::day_view(state.store.as_ref(), &tenant, query.date, query.staff_id).await?,
    ))
}

pub async fn create_appointment(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    user: AuthenticatedUser,
    Json(body): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), (StatusCode, Json<Value>)> {
    require_manager(&user)?;
    let appointment = AppointmentService::create(state.store.as_ref(), &tenant, body).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

pub async fn update_appointment(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateAppointmentRequest>,
) -> Result<Json<Appointment>, (StatusCode, Json<Value>)> {
    require_manager(&user)?;
    Ok(Json(AppointmentService::update(state.store.as_ref(), &tenant, id, body).await?))
}

pub async fn delete_appointment(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    require_manager(&user)?;
    AppointmentService::delete(state.store.as_ref(), &tenant, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
