use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::Value;

use crate::{
    middleware::tenant::TenantSlug,
    models::{
        auth::AuthenticatedUser,
        dashboard::{DashboardQuery, DashboardSummary},
    },
    services::dashboard::DashboardService,
    AppState,
};

pub async fn get_dashboard(
    State(state): State<AppState>,
    TenantSlug(_tenant): TenantSlug,
    user: AuthenticatedUser,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardSummary>, (StatusCode, Json<Value>)> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    Ok(Json(DashboardService::summary(state.store.as_ref(), &user, date).await?))
}
