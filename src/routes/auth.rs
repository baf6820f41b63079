use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    middleware::tenant::TenantSlug,
    models::{
        auth::AuthenticatedUser,
        user::{LoginRequest, LoginResponse},
    },
    services::{auth::AuthService, metrics::LOGINS_COUNTER},
    AppState,
};

pub async fn login(
    State(state): State<AppState>,
    TenantSlug(tenant): TenantSlug,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<Value>)> {
    // 5 attempts per 15 min per email+tenant
    let rate_key = format!("rate:login:{}:{}", tenant, body.email.trim().to_lowercase());
    state.rate_limiter.check(&rate_key, 5, 900).await?;

    match AuthService::login(
        state.store.as_ref(),
        &tenant,
        &body.email,
        &body.password,
        &state.config.jwt_secret,
        state.config.jwt_expiry_seconds,
    )
    .await
    {
        Ok(res) => {
            LOGINS_COUNTER.with_label_values(&[&tenant, "success"]).inc();
            Ok(Json(res))
        }
        Err(e) => {
            LOGINS_COUNTER.with_label_values(&[&tenant, "failure"]).inc();
            tracing::warn!("login failed on {tenant}: {e}");
            Err((StatusCode::UNAUTHORIZED, Json(json!({ "error": "Invalid credentials" }))))
        }
    }
}

pub async fn me(user: AuthenticatedUser) -> Json<Value> {
    Json(json!({
        "userId": user.user_id,
        "tenant": user.tenant,
        "role": user.role,
        "staffId": user.staff_id,
    }))
}
