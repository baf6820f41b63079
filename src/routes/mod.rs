pub mod appointments;
pub mod auth;
pub mod business;
pub mod catalog;
pub mod customers;
pub mod dashboard;
pub mod health;
pub mod locations;
pub mod metrics;
pub mod public;
pub mod staff;
pub mod tenants;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::ApiError,
    middleware::auth::JwtSecret,
    models::auth::AuthenticatedUser,
    AppState,
};

/// Owners and managers may write; staff accounts are read-only.
pub(crate) fn require_manager(user: &AuthenticatedUser) -> Result<(), ApiError> {
    if user.can_manage() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Allows the app base domain, its salon subdomains and localhost.
fn cors_layer(base_url: String) -> CorsLayer {
    let origin = AllowOrigin::predicate(move |origin: &HeaderValue, _| {
        let Ok(o) = origin.to_str() else {
            return false;
        };
        if o.starts_with("http://localhost") || o.starts_with("http://127.0.0.1") || o == base_url {
            return true;
        }
        base_url
            .split_once("://")
            .map(|(_, rest)| rest.split(['/', ':']).next().unwrap_or(rest))
            .is_some_and(|domain| o.ends_with(&format!(".{domain}")))
    });

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static("x-tenant"),
            header::HeaderName::from_static("x-super-admin-key"),
        ]))
        .allow_origin(origin)
}

pub fn router(state: AppState) -> Router {
    let jwt_secret = JwtSecret(state.config.jwt_secret.clone());
    let cors = cors_layer(state.config.app_base_url.clone());
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::metrics_handler))
        // Public booking page
        .route("/public/info", get(public::info))
        .route("/public/services", get(public::services))
        .route("/public/staff", get(public::staff))
        .route("/public/bookings", post(public::book))
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        // Customers
        .route("/customers", get(customers::list_customers).post(customers::create_customer))
        .route("/customers/export", get(customers::export_customers))
        .route(
            "/customers/{id}",
            get(customers::get_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        )
        // Staff
        .route("/staff", get(staff::list_staff).post(staff::create_staff))
        .route("/staff/{id}", put(staff::update_staff).delete(staff::delete_staff))
        .route("/staff/{id}/extra-minutes", put(staff::set_extra_minutes))
        // Services
        .route("/services", get(catalog::list_services).post(catalog::create_service))
        .route(
            "/services/{id}",
            get(catalog::get_service)
                .put(catalog::update_service)
                .delete(catalog::delete_service),
        )
        // Locations
        .route("/locations", get(locations::list_locations).post(locations::create_location))
        .route("/locations/{id}", put(locations::update_location).delete(locations::delete_location))
        // Business info
        .route("/business", get(business::get_business).put(business::update_business))
        // Appointments
        .route(
            "/appointments",
            get(appointments::list_appointments).post(appointments::create_appointment),
        )
        .route("/appointments/day", get(appointments::day_view))
        .route(
            "/appointments/{id}",
            get(appointments::get_appointment)
                .put(appointments::update_appointment)
                .delete(appointments::delete_appointment),
        )
        .route("/dashboard", get(dashboard::get_dashboard))
        // Super-admin
        .route("/super-admin/salons", get(tenants::list_salons).post(tenants::create_salon))
        .route("/super-admin/salons/{slug}", delete(tenants::deactivate_salon))
        .layer(axum::Extension(jwt_secret))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
