//! Multi-tenant salon booking and CRM API.
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use config::Config;
use middleware::rate_limit::RateLimiter;
use store::SalonStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SalonStore>,
    pub rate_limiter: RateLimiter,
    pub config: Arc<Config>,
}
