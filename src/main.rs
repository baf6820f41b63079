use std::sync::Arc;

use redis::Client as RedisClient;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use salonbook_api::{
    config::{Config, StorageConfig},
    db,
    middleware::rate_limit::RateLimiter,
    routes,
    services::metrics,
    store::{memory::MemoryStore, postgres::PgStore, SalonStore},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env()?);

    let store: Arc<dyn SalonStore> = match &config.storage {
        StorageConfig::Postgres { database_url } => {
            let pool = db::create_pool(database_url).await?;
            db::run_migrations(&pool).await?;
            db::migrate_all_existing_tenants(&pool).await?;
            info!("Database connected and migrations applied");
            Arc::new(PgStore::new(pool))
        }
        StorageConfig::Memory => {
            warn!("DATABASE_URL not set, using in-memory storage (data is lost on restart)");
            Arc::new(MemoryStore::new())
        }
    };

    let rate_limiter = match &config.redis_url {
        Some(url) => {
            let conn = RedisClient::open(url.as_str())?
                .get_multiplexed_async_connection()
                .await?;
            info!("Redis connected, login rate limiting enabled");
            RateLimiter::new(Some(conn))
        }
        None => {
            info!("REDIS_URL not set, login rate limiting disabled");
            RateLimiter::disabled()
        }
    };

    metrics::start(store.clone());

    let state = AppState {
        store,
        rate_limiter,
        config: config.clone(),
    };
    let app = routes::router(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("salonbook API listening on {} ({} storage)", addr, config.storage_label());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
