use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use taxitera_api::{app, state::{AppState, AuthConfig}, worker};
use taxitera_booking::BookingManager;
use taxitera_core::repository::{NotificationDispatcher, NotificationOutbox};
use taxitera_pricing::PricingEngine;
use taxitera_store::{DbClient, PgBookingStore, RedisClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taxitera_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = taxitera_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting TaxiTera API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let redis = match RedisClient::new(&config.redis.url).await {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            tracing::warn!("Redis unavailable, rate limiting disabled: {}", e);
            None
        }
    };

    let store = Arc::new(PgBookingStore::new(db.pool.clone()));

    let outbox: Arc<dyn NotificationOutbox> = store.clone();
    let dispatcher: Arc<dyn NotificationDispatcher> = Arc::new(worker::LogDispatcher);
    tokio::spawn(worker::start_outbox_worker(
        outbox,
        dispatcher,
        Duration::from_secs(config.notifications.poll_interval_seconds),
        config.notifications.batch_size,
        config.notifications.max_attempts,
    ));

    let app_state = AppState {
        bookings: Arc::new(BookingManager::new(store)),
        pricing: Arc::new(PricingEngine::default()),
        redis,
        rate_limit_per_minute: config.redis.rate_limit_per_minute,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
