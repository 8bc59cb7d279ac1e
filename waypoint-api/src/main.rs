use std::net::SocketAddr;
use std::sync::Arc;
use waypoint_api::{app, AppState};
use waypoint_core::SystemClock;
use waypoint_store::{app_config::Config, CacheGateway, HttpTripSource};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// One cache namespace for the whole process.
const SESSION_ID: &str = "api";

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "waypoint_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!("Starting Waypoint API on port {}", config.server.port);

    let storage = config
        .cache
        .build_storage(SESSION_ID)
        .expect("Failed to set up trip cache");
    tracing::info!("Trip cache backend: {:?}", config.cache.backend);

    let source = HttpTripSource::from_config(&config.api).expect("Failed to build trip client");

    let app_state = AppState {
        gateway: CacheGateway::new(storage, config.cache.key.clone()),
        source: Arc::new(source),
        clock: Arc::new(SystemClock),
        render: config.render.clone(),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
