use std::sync::Arc;
use waypoint_core::Clock;
use waypoint_store::app_config::RenderConfig;
use waypoint_shared::CacheEntry;
use waypoint_store::{CacheGateway, FetchError, TripSource};

#[derive(Clone)]
pub struct AppState {
    pub gateway: CacheGateway,
    pub source: Arc<dyn TripSource>,
    pub clock: Arc<dyn Clock>,
    pub render: RenderConfig,
}

impl AppState {
    /// Cached trip list, fetched and cached on a miss.
    pub async fn trips(&self) -> Result<CacheEntry, FetchError> {
        let source = Arc::clone(&self.source);
        self.gateway
            .read_through(|| async move { source.fetch_trips().await })
            .await
    }

    pub fn language<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested.unwrap_or(&self.render.default_language)
    }
}
