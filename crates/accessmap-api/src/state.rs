use std::sync::Arc;

use accessmap_core::clock::Clock;
use accessmap_core::config::LayeredConfig;
use accessmap_discovery::NearbySearchEngine;
use accessmap_recording::SessionRegistry;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
    pub search_engine: NearbySearchEngine,
    /// Time source shared with the registry
    pub clock: Arc<dyn Clock>,
    pub config: LayeredConfig,
}

impl AppState {
    pub fn new(
        registry: Arc<SessionRegistry>,
        clock: Arc<dyn Clock>,
        config: LayeredConfig,
    ) -> Self {
        Self {
            registry,
            search_engine: NearbySearchEngine::from_config(&config),
            clock,
            config,
        }
    }
}
