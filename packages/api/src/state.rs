// ABOUTME: Shared router state holding the service configuration
// ABOUTME: Clients are built per request from this configuration, never cached globally

use std::sync::Arc;

use figstory_ai::GenerationConfig;
use figstory_figma::FigmaConfig;

/// Everything the handlers need to build their upstream clients
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub figma: FigmaConfig,
    pub generation: GenerationConfig,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}
