use std::sync::Arc;

use crate::config::Config;
use crate::services::CardService;
use crate::vision::CardExtractor;

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub cards: CardService,
}

impl AppState {
    pub fn new(config: Config, extractor: Arc<dyn CardExtractor>) -> Self {
        Self {
            config: Arc::new(config),
            cards: CardService::new(extractor),
        }
    }
}
