use std::sync::Arc;

use shipsplit_order::SplitOrchestrator;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SplitOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: SplitOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}
