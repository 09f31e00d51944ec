use std::sync::Arc;

use sde_mcp::ToolDispatcher;

/// Shared application state with injected dependencies.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<ToolDispatcher>,
}

impl AppState {
    #[must_use]
    pub fn new(dispatcher: ToolDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }
}
