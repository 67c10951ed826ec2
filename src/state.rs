use std::sync::Arc;

use crate::backend::BackingService;

/// Shared handler state: the backing-service client built at startup
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn BackingService>,
}

impl AppState {
    pub fn new(backend: impl BackingService + 'static) -> Self {
        Self { backend: Arc::new(backend) }
    }

    pub fn from_arc(backend: Arc<dyn BackingService>) -> Self {
        Self { backend }
    }
}
