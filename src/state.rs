use std::sync::Arc;

use crate::application::services::CatalogView;

/// Shared handler state: the one catalog view this process serves.
#[derive(Clone)]
pub struct AppState {
    pub view: Arc<CatalogView>,
}

impl AppState {
    pub fn new(view: Arc<CatalogView>) -> Self {
        Self { view }
    }
}
