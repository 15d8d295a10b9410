use crate::config::Options;
use crate::store::Store;
use std::sync::Arc;

/// Shared by every handler. The store is opened once at startup and never
/// replaced.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub options: Options,
}

impl AppState {
    pub fn new(store: Arc<Store>, options: Options) -> Self {
        Self { store, options }
    }
}
