use std::sync::Arc;

use crate::dao::game_store::GameStore;

/// Shared handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state holding the persistence handle.
///
/// The store is installed once at startup; a missing or broken schema aborts
/// the process before any state exists, so there is no degraded mode here.
pub struct AppState {
    store: Arc<dyn GameStore>,
}

impl AppState {
    /// Construct the state wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(store: Arc<dyn GameStore>) -> SharedState {
        Arc::new(Self { store })
    }

    /// The configured game store.
    pub fn store(&self) -> &dyn GameStore {
        self.store.as_ref()
    }
}
