//! Application state.

use std::sync::Arc;

use recipe_store::RecipeStore;
use similarity::Reconciler;

use crate::config::Config;

/// Shared application state.
pub struct AppState<S: RecipeStore> {
    /// Server configuration.
    pub config: Config,
    /// Recipe store.
    pub store: S,
    /// Similarity reconciler, built from the configured strategy.
    pub reconciler: Reconciler,
}

impl<S: RecipeStore> AppState<S> {
    /// Creates new application state.
    pub fn new(config: Config, store: S) -> Self {
        let reconciler = Reconciler::new(config.match_strategy());
        Self {
            config,
            store,
            reconciler,
        }
    }
}

/// Type alias for shared state.
pub type SharedState<S> = Arc<AppState<S>>;

/// Creates shared state from config and store.
pub fn create_shared_state<S: RecipeStore>(config: Config, store: S) -> SharedState<S> {
    Arc::new(AppState::new(config, store))
}
