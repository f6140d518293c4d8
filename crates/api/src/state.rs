use std::sync::Arc;

use staybook_db::Repositories;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: repositories are `Arc<dyn ...>` and the config is shared.
#[derive(Clone)]
pub struct AppState {
    /// One implementation of each storage interface.
    pub repos: Repositories,
    pub config: Arc<ServerConfig>,
}
