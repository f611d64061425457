use std::sync::Arc;

use formbase_airtable::AirtableClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: formbase_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Airtable REST/OAuth client, shared so connections pool.
    pub airtable: Arc<AirtableClient>,
}
