// ==========================================
// Link Marketplace - Application State
// ==========================================
// Composition root: one shared connection, SQLite repositories,
// config manager, pricing engine, importer and the API facades.
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::{ImportApi, PricingApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::engine::PricingEngine;
use crate::importer::SiteImporterImpl;
use crate::repository::{
    ActionLogRepository, SqliteClientRepository, SqlitePriceOverrideRepository,
    SqlitePublisherRepository, SqliteSiteRepository,
};

/// Environment variable overriding the database location
pub const DB_PATH_ENV: &str = "LINK_MARKETPLACE_DB_PATH";

/// Shared application state
pub struct AppState {
    pub db_path: String,

    /// parse / preview / save / template
    pub import_api: Arc<ImportApi>,

    /// override administration and price queries
    pub pricing_api: Arc<PricingApi>,

    /// operator settings (config_kv)
    pub config_manager: Arc<ConfigManager>,

    // roster / client administration outside the facades (seeding, CLI)
    pub publisher_repo: Arc<SqlitePublisherRepository>,
    pub client_repo: Arc<SqliteClientRepository>,
    pub site_repo: Arc<SqliteSiteRepository>,
    pub action_log_repo: Arc<ActionLogRepository>,
}

impl AppState {
    /// Opens (or creates) the database and wires every layer
    ///
    /// # Returns
    /// - Err(String): database could not be opened or the schema could not be applied
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!(db_path = %db_path, "initializing AppState");

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("failed to open database {}: {}", db_path, e))?;
        init_schema(&conn).map_err(|e| format!("failed to apply schema: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // Repositories
        // ==========================================
        let site_repo = Arc::new(SqliteSiteRepository::new(conn.clone()));
        let publisher_repo = Arc::new(SqlitePublisherRepository::new(conn.clone()));
        let client_repo = Arc::new(SqliteClientRepository::new(conn.clone()));
        let override_repo = Arc::new(SqlitePriceOverrideRepository::new(conn.clone()));
        let action_log_repo = Arc::new(ActionLogRepository::new(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("failed to create ConfigManager: {}", e))?,
        );

        // ==========================================
        // Engine / importer
        // ==========================================
        let pricing_engine = Arc::new(PricingEngine::new(
            client_repo.clone(),
            site_repo.clone(),
            override_repo,
            config_manager.clone(),
        ));
        let importer = Arc::new(SiteImporterImpl::new(
            site_repo.clone(),
            publisher_repo.clone(),
            config_manager.clone(),
        ));

        // ==========================================
        // API facades
        // ==========================================
        let import_api = Arc::new(ImportApi::new(
            importer,
            pricing_engine.clone(),
            action_log_repo.clone(),
        ));
        let pricing_api = Arc::new(PricingApi::new(pricing_engine, action_log_repo.clone()));

        tracing::info!("AppState ready");

        Ok(Self {
            db_path,
            import_api,
            pricing_api,
            config_manager,
            publisher_repo,
            client_repo,
            site_repo,
            action_log_repo,
        })
    }
}

/// Default database path
///
/// 1. `LINK_MARKETPLACE_DB_PATH` when set and non-empty
/// 2. `<user data dir>/link-marketplace/marketplace.db`
/// 3. `./marketplace.db`
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./marketplace.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("link-marketplace");
        // fall back to the working directory when the data dir is read-only
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("marketplace.db");
        }
    }

    path.to_string_lossy().to_string()
}
