// ==========================================
// Link Marketplace - Config Manager
// ==========================================
// Loads, queries and overrides settings.
// Storage: config_kv table (key-value + scope)
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::db::open_sqlite_connection;
use crate::domain::types::{CsvDialect, TemplateVariant, UploadContract};
use crate::importer::error::{ImportError, ImportResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Opens its own connection to `db_path`
    pub fn new(db_path: &str) -> ImportResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Shares an existing connection (PRAGMAs are re-applied, idempotent)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ImportResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| ImportError::InternalError(format!("lock failed: {}", e)))?;
            crate::db::configure_sqlite_connection(&guard)?;
        }

        Ok(Self { conn })
    }

    /// Reads a value from config_kv (scope_id='global')
    ///
    /// # Returns
    /// - Some(String): stored value
    /// - None: key absent
    pub fn get_global_config_value(&self, key: &str) -> ImportResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ImportError::InternalError(format!("lock failed: {}", e)))?;

        conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|e| ImportError::ConfigReadError {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    /// Upserts a global value
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ImportResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ImportError::InternalError(format!("lock failed: {}", e)))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;

        tracing::info!(config_key = key, value = value, "config value updated");
        Ok(())
    }

    /// All global settings as a JSON object, keys sorted
    pub fn get_config_snapshot(&self) -> ImportResult<String> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ImportError::InternalError(format!("lock failed: {}", e)))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        serde_json::to_string(&json!(config_map))
            .map_err(|e| ImportError::InternalError(e.to_string()))
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> ImportResult<String> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Reads and parses a value; a stored value that does not parse is an error
    fn get_parsed<T>(&self, key: &str, default: &str) -> ImportResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let value = self.get_config_or_default(key, default)?;
        value
            .trim()
            .parse::<T>()
            .map_err(|e| ImportError::ConfigValueError {
                key: key.to_string(),
                value: value.clone(),
                message: e.to_string(),
            })
    }
}

// ==========================================
// ImportConfigReader implementation
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_preview_row_limit(&self) -> ImportResult<usize> {
        let limit: usize = self.get_parsed(config_keys::PREVIEW_ROW_LIMIT, "20")?;
        if limit == 0 {
            return Err(ImportError::ConfigValueError {
                key: config_keys::PREVIEW_ROW_LIMIT.to_string(),
                value: "0".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }
        Ok(limit)
    }

    async fn get_upload_contract(&self) -> ImportResult<UploadContract> {
        self.get_parsed(config_keys::UPLOAD_CONTRACT, "current")
    }

    async fn get_csv_dialect(&self) -> ImportResult<CsvDialect> {
        self.get_parsed(config_keys::CSV_DIALECT, "standard")
    }

    async fn get_template_variant(&self) -> ImportResult<TemplateVariant> {
        self.get_parsed(config_keys::TEMPLATE_VARIANT, "current")
    }

    async fn get_default_markup_percentage(&self) -> ImportResult<f64> {
        let pct: f64 = self.get_parsed(config_keys::DEFAULT_MARKUP_PERCENTAGE, "25")?;
        if !pct.is_finite() || pct < 0.0 {
            return Err(ImportError::ConfigValueError {
                key: config_keys::DEFAULT_MARKUP_PERCENTAGE.to_string(),
                value: pct.to_string(),
                message: "must be a non-negative number".to_string(),
            });
        }
        Ok(pct)
    }
}

// ==========================================
// Config keys
// ==========================================
pub mod config_keys {
    // import pipeline
    pub const PREVIEW_ROW_LIMIT: &str = "import/preview_row_limit";
    pub const UPLOAD_CONTRACT: &str = "import/upload_contract";
    pub const CSV_DIALECT: &str = "import/csv_dialect";
    pub const TEMPLATE_VARIANT: &str = "import/template_variant";

    // pricing
    pub const DEFAULT_MARKUP_PERCENTAGE: &str = "pricing/default_markup_percentage";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_absent() {
        let config = manager();
        assert_eq!(config.get_preview_row_limit().await.unwrap(), 20);
        assert_eq!(config.get_upload_contract().await.unwrap(), UploadContract::Current);
        assert_eq!(config.get_csv_dialect().await.unwrap(), CsvDialect::Standard);
        assert_eq!(config.get_template_variant().await.unwrap(), TemplateVariant::Current);
        assert_eq!(config.get_default_markup_percentage().await.unwrap(), 25.0);
    }

    #[tokio::test]
    async fn test_overrides_are_read() {
        let config = manager();
        config.set_global_config_value(config_keys::PREVIEW_ROW_LIMIT, "5").unwrap();
        config.set_global_config_value(config_keys::UPLOAD_CONTRACT, "legacy").unwrap();
        config.set_global_config_value(config_keys::CSV_DIALECT, "Legacy").unwrap();
        config.set_global_config_value(config_keys::DEFAULT_MARKUP_PERCENTAGE, "10.5").unwrap();

        assert_eq!(config.get_preview_row_limit().await.unwrap(), 5);
        assert_eq!(config.get_upload_contract().await.unwrap(), UploadContract::Legacy);
        assert_eq!(config.get_csv_dialect().await.unwrap(), CsvDialect::Legacy);
        assert_eq!(config.get_default_markup_percentage().await.unwrap(), 10.5);

        let snapshot: serde_json::Value =
            serde_json::from_str(&config.get_config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot["import/preview_row_limit"], "5");
    }

    #[tokio::test]
    async fn test_bad_values_are_errors() {
        let config = manager();
        config.set_global_config_value(config_keys::PREVIEW_ROW_LIMIT, "0").unwrap();
        config.set_global_config_value(config_keys::TEMPLATE_VARIANT, "fancy").unwrap();
        config.set_global_config_value(config_keys::DEFAULT_MARKUP_PERCENTAGE, "-3").unwrap();

        assert!(matches!(
            config.get_preview_row_limit().await,
            Err(ImportError::ConfigValueError { .. })
        ));
        assert!(matches!(
            config.get_template_variant().await,
            Err(ImportError::ConfigValueError { .. })
        ));
        assert!(matches!(
            config.get_default_markup_percentage().await,
            Err(ImportError::ConfigValueError { .. })
        ));
    }
}
