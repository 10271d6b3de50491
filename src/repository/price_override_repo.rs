// ==========================================
// Link Marketplace - Price Override Repository
// ==========================================
// One row per (client_id, site_id). Set is an upsert, remove is an
// idempotent delete.
// ==========================================

use crate::domain::site::PriceOverride;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

#[async_trait]
pub trait PriceOverrideRepository: Send + Sync {
    async fn find(&self, client_id: &str, site_id: &str) -> RepositoryResult<Option<PriceOverride>>;

    /// Creates the override if absent, otherwise replaces its price
    async fn upsert(&self, client_id: &str, site_id: &str, price: f64) -> RepositoryResult<PriceOverride>;

    /// Returns whether a row was removed; absence is not an error
    async fn delete(&self, client_id: &str, site_id: &str) -> RepositoryResult<bool>;

    async fn list_for_client(&self, client_id: &str) -> RepositoryResult<Vec<PriceOverride>>;
}

pub struct SqlitePriceOverrideRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqlitePriceOverrideRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row) -> rusqlite::Result<PriceOverride> {
        Ok(PriceOverride {
            client_id: row.get(0)?,
            site_id: row.get(1)?,
            price: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }
}

#[async_trait]
impl PriceOverrideRepository for SqlitePriceOverrideRepository {
    async fn find(&self, client_id: &str, site_id: &str) -> RepositoryResult<Option<PriceOverride>> {
        let conn = self.get_conn()?;
        let found = conn
            .query_row(
                r#"
                SELECT client_id, site_id, price, created_at, updated_at
                FROM price_overrides
                WHERE client_id = ?1 AND site_id = ?2
                "#,
                params![client_id, site_id],
                Self::map_row,
            )
            .optional()?;
        Ok(found)
    }

    async fn upsert(&self, client_id: &str, site_id: &str, price: f64) -> RepositoryResult<PriceOverride> {
        let conn = self.get_conn()?;
        let now = Utc::now();
        conn.execute(
            r#"
            INSERT INTO price_overrides (client_id, site_id, price, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            ON CONFLICT(client_id, site_id) DO UPDATE SET
                price = excluded.price,
                updated_at = excluded.updated_at
            "#,
            params![client_id, site_id, price, now],
        )?;

        let stored = conn.query_row(
            r#"
            SELECT client_id, site_id, price, created_at, updated_at
            FROM price_overrides
            WHERE client_id = ?1 AND site_id = ?2
            "#,
            params![client_id, site_id],
            Self::map_row,
        )?;
        Ok(stored)
    }

    async fn delete(&self, client_id: &str, site_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM price_overrides WHERE client_id = ?1 AND site_id = ?2",
            params![client_id, site_id],
        )?;
        Ok(affected > 0)
    }

    async fn list_for_client(&self, client_id: &str) -> RepositoryResult<Vec<PriceOverride>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT client_id, site_id, price, created_at, updated_at
            FROM price_overrides
            WHERE client_id = ?1
            ORDER BY site_id
            "#,
        )?;
        let overrides = stmt
            .query_map(params![client_id], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(overrides)
    }
}
