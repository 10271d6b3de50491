// ==========================================
// Link Marketplace - Site Repository
// ==========================================
// Port: SiteRepository (async, injected into the importer and pricing engine)
// Adapter: SqliteSiteRepository (rusqlite)
// No business rules here, only data mapping.
// ==========================================

use crate::domain::site::{NewSite, Site};
use crate::domain::types::{Category, SiteStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// SiteRepository Trait
// ==========================================
#[async_trait]
pub trait SiteRepository: Send + Sync {
    /// Looks a site up by its normalized URL
    async fn find_by_url(&self, url: &str) -> RepositoryResult<Option<Site>>;

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Site>>;

    /// Persists a new site and returns it with id and timestamps.
    ///
    /// # Returns
    /// - Err(UniqueConstraintViolation): the URL already exists
    /// - Err(ForeignKeyViolation): the publisher does not exist
    async fn create(&self, site: &NewSite) -> RepositoryResult<Site>;

    async fn update_status(&self, id: &str, status: SiteStatus) -> RepositoryResult<()>;

    /// Sites with the given status, ordered by URL
    async fn list_by_status(&self, status: SiteStatus) -> RepositoryResult<Vec<Site>>;

    async fn count(&self) -> RepositoryResult<i64>;
}

// ==========================================
// SqliteSiteRepository
// ==========================================
pub struct SqliteSiteRepository {
    conn: Arc<Mutex<Connection>>,
}

const SITE_COLUMNS: &str = "id, url, domain_authority, domain_rating, spam_score, traffic, \
     category, turnaround_time, base_price, country, language, publisher_id, status, \
     created_at, updated_at";

impl SqliteSiteRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row) -> rusqlite::Result<Site> {
        let category: Option<String> = row.get(6)?;
        let category = match category {
            Some(code) => Some(
                code.parse::<Category>()
                    .map_err(|e| conversion_error(6, e))?,
            ),
            None => None,
        };
        let status: String = row.get(12)?;
        let status = status
            .parse::<SiteStatus>()
            .map_err(|e| conversion_error(12, e))?;

        Ok(Site {
            id: row.get(0)?,
            url: row.get(1)?,
            domain_authority: row.get(2)?,
            domain_rating: row.get(3)?,
            spam_score: row.get(4)?,
            traffic: row.get(5)?,
            category,
            turnaround_time: row.get(7)?,
            base_price: row.get(8)?,
            country: row.get(9)?,
            language: row.get(10)?,
            publisher_id: row.get(11)?,
            status,
            created_at: row.get(13)?,
            updated_at: row.get(14)?,
        })
    }
}

fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, message.into())
}

#[async_trait]
impl SiteRepository for SqliteSiteRepository {
    async fn find_by_url(&self, url: &str) -> RepositoryResult<Option<Site>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM sites WHERE url = ?1", SITE_COLUMNS);
        let site = conn
            .query_row(&sql, params![url], Self::map_row)
            .optional()?;
        Ok(site)
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Site>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM sites WHERE id = ?1", SITE_COLUMNS);
        let site = conn
            .query_row(&sql, params![id], Self::map_row)
            .optional()?;
        Ok(site)
    }

    async fn create(&self, site: &NewSite) -> RepositoryResult<Site> {
        let now = Utc::now();
        let created = Site {
            id: uuid::Uuid::new_v4().to_string(),
            url: site.url.clone(),
            domain_authority: site.domain_authority,
            domain_rating: site.domain_rating,
            spam_score: site.spam_score,
            traffic: site.traffic,
            category: site.category,
            turnaround_time: site.turnaround_time.clone(),
            base_price: site.base_price,
            country: site.country.clone(),
            language: site.language.clone(),
            publisher_id: site.publisher_id.clone(),
            status: site.status,
            created_at: now,
            updated_at: now,
        };

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO sites (
                id, url, domain_authority, domain_rating, spam_score, traffic,
                category, turnaround_time, base_price, country, language,
                publisher_id, status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
            params![
                created.id,
                created.url,
                created.domain_authority,
                created.domain_rating,
                created.spam_score,
                created.traffic,
                created.category.map(|c| c.code()),
                created.turnaround_time,
                created.base_price,
                created.country,
                created.language,
                created.publisher_id,
                created.status.to_string(),
                created.created_at,
                created.updated_at,
            ],
        )?;

        Ok(created)
    }

    async fn update_status(&self, id: &str, status: SiteStatus) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE sites SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.to_string(), Utc::now(), id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Site".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn list_by_status(&self, status: SiteStatus) -> RepositoryResult<Vec<Site>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM sites WHERE status = ?1 ORDER BY url",
            SITE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let sites = stmt
            .query_map(params![status.to_string()], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sites)
    }

    async fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sites", [], |row| row.get(0))?;
        Ok(count)
    }
}
