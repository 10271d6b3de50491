// ==========================================
// Link Marketplace - Publisher Repository
// ==========================================
// The publisher roster the importer resolves names/emails against.
// ==========================================

use crate::domain::site::Publisher;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

#[async_trait]
pub trait PublisherRepository: Send + Sync {
    /// Current roster, ordered by name
    async fn list_all(&self) -> RepositoryResult<Vec<Publisher>>;

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Publisher>>;

    async fn create(&self, name: &str, email: &str) -> RepositoryResult<Publisher>;
}

pub struct SqlitePublisherRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqlitePublisherRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

#[async_trait]
impl PublisherRepository for SqlitePublisherRepository {
    async fn list_all(&self) -> RepositoryResult<Vec<Publisher>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT id, name, email FROM publishers ORDER BY name, id")?;
        let roster = stmt
            .query_map([], |row| {
                Ok(Publisher {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(roster)
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Publisher>> {
        let conn = self.get_conn()?;
        let publisher = conn
            .query_row(
                "SELECT id, name, email FROM publishers WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Publisher {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(publisher)
    }

    async fn create(&self, name: &str, email: &str) -> RepositoryResult<Publisher> {
        if name.trim().is_empty() {
            return Err(RepositoryError::ValidationError(
                "publisher name must not be empty".to_string(),
            ));
        }

        let publisher = Publisher {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            email: email.trim().to_string(),
        };

        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO publishers (id, name, email, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![publisher.id, publisher.name, publisher.email, Utc::now()],
        )?;
        Ok(publisher)
    }
}
