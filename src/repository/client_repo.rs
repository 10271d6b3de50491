// ==========================================
// Link Marketplace - Client Repository
// ==========================================
// Buyers and their markup percentage.
// ==========================================

use crate::domain::site::Client;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Client>>;

    async fn list_all(&self) -> RepositoryResult<Vec<Client>>;

    async fn create(&self, name: &str, markup_percentage: f64) -> RepositoryResult<Client>;

    async fn update_markup(&self, id: &str, markup_percentage: f64) -> RepositoryResult<()>;
}

pub struct SqliteClientRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteClientRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn check_markup(markup_percentage: f64) -> RepositoryResult<()> {
        if !markup_percentage.is_finite() || markup_percentage < 0.0 {
            return Err(RepositoryError::FieldValueError {
                field: "markup_percentage".to_string(),
                message: format!("must be a non-negative number, got {}", markup_percentage),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ClientRepository for SqliteClientRepository {
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Client>> {
        let conn = self.get_conn()?;
        let client = conn
            .query_row(
                "SELECT id, name, markup_percentage FROM clients WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Client {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        markup_percentage: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(client)
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Client>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT id, name, markup_percentage FROM clients ORDER BY name, id")?;
        let clients = stmt
            .query_map([], |row| {
                Ok(Client {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    markup_percentage: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(clients)
    }

    async fn create(&self, name: &str, markup_percentage: f64) -> RepositoryResult<Client> {
        Self::check_markup(markup_percentage)?;
        let client = Client {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            markup_percentage,
        };

        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO clients (id, name, markup_percentage, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![client.id, client.name, client.markup_percentage, Utc::now()],
        )?;
        Ok(client)
    }

    async fn update_markup(&self, id: &str, markup_percentage: f64) -> RepositoryResult<()> {
        Self::check_markup(markup_percentage)?;
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE clients SET markup_percentage = ?1 WHERE id = ?2",
            params![markup_percentage, id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Client".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
