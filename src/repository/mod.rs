// ==========================================
// Link Marketplace - Repository Layer
// ==========================================
// Data access behind async ports; the SQLite adapters share one
// Arc<Mutex<Connection>> and never hold the lock across an await.
// All queries are parameterized.
// ==========================================

pub mod action_log_repo;
pub mod client_repo;
pub mod error;
pub mod price_override_repo;
pub mod publisher_repo;
pub mod site_repo;

pub use action_log_repo::ActionLogRepository;
pub use client_repo::{ClientRepository, SqliteClientRepository};
pub use error::{RepositoryError, RepositoryResult};
pub use price_override_repo::{PriceOverrideRepository, SqlitePriceOverrideRepository};
pub use publisher_repo::{PublisherRepository, SqlitePublisherRepository};
pub use site_repo::{SiteRepository, SqliteSiteRepository};
