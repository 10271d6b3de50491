// ==========================================
// Link Marketplace - Pricing Engine
// ==========================================
// Final price = override if present (including 0), else
// base + base * markup / 100.
// Input: site base price, client markup, optional (client, site) override
// No SQL here; data comes through the repository ports.
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::site::{PriceOverride, Site};
use crate::domain::types::SiteStatus;
use crate::importer::error::ImportError;
use crate::repository::{
    ClientRepository, PriceOverrideRepository, RepositoryError, SiteRepository,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument};

/// Resolves the price a client pays for a site.
///
/// An override wins unconditionally and ignores the markup.
pub fn resolve_price(base_price: f64, markup_percentage: f64, override_price: Option<f64>) -> f64 {
    match override_price {
        Some(price) => price,
        None => base_price + base_price * markup_percentage / 100.0,
    }
}

// ==========================================
// PricingError
// ==========================================
#[derive(Error, Debug)]
pub enum PricingError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Config(#[from] ImportError),
}

pub type PricingResult<T> = Result<T, PricingError>;

/// Price of one site as seen by one client (or by the default markup)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub site_id: String,
    pub url: String,
    pub base_price: i64,
    pub markup_percentage: f64,
    pub override_price: Option<f64>,
    pub final_price: f64,
}

impl PriceQuote {
    fn for_site(site: &Site, markup_percentage: f64, override_price: Option<f64>) -> Self {
        Self {
            site_id: site.id.clone(),
            url: site.url.clone(),
            base_price: site.base_price,
            markup_percentage,
            override_price,
            final_price: resolve_price(site.base_price as f64, markup_percentage, override_price),
        }
    }
}

// ==========================================
// PricingEngine
// ==========================================
pub struct PricingEngine {
    clients: Arc<dyn ClientRepository>,
    sites: Arc<dyn SiteRepository>,
    overrides: Arc<dyn PriceOverrideRepository>,
    config: Arc<dyn ImportConfigReader>,
}

impl PricingEngine {
    pub fn new(
        clients: Arc<dyn ClientRepository>,
        sites: Arc<dyn SiteRepository>,
        overrides: Arc<dyn PriceOverrideRepository>,
        config: Arc<dyn ImportConfigReader>,
    ) -> Self {
        Self {
            clients,
            sites,
            overrides,
            config,
        }
    }

    /// Markup that applies to the optional client.
    ///
    /// # Returns
    /// - None: configured default (`pricing/default_markup_percentage`)
    /// - Some(id): that client's markup, NotFound when unknown
    pub async fn markup_for(&self, client_id: Option<&str>) -> PricingResult<f64> {
        match client_id {
            None => Ok(self.config.get_default_markup_percentage().await?),
            Some(id) => {
                let client = self
                    .clients
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| PricingError::NotFound {
                        entity: "Client".to_string(),
                        id: id.to_string(),
                    })?;
                Ok(client.markup_percentage)
            }
        }
    }

    /// Creates or replaces the (client, site) override
    #[instrument(skip(self))]
    pub async fn set_override(
        &self,
        client_id: &str,
        site_id: &str,
        price: f64,
    ) -> PricingResult<PriceOverride> {
        if !price.is_finite() || price < 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "override price must be a non-negative number, got {}",
                price
            )));
        }
        if self.clients.find_by_id(client_id).await?.is_none() {
            return Err(PricingError::NotFound {
                entity: "Client".to_string(),
                id: client_id.to_string(),
            });
        }
        if self.sites.find_by_id(site_id).await?.is_none() {
            return Err(PricingError::NotFound {
                entity: "Site".to_string(),
                id: site_id.to_string(),
            });
        }

        let stored = self.overrides.upsert(client_id, site_id, price).await?;
        debug!(price = stored.price, "override stored");
        Ok(stored)
    }

    /// Deletes the override; returns whether one existed
    #[instrument(skip(self))]
    pub async fn remove_override(&self, client_id: &str, site_id: &str) -> PricingResult<bool> {
        Ok(self.overrides.delete(client_id, site_id).await?)
    }

    /// Overrides of one client; NotFound when the client is unknown
    pub async fn overrides_for(&self, client_id: &str) -> PricingResult<Vec<PriceOverride>> {
        if self.clients.find_by_id(client_id).await?.is_none() {
            return Err(PricingError::NotFound {
                entity: "Client".to_string(),
                id: client_id.to_string(),
            });
        }
        Ok(self.overrides.list_for_client(client_id).await?)
    }

    /// Final price of one site for the optional client
    pub async fn client_price(&self, client_id: Option<&str>, site_id: &str) -> PricingResult<PriceQuote> {
        let markup = self.markup_for(client_id).await?;
        let site = self
            .sites
            .find_by_id(site_id)
            .await?
            .ok_or_else(|| PricingError::NotFound {
                entity: "Site".to_string(),
                id: site_id.to_string(),
            })?;

        let override_price = match client_id {
            Some(id) => self.overrides.find(id, site_id).await?.map(|o| o.price),
            None => None,
        };

        Ok(PriceQuote::for_site(&site, markup, override_price))
    }

    /// ACTIVE sites ordered by URL, priced for the optional client
    #[instrument(skip(self))]
    pub async fn price_catalog(&self, client_id: Option<&str>) -> PricingResult<Vec<PriceQuote>> {
        let markup = self.markup_for(client_id).await?;
        let overrides: HashMap<String, f64> = match client_id {
            Some(id) => self
                .overrides
                .list_for_client(id)
                .await?
                .into_iter()
                .map(|o| (o.site_id, o.price))
                .collect(),
            None => HashMap::new(),
        };

        let sites = self.sites.list_by_status(SiteStatus::Active).await?;
        Ok(sites
            .iter()
            .map(|site| PriceQuote::for_site(site, markup, overrides.get(&site.id).copied()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{config_keys, ConfigManager};
    use crate::domain::site::NewSite;
    use crate::repository::{
        PublisherRepository, SqliteClientRepository, SqlitePriceOverrideRepository,
        SqlitePublisherRepository, SqliteSiteRepository,
    };
    use rusqlite::Connection;
    use std::sync::Mutex;

    #[test]
    fn test_resolve_price() {
        assert_eq!(resolve_price(100.0, 25.0, None), 125.0);
        assert_eq!(resolve_price(100.0, 25.0, Some(80.0)), 80.0);
        assert_eq!(resolve_price(100.0, 25.0, Some(0.0)), 0.0);
        assert_eq!(resolve_price(0.0, 25.0, None), 0.0);
        assert_eq!(resolve_price(200.0, 0.0, None), 200.0);
    }

    struct Fixture {
        engine: PricingEngine,
        clients: Arc<SqliteClientRepository>,
        sites: Arc<SqliteSiteRepository>,
        publishers: SqlitePublisherRepository,
        config: Arc<ConfigManager>,
    }

    fn fixture() -> Fixture {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));

        let clients = Arc::new(SqliteClientRepository::new(conn.clone()));
        let sites = Arc::new(SqliteSiteRepository::new(conn.clone()));
        let overrides = Arc::new(SqlitePriceOverrideRepository::new(conn.clone()));
        let config = Arc::new(ConfigManager::from_connection(conn.clone()).unwrap());
        let engine = PricingEngine::new(clients.clone(), sites.clone(), overrides, config.clone());

        Fixture {
            engine,
            clients,
            sites,
            publishers: SqlitePublisherRepository::new(conn),
            config,
        }
    }

    async fn add_site(f: &Fixture, url: &str, base_price: i64, status: SiteStatus) -> Site {
        let publisher = f.publishers.create("Acme Media", "deals@acme.test").await.unwrap();
        f.sites
            .create(&NewSite {
                url: url.to_string(),
                domain_authority: None,
                domain_rating: None,
                spam_score: None,
                traffic: None,
                category: None,
                turnaround_time: None,
                base_price,
                country: None,
                language: None,
                publisher_id: publisher.id,
                status,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_override_upsert_and_remove() {
        let f = fixture();
        let client = f.clients.create("Buyer", 30.0).await.unwrap();
        let site = add_site(&f, "https://a.example.com/", 100, SiteStatus::Active).await;

        f.engine.set_override(&client.id, &site.id, 90.0).await.unwrap();
        f.engine.set_override(&client.id, &site.id, 80.0).await.unwrap();
        let quote = f.engine.client_price(Some(&client.id), &site.id).await.unwrap();
        assert_eq!(quote.override_price, Some(80.0));
        assert_eq!(quote.final_price, 80.0);

        assert!(f.engine.remove_override(&client.id, &site.id).await.unwrap());
        assert!(!f.engine.remove_override(&client.id, &site.id).await.unwrap());

        let quote = f.engine.client_price(Some(&client.id), &site.id).await.unwrap();
        assert_eq!(quote.final_price, 130.0);
    }

    #[tokio::test]
    async fn test_set_override_rejects_bad_input() {
        let f = fixture();
        let client = f.clients.create("Buyer", 30.0).await.unwrap();
        let site = add_site(&f, "https://a.example.com/", 100, SiteStatus::Active).await;

        assert!(matches!(
            f.engine.set_override(&client.id, &site.id, -1.0).await,
            Err(PricingError::InvalidInput(_))
        ));
        assert!(matches!(
            f.engine.set_override(&client.id, &site.id, f64::NAN).await,
            Err(PricingError::InvalidInput(_))
        ));
        assert!(matches!(
            f.engine.set_override("ghost", &site.id, 10.0).await,
            Err(PricingError::NotFound { .. })
        ));
        assert!(matches!(
            f.engine.set_override(&client.id, "ghost", 10.0).await,
            Err(PricingError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_default_markup_and_catalog() {
        let f = fixture();
        add_site(&f, "https://b.example.com/", 200, SiteStatus::Active).await;
        add_site(&f, "https://a.example.com/", 100, SiteStatus::Active).await;
        add_site(&f, "https://c.example.com/", 300, SiteStatus::Inactive).await;

        let catalog = f.engine.price_catalog(None).await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].url, "https://a.example.com/");
        assert_eq!(catalog[0].final_price, 125.0);
        assert_eq!(catalog[1].final_price, 250.0);

        f.config
            .set_global_config_value(config_keys::DEFAULT_MARKUP_PERCENTAGE, "10")
            .unwrap();
        let catalog = f.engine.price_catalog(None).await.unwrap();
        assert_eq!(catalog[0].final_price, 110.0);

        assert!(matches!(
            f.engine.price_catalog(Some("ghost")).await,
            Err(PricingError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_catalog_applies_client_overrides() {
        let f = fixture();
        let client = f.clients.create("Buyer", 50.0).await.unwrap();
        let a = add_site(&f, "https://a.example.com/", 100, SiteStatus::Active).await;
        add_site(&f, "https://b.example.com/", 100, SiteStatus::Active).await;

        f.engine.set_override(&client.id, &a.id, 0.0).await.unwrap();
        let catalog = f.engine.price_catalog(Some(&client.id)).await.unwrap();
        assert_eq!(catalog[0].final_price, 0.0);
        assert_eq!(catalog[1].final_price, 150.0);
    }
}
