// ==========================================
// Link Marketplace - Pricing API
// ==========================================
// Override administration (with audit trail) and client price queries
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::site::PriceOverride;
use crate::engine::{PriceQuote, PricingEngine};
use crate::repository::ActionLogRepository;
use std::sync::Arc;
use tracing::{info, instrument, warn};

// ==========================================
// PricingApi
// ==========================================
pub struct PricingApi {
    engine: Arc<PricingEngine>,
    action_log_repo: Arc<ActionLogRepository>,
}

impl PricingApi {
    pub fn new(engine: Arc<PricingEngine>, action_log_repo: Arc<ActionLogRepository>) -> Self {
        Self {
            engine,
            action_log_repo,
        }
    }

    /// Creates or replaces a client's fixed price for a site
    ///
    /// # Returns
    /// - Err(InvalidInput): empty id, negative or non-finite price
    /// - Err(NotFound): unknown client or site
    #[instrument(skip(self))]
    pub async fn set_override(
        &self,
        client_id: &str,
        site_id: &str,
        price: f64,
        actor: &str,
    ) -> ApiResult<PriceOverride> {
        require_id("client_id", client_id)?;
        require_id("site_id", site_id)?;

        let stored = self.engine.set_override(client_id, site_id, price).await?;
        info!(client_id, site_id, price, "price override set");

        self.record(
            ActionLog::new(ActionType::OverrideSet, actor).with_payload(serde_json::json!({
                "client_id": client_id,
                "site_id": site_id,
                "price": price,
            })),
        );
        Ok(stored)
    }

    /// Deletes an override; absent pairs are a no-op
    ///
    /// # Returns
    /// - Ok(true) when an override existed
    #[instrument(skip(self))]
    pub async fn remove_override(&self, client_id: &str, site_id: &str, actor: &str) -> ApiResult<bool> {
        require_id("client_id", client_id)?;
        require_id("site_id", site_id)?;

        let removed = self.engine.remove_override(client_id, site_id).await?;
        info!(client_id, site_id, removed, "price override removed");

        self.record(
            ActionLog::new(ActionType::OverrideRemove, actor)
                .with_payload(serde_json::json!({
                    "client_id": client_id,
                    "site_id": site_id,
                    "existed": removed,
                })),
        );
        Ok(removed)
    }

    pub async fn list_overrides(&self, client_id: &str) -> ApiResult<Vec<PriceOverride>> {
        require_id("client_id", client_id)?;
        Ok(self.engine.overrides_for(client_id).await?)
    }

    /// Price of one site for the optional client
    pub async fn client_price(&self, client_id: Option<&str>, site_id: &str) -> ApiResult<PriceQuote> {
        require_id("site_id", site_id)?;
        Ok(self.engine.client_price(client_id, site_id).await?)
    }

    /// ACTIVE sites ordered by URL, priced for the optional client
    pub async fn catalog(&self, client_id: Option<&str>) -> ApiResult<Vec<PriceQuote>> {
        Ok(self.engine.price_catalog(client_id).await?)
    }

    fn record(&self, log: ActionLog) {
        if let Err(e) = self.action_log_repo.insert(&log) {
            warn!(error = %e, action_type = %log.action_type, "failed to write audit entry");
        }
    }
}

fn require_id(name: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidInput(format!("{} must not be empty", name)));
    }
    Ok(())
}
