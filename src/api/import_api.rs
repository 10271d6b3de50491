// ==========================================
// Link Marketplace - Site Import API
// ==========================================
// Facade over the import pipeline: parse, preview, save, template.
// Resolves the client markup through the pricing engine and writes
// the SITE_IMPORT audit entry.
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::site::{ParseSummary, PreviewResult, PreviewRow};
use crate::domain::types::TemplateVariant;
use crate::engine::PricingEngine;
use crate::importer::{decode_mapping_payload, SiteImporter};
use crate::repository::ActionLogRepository;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Save response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSaveResponse {
    /// rows persisted
    pub saved_count: usize,
    /// one message per rejected row, each starting with "Row <n>: "
    pub errors: Vec<String>,
    pub elapsed_ms: i64,
}

// ==========================================
// ImportApi
// ==========================================
pub struct ImportApi {
    importer: Arc<dyn SiteImporter>,
    pricing: Arc<PricingEngine>,
    action_log_repo: Arc<ActionLogRepository>,
}

impl ImportApi {
    pub fn new(
        importer: Arc<dyn SiteImporter>,
        pricing: Arc<PricingEngine>,
        action_log_repo: Arc<ActionLogRepository>,
    ) -> Self {
        Self {
            importer,
            pricing,
            action_log_repo,
        }
    }

    /// Parses an upload and proposes a column mapping
    ///
    /// # Arguments
    /// - file_name: extension selects the parser
    /// - client_id: None uses the default markup
    ///
    /// # Returns
    /// - Err(NotFound): unknown client
    /// - Err(UnsupportedFormat / EmptyDataset / ImportError)
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn parse(
        &self,
        file_name: &str,
        bytes: &[u8],
        client_id: Option<&str>,
    ) -> ApiResult<ParseSummary> {
        let markup = self.pricing.markup_for(client_id).await?;
        Ok(self.importer.parse_upload(file_name, bytes, markup).await?)
    }

    /// Validates the leading rows under an operator-confirmed mapping
    ///
    /// # Arguments
    /// - mapping_json: JSON array of `{"source_header", "canonical_field"}`
    ///
    /// # Returns
    /// - Err(MalformedMapping): payload is not valid JSON or does not fit the file
    #[instrument(skip(self, bytes, mapping_json), fields(size = bytes.len()))]
    pub async fn preview(
        &self,
        file_name: &str,
        bytes: &[u8],
        mapping_json: &str,
        client_id: Option<&str>,
    ) -> ApiResult<PreviewResult> {
        let mapping = decode_mapping_payload(mapping_json)?;
        let markup = self.pricing.markup_for(client_id).await?;
        Ok(self
            .importer
            .preview_upload(file_name, bytes, &mapping, markup)
            .await?)
    }

    /// Persists the selected preview rows; per-row failures are reported, not raised
    #[instrument(skip(self, rows, selected), fields(rows = rows.len(), selected = selected.len()))]
    pub async fn save(
        &self,
        rows: &[PreviewRow],
        selected: &[usize],
        actor: &str,
    ) -> ApiResult<ImportSaveResponse> {
        let started = Instant::now();
        let result = self.importer.commit_rows(rows, selected).await?;
        let elapsed_ms = started.elapsed().as_millis() as i64;

        info!(
            saved = result.saved_count,
            rejected = result.errors.len(),
            elapsed_ms,
            "site import committed"
        );

        let log = ActionLog::new(ActionType::SiteImport, actor)
            .with_payload(serde_json::json!({
                "selected_rows": selected,
                "saved_count": result.saved_count,
                "errors": result.errors,
            }))
            .with_detail(format!(
                "{} site(s) saved, {} row(s) rejected",
                result.saved_count,
                result.errors.len()
            ));
        if let Err(e) = self.action_log_repo.insert(&log) {
            warn!(error = %e, "failed to write SITE_IMPORT audit entry");
        }

        Ok(ImportSaveResponse {
            saved_count: result.saved_count,
            errors: result.errors,
            elapsed_ms,
        })
    }

    /// Template CSV; None uses the configured variant
    pub async fn template(&self, variant: Option<TemplateVariant>) -> ApiResult<String> {
        Ok(self.importer.template(variant).await?)
    }
}
