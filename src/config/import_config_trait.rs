// ==========================================
// Link Marketplace - Import Config Reader Trait
// ==========================================
// Settings the import pipeline and pricing engine read.
// Read-only: no writes, no business logic.
// ==========================================

use crate::domain::types::{CsvDialect, TemplateVariant, UploadContract};
use crate::importer::error::ImportResult;
use async_trait::async_trait;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// Implementor: ConfigManager (config_kv table)
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// Number of leading rows validated and returned by preview
    ///
    /// # Default
    /// - 20
    async fn get_preview_row_limit(&self) -> ImportResult<usize>;

    /// Required-field set applied by the row validator
    ///
    /// # Default
    /// - UploadContract::Current
    async fn get_upload_contract(&self) -> ImportResult<UploadContract>;

    /// Delimited-text parsing dialect
    ///
    /// # Default
    /// - CsvDialect::Standard
    async fn get_csv_dialect(&self) -> ImportResult<CsvDialect>;

    /// Header order of the downloadable template
    ///
    /// # Default
    /// - TemplateVariant::Current
    async fn get_template_variant(&self) -> ImportResult<TemplateVariant>;

    /// Markup applied when no client is given
    ///
    /// # Default
    /// - 25.0
    async fn get_default_markup_percentage(&self) -> ImportResult<f64>;
}
