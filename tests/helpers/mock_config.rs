// ==========================================
// Mock import settings for integration tests
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use link_marketplace::config::ImportConfigReader;
use link_marketplace::domain::{CsvDialect, TemplateVariant, UploadContract};
use link_marketplace::importer::ImportResult;

/// In-memory settings, defaults match ConfigManager's
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub preview_row_limit: usize,
    pub upload_contract: UploadContract,
    pub csv_dialect: CsvDialect,
    pub template_variant: TemplateVariant,
    pub default_markup_percentage: f64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            preview_row_limit: 20,
            upload_contract: UploadContract::Current,
            csv_dialect: CsvDialect::Standard,
            template_variant: TemplateVariant::Current,
            default_markup_percentage: 25.0,
        }
    }
}

impl MockConfig {
    /// Older uploads: legacy contract, naive CSV split, legacy template
    pub fn legacy() -> Self {
        Self {
            upload_contract: UploadContract::Legacy,
            csv_dialect: CsvDialect::Legacy,
            template_variant: TemplateVariant::Legacy,
            ..Self::default()
        }
    }

    pub fn with_row_limit(limit: usize) -> Self {
        Self {
            preview_row_limit: limit,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ImportConfigReader for MockConfig {
    async fn get_preview_row_limit(&self) -> ImportResult<usize> {
        Ok(self.preview_row_limit)
    }

    async fn get_upload_contract(&self) -> ImportResult<UploadContract> {
        Ok(self.upload_contract)
    }

    async fn get_csv_dialect(&self) -> ImportResult<CsvDialect> {
        Ok(self.csv_dialect)
    }

    async fn get_template_variant(&self) -> ImportResult<TemplateVariant> {
        Ok(self.template_variant)
    }

    async fn get_default_markup_percentage(&self) -> ImportResult<f64> {
        Ok(self.default_markup_percentage)
    }
}
