// ==========================================
// Link Marketplace - Site Importer Implementation
// ==========================================
// Pipeline: parse -> map -> validate (bounded preview) -> commit
// Settings are read per call, so operator changes apply immediately.
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::site::{
    ColumnMapping, CommitResult, ParseSummary, ParsedSheet, PreviewResult, PreviewRow,
};
use crate::domain::types::TemplateVariant;
use crate::importer::bulk_committer::BulkCommitter;
use crate::importer::column_mapper::{check_mapping, detect_column_mapping};
use crate::importer::error::ImportResult;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::preview::PreviewGenerator;
use crate::importer::row_validator::RowValidator;
use crate::importer::site_importer_trait::SiteImporter;
use crate::importer::template::generate_template;
use crate::repository::{PublisherRepository, SiteRepository};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument};

// ==========================================
// SiteImporterImpl
// ==========================================
pub struct SiteImporterImpl {
    // data access
    sites: Arc<dyn SiteRepository>,
    publishers: Arc<dyn PublisherRepository>,

    // settings
    config: Arc<dyn ImportConfigReader>,
}

impl SiteImporterImpl {
    pub fn new(
        sites: Arc<dyn SiteRepository>,
        publishers: Arc<dyn PublisherRepository>,
        config: Arc<dyn ImportConfigReader>,
    ) -> Self {
        Self {
            sites,
            publishers,
            config,
        }
    }

    async fn parse_sheet(&self, file_name: &str, bytes: &[u8]) -> ImportResult<ParsedSheet> {
        let dialect = self.config.get_csv_dialect().await?;
        UniversalFileParser::new(dialect).parse(file_name, bytes)
    }

    async fn validator(&self) -> ImportResult<RowValidator> {
        Ok(RowValidator::new(self.config.get_upload_contract().await?))
    }
}

#[async_trait]
impl SiteImporter for SiteImporterImpl {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn parse_upload(
        &self,
        file_name: &str,
        bytes: &[u8],
        markup_percentage: f64,
    ) -> ImportResult<ParseSummary> {
        let sheet = self.parse_sheet(file_name, bytes).await?;
        let mapping = detect_column_mapping(&sheet.headers);

        info!(
            total_rows = sheet.total_rows(),
            columns = sheet.headers.len(),
            mapped = mapping.len(),
            "upload parsed"
        );

        Ok(ParseSummary {
            total_rows: sheet.total_rows(),
            columns: sheet.headers,
            mapping,
            markup_percentage,
        })
    }

    #[instrument(skip(self, bytes, mapping), fields(size = bytes.len()))]
    async fn preview_upload(
        &self,
        file_name: &str,
        bytes: &[u8],
        mapping: &[ColumnMapping],
        markup_percentage: f64,
    ) -> ImportResult<PreviewResult> {
        let sheet = self.parse_sheet(file_name, bytes).await?;
        check_mapping(mapping, &sheet.headers)?;

        let row_limit = self.config.get_preview_row_limit().await?;
        let roster = self.publishers.list_all().await?;
        let generator = PreviewGenerator::new(self.validator().await?, row_limit);

        let result = generator.generate(&sheet, mapping, &roster, markup_percentage);
        info!(
            total_rows = result.total_rows,
            valid_rows = result.valid_rows,
            invalid_rows = result.invalid_rows,
            "preview ready"
        );
        Ok(result)
    }

    #[instrument(skip(self, rows, selected), fields(rows = rows.len(), selected = selected.len()))]
    async fn commit_rows(&self, rows: &[PreviewRow], selected: &[usize]) -> ImportResult<CommitResult> {
        let roster = self.publishers.list_all().await?;
        let row_limit = self.config.get_preview_row_limit().await?;
        let committer = BulkCommitter::new(self.validator().await?, self.sites.clone(), row_limit);
        Ok(committer.commit(rows, selected, &roster).await)
    }

    async fn template(&self, variant: Option<TemplateVariant>) -> ImportResult<String> {
        let variant = match variant {
            Some(v) => v,
            None => self.config.get_template_variant().await?,
        };
        generate_template(variant)
    }
}
