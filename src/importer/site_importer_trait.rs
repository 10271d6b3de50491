// ==========================================
// Link Marketplace - Site Importer Traits
// ==========================================
// Interfaces only, no implementation.
// ==========================================

use crate::domain::site::{
    ColumnMapping, CommitResult, ParseSummary, ParsedSheet, PreviewResult, PreviewRow,
};
use crate::domain::types::TemplateVariant;
use crate::importer::error::ImportResult;
use async_trait::async_trait;

// ==========================================
// SiteImporter Trait
// ==========================================
// Implementor: SiteImporterImpl
#[async_trait]
pub trait SiteImporter: Send + Sync {
    /// Parses an upload and proposes a column mapping.
    ///
    /// # Arguments
    /// - file_name: used for type detection
    /// - bytes: file content
    /// - markup_percentage: echoed back for the caller's price projection
    ///
    /// # Returns
    /// - Err(UnsupportedFormat / EmptyDataset / parse errors)
    async fn parse_upload(
        &self,
        file_name: &str,
        bytes: &[u8],
        markup_percentage: f64,
    ) -> ImportResult<ParseSummary>;

    /// Validates the leading rows under an explicit mapping.
    ///
    /// # Returns
    /// - Err(MalformedMapping) when the mapping does not fit the file
    async fn preview_upload(
        &self,
        file_name: &str,
        bytes: &[u8],
        mapping: &[ColumnMapping],
        markup_percentage: f64,
    ) -> ImportResult<PreviewResult>;

    /// Persists the selected preview rows (sequential, partial success)
    async fn commit_rows(&self, rows: &[PreviewRow], selected: &[usize]) -> ImportResult<CommitResult>;

    /// Template CSV; None uses the configured variant
    async fn template(&self, variant: Option<TemplateVariant>) -> ImportResult<String>;
}

// ==========================================
// FileParser Trait
// ==========================================
// Implementors: CsvParser, LegacyCsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// Decodes file content into headers (file order) and header-keyed rows
    ///
    /// # Returns
    /// - Err(EmptyDataset): no header row or no data row
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<ParsedSheet>;
}
