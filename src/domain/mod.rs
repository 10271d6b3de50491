// ==========================================
// Link Marketplace - Domain Layer
// ==========================================
// Entities, closed enumerations and pipeline DTOs.
// No data access, no pipeline logic.
// ==========================================

pub mod action_log;
pub mod site;
pub mod types;

pub use action_log::{ActionLog, ActionType};
pub use site::{
    resolve_publisher, Client, ColumnMapping, CommitResult, NewSite, ParseSummary, ParsedSheet, PreviewResult,
    PreviewRow, PriceOverride, Publisher, Site, SiteRow, ValidatedRow, ValidationError,
};
pub use types::{
    CanonicalField, Category, CsvDialect, SiteStatus, TemplateVariant, UploadContract,
    CATEGORY_TABLE,
};
