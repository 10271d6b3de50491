// ==========================================
// Link Marketplace - Core Library
// ==========================================
// Bulk site ingestion (parse -> map -> validate -> preview -> commit)
// and client pricing (markup / per-client overrides).
// Stack: Rust + SQLite
// ==========================================

// ==========================================
// Modules
// ==========================================

// domain layer - entities and types
pub mod domain;

// repository layer - data access
pub mod repository;

// engine layer - pricing rules
pub mod engine;

// import layer - uploads
pub mod importer;

// config layer - runtime settings
pub mod config;

// database bootstrap (connection PRAGMAs, schema)
pub mod db;

// logging
pub mod logging;

// API layer - business facades
pub mod api;

// application layer - wiring
pub mod app;

// ==========================================
// Re-exports
// ==========================================

pub use domain::types::{CanonicalField, Category, CsvDialect, SiteStatus, TemplateVariant, UploadContract};

pub use domain::{
    ActionLog, ActionType, Client, ColumnMapping, CommitResult, ParseSummary, PreviewResult, PreviewRow,
    PriceOverride, Publisher, Site,
};

pub use engine::{resolve_price, PriceQuote, PricingEngine};

pub use importer::{auto_round, normalize_url, SiteImporter, SiteImporterImpl};

pub use api::{ApiError, ApiResult, ImportApi, PricingApi};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Link Marketplace";
