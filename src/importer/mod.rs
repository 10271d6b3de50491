// ==========================================
// Link Marketplace - Import Layer
// ==========================================
// Bulk site ingestion from CSV / spreadsheet uploads:
// parse -> map columns -> validate -> bounded preview -> commit
// ==========================================

pub mod bulk_committer;
pub mod column_mapper;
pub mod data_cleaner;
pub mod error;
pub mod file_parser;
pub mod preview;
pub mod row_validator;
pub mod site_importer_impl;
pub mod site_importer_trait;
pub mod template;

pub use bulk_committer::BulkCommitter;
pub use column_mapper::{decode_mapping_payload, detect_column_mapping, parse_mapping_payload};
pub use data_cleaner::{auto_round, normalize_url};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, LegacyCsvParser, UniversalFileParser};
pub use preview::PreviewGenerator;
pub use row_validator::RowValidator;
pub use site_importer_impl::SiteImporterImpl;
pub use site_importer_trait::{FileParser, SiteImporter};
pub use template::generate_template;
