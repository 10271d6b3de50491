// ==========================================
// Link Marketplace - API Layer
// ==========================================
// Business facades called by the CLI (or any outer transport)
// ==========================================

pub mod error;
pub mod import_api;
pub mod pricing_api;

pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, ImportSaveResponse};
pub use pricing_api::PricingApi;
