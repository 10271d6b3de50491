// ==========================================
// Link Marketplace - Engine Layer
// ==========================================
// Business rules; no SQL.
// ==========================================

pub mod pricing;

pub use pricing::{resolve_price, PriceQuote, PricingEngine, PricingError, PricingResult};
