// ==========================================
// Link Marketplace - Config Layer
// ==========================================
// Runtime settings with documented defaults.
// Storage: config_kv table
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::ImportConfigReader;
