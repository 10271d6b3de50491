// ==========================================
// Link Marketplace - Application Layer
// ==========================================
// Wiring only; transports (CLI) sit on top of AppState.
// ==========================================

pub mod state;

pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
