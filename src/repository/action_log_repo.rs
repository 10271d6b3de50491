// ==========================================
// Link Marketplace - Action Log Repository
// ==========================================
// Table: action_log (override changes, bulk imports)
// ==========================================

mod core;
mod queries;


pub use core::ActionLogRepository;
