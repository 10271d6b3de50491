// ==========================================
// Link Marketplace - Action Log Domain Model
// ==========================================
// Audit trail for admin actions (override changes, bulk imports).
// Aligned with the action_log table.
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ==========================================
// ActionLog - audit entry
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,
    pub action_type: String,
    pub action_ts: NaiveDateTime,
    pub actor: String,
    pub payload_json: Option<JsonValue>,
    pub detail: Option<String>,
}

// ==========================================
// ActionType
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    SiteImport,     // bulk commit of previewed rows
    OverrideSet,    // client price override upsert
    OverrideRemove, // client price override delete
}

impl ActionType {
    /// Database form
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::SiteImport => "SITE_IMPORT",
            ActionType::OverrideSet => "OVERRIDE_SET",
            ActionType::OverrideRemove => "OVERRIDE_REMOVE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SITE_IMPORT" => Some(ActionType::SiteImport),
            "OVERRIDE_SET" => Some(ActionType::OverrideSet),
            "OVERRIDE_REMOVE" => Some(ActionType::OverrideRemove),
            _ => None,
        }
    }
}

impl ActionLog {
    /// Creates an entry stamped with the current time and a fresh id
    pub fn new(action_type: ActionType, actor: &str) -> Self {
        Self {
            action_id: uuid::Uuid::new_v4().to_string(),
            action_type: action_type.as_str().to_string(),
            action_ts: chrono::Utc::now().naive_utc(),
            actor: actor.to_string(),
            payload_json: None,
            detail: None,
        }
    }

    pub fn with_payload(mut self, payload: JsonValue) -> Self {
        self.payload_json = Some(payload);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
