// ==========================================
// Link Marketplace - Site Domain Model
// ==========================================
// Persisted entities (Site / Publisher / Client / PriceOverride)
// and the ephemeral rows that flow through the import pipeline.
// ==========================================

use crate::domain::types::{CanonicalField, Category, SiteStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// Site - a link-placement site listing
// ==========================================
// Invariant: url is normalized and unique (sites.url UNIQUE)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub url: String,
    pub domain_authority: Option<f64>,
    pub domain_rating: Option<f64>,
    pub spam_score: Option<f64>,
    pub traffic: Option<i64>,
    pub category: Option<Category>,
    pub turnaround_time: Option<String>,
    pub base_price: i64,
    pub country: Option<String>,
    pub language: Option<String>,
    pub publisher_id: String,
    pub status: SiteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated, typed payload for creating a Site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSite {
    pub url: String,
    pub domain_authority: Option<f64>,
    pub domain_rating: Option<f64>,
    pub spam_score: Option<f64>,
    pub traffic: Option<i64>,
    pub category: Option<Category>,
    pub turnaround_time: Option<String>,
    pub base_price: i64,
    pub country: Option<String>,
    pub language: Option<String>,
    pub publisher_id: String,
    pub status: SiteStatus,
}

// ==========================================
// Publisher / Client / PriceOverride
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl Publisher {
    /// Case-insensitive match on display name OR email (full Unicode folding)
    pub fn matches(&self, identifier: &str) -> bool {
        let wanted = identifier.trim().to_lowercase();
        !wanted.is_empty()
            && (self.name.trim().to_lowercase() == wanted
                || self.email.trim().to_lowercase() == wanted)
    }
}

/// Resolves a human-entered publisher name or email against the roster.
pub fn resolve_publisher<'a>(roster: &'a [Publisher], identifier: &str) -> Option<&'a Publisher> {
    roster.iter().find(|p| p.matches(identifier))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub markup_percentage: f64,
}

/// Fixed per-client-per-site price; at most one per (client_id, site_id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceOverride {
    pub client_id: String,
    pub site_id: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// Import pipeline intermediates
// ==========================================

/// Decoded upload: headers in file order plus header-keyed rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedSheet {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

impl ParsedSheet {
    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }
}

/// sourceHeader -> canonicalField
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub source_header: String,
    pub canonical_field: CanonicalField,
}

/// One upload row projected onto canonical fields.
///
/// Values stay textual until validation; empty string means absent.
/// The validator overwrites `url` and `base_price` with their normalized forms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteRow {
    pub row_index: usize,
    pub url: String,
    pub domain_authority: String,
    pub domain_rating: String,
    pub spam_score: String,
    pub traffic: String,
    pub category: String,
    pub turnaround_time: String,
    pub base_price: String,
    pub country: String,
    pub language: String,
    pub publisher: String,
    pub status: String,
}

impl SiteRow {
    pub fn new(row_index: usize) -> Self {
        Self {
            row_index,
            ..Default::default()
        }
    }

    pub fn set(&mut self, field: CanonicalField, value: String) {
        let slot = match field {
            CanonicalField::Url => &mut self.url,
            CanonicalField::DomainAuthority => &mut self.domain_authority,
            CanonicalField::DomainRating => &mut self.domain_rating,
            CanonicalField::SpamScore => &mut self.spam_score,
            CanonicalField::Traffic => &mut self.traffic,
            CanonicalField::Category => &mut self.category,
            CanonicalField::TurnaroundTime => &mut self.turnaround_time,
            CanonicalField::BasePrice => &mut self.base_price,
            CanonicalField::Country => &mut self.country,
            CanonicalField::Language => &mut self.language,
            CanonicalField::Publisher => &mut self.publisher,
            CanonicalField::Status => &mut self.status,
        };
        *slot = value;
    }
}

/// Row-level validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub row_index: usize,
    pub field: CanonicalField,
    pub value: String,
    pub message: String,
}

/// Validator output for one row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedRow {
    pub row: SiteRow,
    pub errors: Vec<ValidationError>,
    /// Present iff `errors` is empty
    #[serde(skip)]
    pub site: Option<NewSite>,
}

impl ValidatedRow {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

// ==========================================
// Preview / commit results
// ==========================================

/// Annotated preview row returned to the operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewRow {
    #[serde(flatten)]
    pub row: SiteRow,
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub display_price: Option<f64>,
}

/// Result of the parse step: detected columns and the auto-mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseSummary {
    pub columns: Vec<String>,
    pub mapping: Vec<ColumnMapping>,
    pub total_rows: usize,
    pub markup_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewResult {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    pub preview: Vec<PreviewRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitResult {
    pub saved_count: usize,
    pub errors: Vec<String>,
}
