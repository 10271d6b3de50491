// ==========================================
// Link Marketplace - Row Validator
// ==========================================
// Validates one projected row against the upload contract and the
// publisher roster; normalizes URL and price in place.
// Errors are accumulated per field (at most one each), never raised.
// ==========================================

use crate::domain::site::{resolve_publisher, NewSite, Publisher, SiteRow, ValidatedRow, ValidationError};
use crate::domain::types::{CanonicalField, Category, SiteStatus, UploadContract};
use crate::importer::data_cleaner::{auto_round, normalize_null, normalize_url, parse_number, parse_price};

/// Inclusive range for DA / DR / spam score
const METRIC_MIN: f64 = 0.0;
const METRIC_MAX: f64 = 100.0;

pub struct RowValidator {
    contract: UploadContract,
}

/// Per-row error collector
struct ErrorSink {
    row_index: usize,
    errors: Vec<ValidationError>,
}

impl ErrorSink {
    fn push(&mut self, field: CanonicalField, value: &str, message: impl Into<String>) {
        self.errors.push(ValidationError {
            row_index: self.row_index,
            field,
            value: value.to_string(),
            message: message.into(),
        });
    }
}

impl RowValidator {
    pub fn new(contract: UploadContract) -> Self {
        Self { contract }
    }

    /// Validates and normalizes a row.
    ///
    /// # Arguments
    /// - row: canonical-field projection (row_index already set)
    /// - roster: current publishers
    ///
    /// # Returns
    /// ValidatedRow whose `site` is Some iff no error was found
    pub fn validate(&self, mut row: SiteRow, roster: &[Publisher]) -> ValidatedRow {
        let mut sink = ErrorSink {
            row_index: row.row_index,
            errors: Vec::new(),
        };

        // ===== url =====
        let url = self.check_url(&row.url, &mut sink);
        if let Some(normalized) = &url {
            row.url = normalized.clone();
        }

        // ===== base_price =====
        let base_price = self.check_price(&row.base_price, &mut sink);
        if let Some(price) = base_price {
            row.base_price = price.to_string();
        }

        // ===== required text fields =====
        let language = self.check_text(CanonicalField::Language, "Language", &row.language, &mut sink);
        let category = self.check_category(&row.category, &mut sink);
        let country = self.check_text(CanonicalField::Country, "Country", &row.country, &mut sink);
        let turnaround_time = self.check_text(
            CanonicalField::TurnaroundTime,
            "Turnaround time",
            &row.turnaround_time,
            &mut sink,
        );

        // ===== metrics =====
        let domain_authority =
            Self::check_metric(CanonicalField::DomainAuthority, "DA", &row.domain_authority, &mut sink);
        let domain_rating =
            Self::check_metric(CanonicalField::DomainRating, "DR", &row.domain_rating, &mut sink);
        let spam_score =
            Self::check_metric(CanonicalField::SpamScore, "Spam score", &row.spam_score, &mut sink);
        let traffic = Self::check_traffic(&row.traffic, &mut sink);

        // ===== status =====
        let status = Self::check_status(&row.status, &mut sink);

        // ===== publisher =====
        let publisher_id = self.check_publisher(&row.publisher, roster, &mut sink);

        let site = if sink.errors.is_empty() {
            match (url, base_price, publisher_id) {
                (Some(url), Some(base_price), Some(publisher_id)) => Some(NewSite {
                    url,
                    domain_authority,
                    domain_rating,
                    spam_score,
                    traffic,
                    category,
                    turnaround_time,
                    base_price,
                    country,
                    language,
                    publisher_id,
                    status: status.unwrap_or_default(),
                }),
                _ => None,
            }
        } else {
            None
        };

        ValidatedRow {
            row,
            errors: sink.errors,
            site,
        }
    }

    fn check_url(&self, raw: &str, sink: &mut ErrorSink) -> Option<String> {
        if raw.trim().is_empty() {
            sink.push(CanonicalField::Url, raw, "URL is required");
            return None;
        }
        match normalize_url(raw) {
            Ok(url) => Some(url),
            Err(e) => {
                sink.push(CanonicalField::Url, raw, e.to_string());
                None
            }
        }
    }

    fn check_price(&self, raw: &str, sink: &mut ErrorSink) -> Option<i64> {
        if raw.trim().is_empty() {
            sink.push(CanonicalField::BasePrice, raw, "Base price is required");
            return None;
        }
        match parse_price(raw) {
            Some(value) if value < 0.0 => {
                sink.push(CanonicalField::BasePrice, raw, "Base price must not be negative");
                None
            }
            Some(value) => Some(auto_round(value)),
            None => {
                sink.push(CanonicalField::BasePrice, raw, "Base price must be a number");
                None
            }
        }
    }

    /// Free-text field; required or optional depending on the contract
    fn check_text(
        &self,
        field: CanonicalField,
        label: &str,
        raw: &str,
        sink: &mut ErrorSink,
    ) -> Option<String> {
        let value = normalize_null(raw);
        if value.is_none() && self.contract.is_required(field) {
            sink.push(field, raw, format!("{} is required", label));
        }
        value
    }

    /// Optional under the legacy contract, but a present value must be known
    fn check_category(&self, raw: &str, sink: &mut ErrorSink) -> Option<Category> {
        let value = match normalize_null(raw) {
            Some(value) => value,
            None => {
                if self.contract.is_required(CanonicalField::Category) {
                    sink.push(CanonicalField::Category, raw, "Category is required");
                }
                return None;
            }
        };

        let category = Category::parse_lenient(&value);
        if category.is_none() {
            sink.push(
                CanonicalField::Category,
                raw,
                format!("Unknown category: {}", value),
            );
        }
        category
    }

    fn check_metric(field: CanonicalField, label: &str, raw: &str, sink: &mut ErrorSink) -> Option<f64> {
        normalize_null(raw)?;
        match parse_number(raw) {
            Some(v) if (METRIC_MIN..=METRIC_MAX).contains(&v) => Some(v),
            Some(_) => {
                sink.push(field, raw, format!("{} must be between 0 and 100", label));
                None
            }
            None => {
                sink.push(field, raw, format!("{} must be a number", label));
                None
            }
        }
    }

    fn check_traffic(raw: &str, sink: &mut ErrorSink) -> Option<i64> {
        normalize_null(raw)?;
        match parse_number(raw) {
            Some(v) if v >= 0.0 => Some(v.round() as i64),
            Some(_) => {
                sink.push(CanonicalField::Traffic, raw, "Traffic must not be negative");
                None
            }
            None => {
                sink.push(CanonicalField::Traffic, raw, "Traffic must be a number");
                None
            }
        }
    }

    fn check_status(raw: &str, sink: &mut ErrorSink) -> Option<SiteStatus> {
        let value = normalize_null(raw)?;
        match value.parse::<SiteStatus>() {
            Ok(status) => Some(status),
            Err(_) => {
                sink.push(
                    CanonicalField::Status,
                    raw,
                    "Status must be ACTIVE or INACTIVE",
                );
                None
            }
        }
    }

    fn check_publisher(&self, raw: &str, roster: &[Publisher], sink: &mut ErrorSink) -> Option<String> {
        let identifier = match normalize_null(raw) {
            Some(value) => value,
            None => {
                if self.contract.is_required(CanonicalField::Publisher) {
                    sink.push(CanonicalField::Publisher, raw, "Publisher is required");
                }
                return None;
            }
        };

        match resolve_publisher(roster, &identifier) {
            Some(publisher) => Some(publisher.id.clone()),
            None => {
                sink.push(
                    CanonicalField::Publisher,
                    raw,
                    format!("Publisher not found: {}", identifier),
                );
                None
            }
        }
    }
}

impl Default for RowValidator {
    fn default() -> Self {
        Self::new(UploadContract::default())
    }
}
