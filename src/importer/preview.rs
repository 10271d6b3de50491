// ==========================================
// Link Marketplace - Preview Generator
// ==========================================
// Validates only the first `row_limit` rows and annotates each with
// its errors and a projected display price.
// Rows beyond the limit are counted but never validated.
// ==========================================

use crate::domain::site::{ColumnMapping, ParsedSheet, PreviewResult, PreviewRow, Publisher};
use crate::domain::types::CanonicalField;
use crate::engine::pricing::resolve_price;
use crate::importer::column_mapper::project_row;
use crate::importer::data_cleaner::parse_number;
use crate::importer::row_validator::RowValidator;
use tracing::{debug, instrument};

pub const DEFAULT_PREVIEW_ROW_LIMIT: usize = 20;

pub struct PreviewGenerator {
    validator: RowValidator,
    row_limit: usize,
}

impl PreviewGenerator {
    pub fn new(validator: RowValidator, row_limit: usize) -> Self {
        Self {
            validator,
            row_limit,
        }
    }

    /// Builds the bounded preview.
    ///
    /// # Arguments
    /// - sheet: parsed upload
    /// - mappings: validated column mapping
    /// - roster: publishers to resolve against
    /// - markup_percentage: applied to each normalized base price
    #[instrument(skip_all, fields(total_rows = sheet.total_rows(), row_limit = self.row_limit))]
    pub fn generate(
        &self,
        sheet: &ParsedSheet,
        mappings: &[ColumnMapping],
        roster: &[Publisher],
        markup_percentage: f64,
    ) -> PreviewResult {
        let mut preview = Vec::new();
        let mut valid_rows = 0;
        let mut invalid_rows = 0;

        for (idx, raw) in sheet.rows.iter().take(self.row_limit).enumerate() {
            let projected = project_row(raw, mappings, idx + 1);
            let validated = self.validator.validate(projected, roster);

            let price_ok = !validated
                .errors
                .iter()
                .any(|e| e.field == CanonicalField::BasePrice);
            let display_price = if price_ok {
                parse_number(&validated.row.base_price)
                    .map(|base| resolve_price(base, markup_percentage, None))
            } else {
                None
            };

            if validated.is_valid() {
                valid_rows += 1;
            } else {
                invalid_rows += 1;
            }

            preview.push(PreviewRow {
                is_valid: validated.is_valid(),
                errors: validated.errors,
                row: validated.row,
                display_price,
            });
        }

        debug!(valid_rows, invalid_rows, "preview generated");

        PreviewResult {
            total_rows: sheet.total_rows(),
            valid_rows,
            invalid_rows,
            preview,
        }
    }
}
