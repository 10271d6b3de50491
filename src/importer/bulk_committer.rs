// ==========================================
// Link Marketplace - Bulk Committer
// ==========================================
// Persists selected preview rows one at a time.
// Partial success is accepted: a failing row is recorded and the
// loop moves on. Every message starts with "Row <n>: ".
// ==========================================

use crate::domain::site::{CommitResult, PreviewRow, Publisher};
use crate::importer::row_validator::RowValidator;
use crate::repository::SiteRepository;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub struct BulkCommitter {
    validator: RowValidator,
    sites: Arc<dyn SiteRepository>,
    row_limit: usize,
}

impl BulkCommitter {
    /// row_limit: rows beyond the preview window are never persisted
    pub fn new(validator: RowValidator, sites: Arc<dyn SiteRepository>, row_limit: usize) -> Self {
        Self {
            validator,
            sites,
            row_limit,
        }
    }

    fn in_preview(&self, row_index: usize) -> bool {
        row_index >= 1 && row_index <= self.row_limit
    }

    /// Commits the selected rows.
    ///
    /// # Arguments
    /// - rows: preview rows sent back by the operator (their is_valid flag is ignored)
    /// - selected: 1-based row indices to persist
    /// - roster: current publishers
    ///
    /// # Returns
    /// saved count plus one message per rejected row, in row order
    #[instrument(skip_all, fields(preview_rows = rows.len(), selected = selected.len()))]
    pub async fn commit(
        &self,
        rows: &[PreviewRow],
        selected: &[usize],
        roster: &[Publisher],
    ) -> CommitResult {
        let mut result = CommitResult::default();
        let wanted: BTreeSet<usize> = selected.iter().copied().collect();

        for row_index in wanted {
            let found = if self.in_preview(row_index) {
                rows.iter().find(|r| r.row.row_index == row_index)
            } else {
                None
            };
            let preview_row = match found {
                Some(row) => row,
                None => {
                    result
                        .errors
                        .push(format!("Row {}: not part of the preview", row_index));
                    continue;
                }
            };

            // re-validate against the current roster
            let validated = self.validator.validate(preview_row.row.clone(), roster);
            let site = match validated.site {
                Some(site) => site,
                None => {
                    let messages: Vec<&str> =
                        validated.errors.iter().map(|e| e.message.as_str()).collect();
                    result
                        .errors
                        .push(format!("Row {}: {}", row_index, messages.join("; ")));
                    continue;
                }
            };

            match self.sites.find_by_url(&site.url).await {
                Ok(Some(_)) => {
                    result.errors.push(format!(
                        "Row {}: Site with URL {} already exists",
                        row_index, site.url
                    ));
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    result
                        .errors
                        .push(format!("Row {}: Failed to check existing site: {}", row_index, e));
                    continue;
                }
            }

            match self.sites.create(&site).await {
                Ok(created) => {
                    result.saved_count += 1;
                    tracing::debug!(row_index, site_id = %created.id, "site created");
                }
                Err(e) => {
                    warn!(row_index, error = %e, "site create failed");
                    result
                        .errors
                        .push(format!("Row {}: Failed to save site: {}", row_index, e));
                }
            }
        }

        info!(
            saved = result.saved_count,
            failed = result.errors.len(),
            "bulk commit finished"
        );
        result
    }
}
