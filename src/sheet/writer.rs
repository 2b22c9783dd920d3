use std::collections::HashSet;

use log::{debug, info, warn};

use super::formatting::propagate_status_validation;
use super::locator::find_first_empty_row;
use super::row::{application_key, key_columns_range, row_block_range, row_key, SheetRow};
use super::SheetTarget;
use crate::email::ExtractedRecord;
use crate::error::SheetError;
use crate::store::TabularStore;

/// Result of one append
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Appended {
    /// First written row, `None` when nothing was written
    pub start_row: Option<u32>,
    /// Records skipped because the table already holds them
    pub already_recorded: usize,
}

/// Appends record batches below the existing rows of the target sheet
pub struct SheetWriter<'s> {
    store: &'s dyn TabularStore,
    target: SheetTarget,
}

impl<'s> SheetWriter<'s> {
    pub fn new(store: &'s dyn TabularStore, target: SheetTarget) -> Self {
        Self { store, target }
    }

    pub fn target(&self) -> &SheetTarget {
        &self.target
    }

    /// Write the records the table does not hold yet as one contiguous block
    /// and copy the status dropdown from the row above into it.
    ///
    /// An empty batch makes no store call. A formatting failure after a
    /// successful value write is reported as an error; the written values
    /// stay in place.
    pub async fn append(&self, records: &[ExtractedRecord]) -> Result<Appended, SheetError> {
        if records.is_empty() {
            return Ok(Appended::default());
        }

        let start_row = find_first_empty_row(self.store, &self.target).await;
        let existing = self.existing_keys(start_row).await?;

        let fresh: Vec<&ExtractedRecord> = records
            .iter()
            .filter(|record| {
                let known = existing.contains(&application_key(&record.company_name, &record.date_applied));
                if known {
                    debug!("{} on {} already recorded", record.company_name, record.date_applied);
                }
                !known
            })
            .collect();
        let already_recorded = records.len() - fresh.len();

        if fresh.is_empty() {
            info!("All {} record(s) already in the sheet", records.len());
            return Ok(Appended {
                start_row: None,
                already_recorded,
            });
        }

        let count = fresh.len() as u32;
        let last_row = start_row + count - 1;
        let range = row_block_range(&self.target.sheet_name, start_row, last_row);

        let rows: Vec<Vec<String>> = fresh
            .into_iter()
            .map(|record| SheetRow::from_record(record).into_cells())
            .collect();

        info!("Writing {} row(s) to {}", count, range);
        self.store
            .write_range(&self.target.spreadsheet_id, &range, rows)
            .await
            .map_err(|source| SheetError::Write {
                range: range.clone(),
                source,
            })?;

        let copied = propagate_status_validation(
            self.store,
            &self.target,
            start_row.saturating_sub(1),
            start_row,
            count,
        )
        .await
        .map_err(|source| SheetError::Formatting {
            range: range.clone(),
            source,
        })?;

        if !copied {
            warn!("⚠️  Rows {} have no status dropdown", range);
        }

        info!("✅ Appended {} row(s) starting at row {}", count, start_row);
        Ok(Appended {
            start_row: Some(start_row),
            already_recorded,
        })
    }

    /// (company, date) of the rows between the start row and `first_empty`
    async fn existing_keys(&self, first_empty: u32) -> Result<HashSet<(String, String)>, SheetError> {
        let first = self.target.start_row.max(1);
        if first_empty <= first {
            return Ok(HashSet::new());
        }

        let range = key_columns_range(&self.target.sheet_name, first, first_empty - 1);
        let rows = self
            .store
            .read_range(&self.target.spreadsheet_id, &range)
            .await
            .map_err(|source| SheetError::Read {
                range: range.clone(),
                source,
            })?;

        debug!("{} existing row(s) in {}", rows.len(), range);
        Ok(rows.iter().filter_map(|row| row_key(row)).collect())
    }
}
