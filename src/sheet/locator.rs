use log::{debug, warn};

use super::row::first_column_range;
use super::SheetTarget;
use crate::store::TabularStore;

pub const PAGE_SIZE: u32 = 100;
pub const MAX_PAGES: u32 = 10;

/// First row at or after `target.start_row` (at least 1) whose column A is empty.
///
/// Reads column A one page at a time. A short page means the sheet ends
/// there. Read failures fall back to the start row; an exhausted scan falls
/// back to `start_row + PAGE_SIZE * MAX_PAGES`.
pub async fn find_first_empty_row(store: &dyn TabularStore, target: &SheetTarget) -> u32 {
    let start = target.start_row.max(1);

    for page in 0..MAX_PAGES {
        let page_start = start + page * PAGE_SIZE;
        let page_end = page_start + PAGE_SIZE - 1;
        let range = first_column_range(&target.sheet_name, page_start, page_end);

        let rows = match store.read_range(&target.spreadsheet_id, &range).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!("⚠️  Unable to read {}: {} - falling back to row {}", range, e, start);
                return start;
            }
        };
        debug!("Read {} row(s) from {}", rows.len(), range);

        if let Some(offset) = rows.iter().position(|row| is_empty_marker(row)) {
            return page_start + offset as u32;
        }

        if (rows.len() as u32) < PAGE_SIZE {
            return page_start + rows.len() as u32;
        }
    }

    let capped = start + PAGE_SIZE * MAX_PAGES;
    warn!("⚠️  No empty row in {} scanned rows, using row {}", PAGE_SIZE * MAX_PAGES, capped);
    capped
}

/// Only column A decides occupancy
fn is_empty_marker(row: &[String]) -> bool {
    row.first().map_or(true, |cell| cell.trim().is_empty())
}
