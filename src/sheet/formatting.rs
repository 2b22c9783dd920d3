use anyhow::Result;
use log::{debug, warn};

use super::row::STATUS_COLUMN;
use super::SheetTarget;
use crate::store::{FormattingKind, GridRect, TabularStore};

/// Copy the status-column validation of `source_row` into rows
/// `first_row..first_row + count` (all 1-based). Values are not touched.
///
/// Returns `Ok(false)` when there is no source row to copy from.
pub async fn propagate_status_validation(
    store: &dyn TabularStore,
    target: &SheetTarget,
    source_row: u32,
    first_row: u32,
    count: u32,
) -> Result<bool> {
    if source_row == 0 {
        warn!("⚠️  No row above row {}, status dropdown not copied", first_row);
        return Ok(false);
    }
    if count == 0 {
        return Ok(false);
    }

    let source = status_cells(target.sheet_id, source_row, 1);
    let destination = status_cells(target.sheet_id, first_row, count);

    debug!(
        "Copying status validation from row {} to rows {}-{}",
        source_row,
        first_row,
        first_row + count - 1
    );

    store
        .copy_formatting(
            &target.spreadsheet_id,
            source,
            destination,
            FormattingKind::DataValidation,
        )
        .await?;

    Ok(true)
}

/// Status column of `count` rows starting at 1-based `first_row`
fn status_cells(sheet_id: i32, first_row: u32, count: u32) -> GridRect {
    GridRect {
        sheet_id,
        start_row: first_row - 1,
        end_row: first_row - 1 + count,
        start_column: STATUS_COLUMN,
        end_column: STATUS_COLUMN + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_cells_are_zero_based_and_end_exclusive() {
        let rect = status_cells(0, 10, 3);
        assert_eq!(
            rect,
            GridRect {
                sheet_id: 0,
                start_row: 9,
                end_row: 12,
                start_column: 4,
                end_column: 5,
            }
        );
    }
}
