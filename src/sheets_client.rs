use anyhow::{Context, Result};
use futures::future::BoxFuture;
use google_sheets4::api::{
    BatchUpdateSpreadsheetRequest, CopyPasteRequest, GridRange, Request, Scope, ValueRange,
};
use google_sheets4::Sheets;
use log::{debug, info};

use crate::auth::{https_client, Authenticator, HttpsConnector};
use crate::store::{FormattingKind, GridRect, TabularStore};

pub struct SheetsClient {
    hub: Sheets<HttpsConnector>,
}

impl SheetsClient {
    pub fn new(auth: Authenticator) -> Result<Self> {
        info!("Connecting to Google Sheets API via OAuth2");

        let hub = Sheets::new(https_client()?, auth);
        Ok(SheetsClient { hub })
    }

    pub async fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<String>>> {
        debug!("Reading {}", range);

        let (_, value_range) = self
            .hub
            .spreadsheets()
            .values_get(spreadsheet_id, range)
            .add_scope(Scope::Spreadsheet)
            .doit()
            .await
            .with_context(|| format!("Unable to read range {}", range))?;

        Ok(value_range
            .values
            .unwrap_or_default()
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    pub async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<()> {
        let request = ValueRange {
            range: Some(range.to_string()),
            major_dimension: Some("ROWS".to_string()),
            values: Some(
                rows.into_iter()
                    .map(|row| row.into_iter().map(serde_json::Value::String).collect())
                    .collect(),
            ),
            ..Default::default()
        };

        self.hub
            .spreadsheets()
            .values_update(request, spreadsheet_id, range)
            .value_input_option("RAW")
            .add_scope(Scope::Spreadsheet)
            .doit()
            .await
            .with_context(|| format!("Unable to write range {}", range))?;

        debug!("Range {} updated", range);
        Ok(())
    }

    pub async fn copy_paste(
        &self,
        spreadsheet_id: &str,
        source: GridRect,
        destination: GridRect,
        kind: FormattingKind,
    ) -> Result<()> {
        let request = BatchUpdateSpreadsheetRequest {
            requests: Some(vec![Request {
                copy_paste: Some(CopyPasteRequest {
                    source: Some(grid_range(source)),
                    destination: Some(grid_range(destination)),
                    paste_type: Some(paste_type(kind).to_string()),
                    paste_orientation: Some("NORMAL".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            }]),
            ..Default::default()
        };

        self.hub
            .spreadsheets()
            .batch_update(request, spreadsheet_id)
            .add_scope(Scope::Spreadsheet)
            .doit()
            .await
            .context("Unable to copy formatting")?;

        Ok(())
    }
}

fn paste_type(kind: FormattingKind) -> &'static str {
    match kind {
        FormattingKind::DataValidation => "PASTE_DATA_VALIDATION",
    }
}

fn grid_range(rect: GridRect) -> GridRange {
    GridRange {
        sheet_id: Some(rect.sheet_id),
        start_row_index: Some(rect.start_row as i32),
        end_row_index: Some(rect.end_row as i32),
        start_column_index: Some(rect.start_column as i32),
        end_column_index: Some(rect.end_column as i32),
        ..Default::default()
    }
}

/// Cells come back as JSON; numbers and booleans are rendered as text
fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl TabularStore for SheetsClient {
    fn read_range<'a>(
        &'a self,
        spreadsheet_id: &'a str,
        range: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Vec<String>>>> {
        Box::pin(self.get_values(spreadsheet_id, range))
    }

    fn write_range<'a>(
        &'a self,
        spreadsheet_id: &'a str,
        range: &'a str,
        rows: Vec<Vec<String>>,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.update_values(spreadsheet_id, range, rows))
    }

    fn copy_formatting<'a>(
        &'a self,
        spreadsheet_id: &'a str,
        source: GridRect,
        destination: GridRect,
        kind: FormattingKind,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.copy_paste(spreadsheet_id, source, destination, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_range_conversion() {
        let range = grid_range(GridRect {
            sheet_id: 0,
            start_row: 9,
            end_row: 12,
            start_column: 4,
            end_column: 5,
        });

        assert_eq!(range.sheet_id, Some(0));
        assert_eq!(range.start_row_index, Some(9));
        assert_eq!(range.end_row_index, Some(12));
        assert_eq!(range.start_column_index, Some(4));
        assert_eq!(range.end_column_index, Some(5));
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(serde_json::json!("Acme")), "Acme");
        assert_eq!(cell_to_string(serde_json::Value::Null), "");
        assert_eq!(cell_to_string(serde_json::json!(42)), "42");
        assert_eq!(cell_to_string(serde_json::json!(true)), "true");
    }

    #[test]
    fn test_paste_type() {
        assert_eq!(paste_type(FormattingKind::DataValidation), "PASTE_DATA_VALIDATION");
    }
}
