/// Idempotent append of application rows into the tracking spreadsheet
pub mod formatting;
pub mod locator;
pub mod row;
pub mod writer;

pub use locator::find_first_empty_row;
pub use row::SheetRow;
pub use writer::{Appended, SheetWriter};

use crate::config::TrackerConfig;

/// Where rows land: one sheet of one spreadsheet, appends from `start_row` on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetTarget {
    pub spreadsheet_id: String,
    pub sheet_name: String,
    /// Numeric sheet id used by grid ranges (first sheet is 0)
    pub sheet_id: i32,
    /// 1-based; rows above are never written
    pub start_row: u32,
}

impl SheetTarget {
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self {
            spreadsheet_id: config.spreadsheet_id.clone(),
            sheet_name: config.sheet_name.clone(),
            sheet_id: config.sheet_id,
            start_row: config.start_row,
        }
    }
}
