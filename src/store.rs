//! Collaborator seams: the mailbox and the spreadsheet.

use anyhow::Result;
use futures::future::BoxFuture;

use crate::email::RawMessage;

/// Read-only access to the mailbox
pub trait MailStore: Send + Sync {
    /// Up to `limit` message IDs matching `query`, most recent first
    fn search<'a>(&'a self, query: &'a str, limit: u32) -> BoxFuture<'a, Result<Vec<String>>>;

    fn fetch_full<'a>(&'a self, message_id: &'a str) -> BoxFuture<'a, Result<RawMessage>>;
}

/// 0-based, end-exclusive rectangle on one sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRect {
    pub sheet_id: i32,
    pub start_row: u32,
    pub end_row: u32,
    pub start_column: u32,
    pub end_column: u32,
}

/// What a formatting copy carries over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormattingKind {
    /// Data-validation rules only (dropdowns); values and styles untouched
    DataValidation,
}

/// Cell-level access to the spreadsheet
pub trait TabularStore: Send + Sync {
    /// Raw cell strings for an A1 range; trailing empty rows may be omitted
    fn read_range<'a>(
        &'a self,
        spreadsheet_id: &'a str,
        range: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Vec<String>>>>;

    fn write_range<'a>(
        &'a self,
        spreadsheet_id: &'a str,
        range: &'a str,
        rows: Vec<Vec<String>>,
    ) -> BoxFuture<'a, Result<()>>;

    fn copy_formatting<'a>(
        &'a self,
        spreadsheet_id: &'a str,
        source: GridRect,
        destination: GridRect,
        kind: FormattingKind,
    ) -> BoxFuture<'a, Result<()>>;
}
