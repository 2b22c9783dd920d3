// In-memory mail store and spreadsheet used by the integration tests
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use base64::Engine as _;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Mutex;

use jobapptracker::email::{BodyPart, RawMessage};
use jobapptracker::store::{FormattingKind, GridRect, MailStore, TabularStore};

pub fn encode(text: &str) -> Option<String> {
    Some(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(text))
}

pub fn plain(text: &str) -> BodyPart {
    BodyPart::leaf("text/plain", encode(text))
}

pub fn html(text: &str) -> BodyPart {
    BodyPart::leaf("text/html", encode(text))
}

pub fn message(id: &str, from: &str, subject: &str, date: &str, payload: BodyPart) -> RawMessage {
    RawMessage::new(
        id,
        vec![
            ("From".to_string(), from.to_string()),
            ("Subject".to_string(), subject.to_string()),
            ("Date".to_string(), date.to_string()),
        ],
        payload,
    )
}

/// Mailbox returning its messages newest first, like Gmail
#[derive(Default)]
pub struct FakeMailbox {
    /// Oldest first
    messages: Vec<RawMessage>,
    broken: Vec<String>,
    pub queries: Mutex<Vec<(String, u32)>>,
    pub fetched: Mutex<Vec<String>>,
}

impl FakeMailbox {
    pub fn new(messages: Vec<RawMessage>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    /// Listed by search but failing on fetch
    pub fn with_broken(mut self, message_id: &str) -> Self {
        self.broken.push(message_id.to_string());
        self
    }
}

impl MailStore for FakeMailbox {
    fn search<'a>(&'a self, query: &'a str, limit: u32) -> BoxFuture<'a, Result<Vec<String>>> {
        Box::pin(async move {
            self.queries.lock().unwrap().push((query.to_string(), limit));
            let mut ids: Vec<String> = self
                .messages
                .iter()
                .map(|m| m.id.clone())
                .chain(self.broken.iter().cloned())
                .collect();
            ids.reverse();
            ids.truncate(limit as usize);
            Ok(ids)
        })
    }

    fn fetch_full<'a>(&'a self, message_id: &'a str) -> BoxFuture<'a, Result<RawMessage>> {
        Box::pin(async move {
            self.fetched.lock().unwrap().push(message_id.to_string());
            self.messages
                .iter()
                .find(|m| m.id == message_id)
                .cloned()
                .ok_or_else(|| anyhow!("message {} not found", message_id))
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SheetCall {
    Read(String),
    Write(String, Vec<Vec<String>>),
    CopyFormatting(GridRect, GridRect, FormattingKind),
}

/// Single-sheet grid answering A1 ranges the way the Sheets API does:
/// trailing empty rows are omitted, interior empty rows come back empty.
#[derive(Default)]
pub struct FakeSheet {
    /// Index 0 is row 1
    pub rows: Mutex<Vec<Vec<String>>>,
    /// Status-column validation per 1-based row
    pub validation: Mutex<HashMap<u32, String>>,
    pub calls: Mutex<Vec<SheetCall>>,
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub fail_formatting: bool,
}

impl FakeSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows `first_row..first_row + count` get a company in column A
    pub fn with_filled_rows(self, first_row: u32, count: u32) -> Self {
        for row in first_row..first_row + count {
            self.set_cell(row, 0, &format!("Company {}", row));
        }
        self
    }

    pub fn with_dropdown(self, row: u32, rule: &str) -> Self {
        self.validation.lock().unwrap().insert(row, rule.to_string());
        self
    }

    pub fn set_cell(&self, row: u32, column: usize, value: &str) {
        let mut rows = self.rows.lock().unwrap();
        let index = (row - 1) as usize;
        if rows.len() <= index {
            rows.resize(index + 1, Vec::new());
        }
        let cells = &mut rows[index];
        if cells.len() <= column {
            cells.resize(column + 1, String::new());
        }
        cells[column] = value.to_string();
    }

    pub fn row(&self, row: u32) -> Vec<String> {
        self.rows
            .lock()
            .unwrap()
            .get((row - 1) as usize)
            .cloned()
            .unwrap_or_default()
    }

    pub fn dropdown(&self, row: u32) -> Option<String> {
        self.validation.lock().unwrap().get(&row).cloned()
    }

    pub fn calls(&self) -> Vec<SheetCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<(String, Vec<Vec<String>>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SheetCall::Write(range, rows) => Some((range, rows)),
                _ => None,
            })
            .collect()
    }

    pub fn reads(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, SheetCall::Read(_)))
            .count()
    }
}

/// "Sheet1!A5:F7" → (5, 0, 7, 5)
fn parse_a1(range: &str) -> (u32, usize, u32, usize) {
    let cells = range.rsplit_once('!').map(|(_, cells)| cells).unwrap_or(range);
    let (start, end) = cells.split_once(':').expect("two-cell range");
    let (start_col, start_row) = split_cell(start);
    let (end_col, end_row) = split_cell(end);
    (start_row, start_col, end_row, end_col)
}

fn split_cell(cell: &str) -> (usize, u32) {
    let letters: String = cell.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    let digits = &cell[letters.len()..];
    let column = letters.bytes().fold(0usize, |acc, b| acc * 26 + (b - b'A' + 1) as usize) - 1;
    (column, digits.parse().expect("row number"))
}

impl TabularStore for FakeSheet {
    fn read_range<'a>(
        &'a self,
        _spreadsheet_id: &'a str,
        range: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Vec<String>>>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(SheetCall::Read(range.to_string()));
            if self.fail_reads {
                return Err(anyhow!("read quota exceeded"));
            }

            let (first_row, first_col, last_row, last_col) = parse_a1(range);
            let rows = self.rows.lock().unwrap();

            let mut values: Vec<Vec<String>> = (first_row..=last_row)
                .map(|row| {
                    let cells = rows.get((row - 1) as usize).cloned().unwrap_or_default();
                    let mut slice: Vec<String> = cells
                        .into_iter()
                        .skip(first_col)
                        .take(last_col - first_col + 1)
                        .collect();
                    while slice.last().is_some_and(|cell| cell.is_empty()) {
                        slice.pop();
                    }
                    slice
                })
                .collect();
            while values.last().is_some_and(|row| row.is_empty()) {
                values.pop();
            }
            Ok(values)
        })
    }

    fn write_range<'a>(
        &'a self,
        _spreadsheet_id: &'a str,
        range: &'a str,
        rows: Vec<Vec<String>>,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.calls
                .lock()
                .unwrap()
                .push(SheetCall::Write(range.to_string(), rows.clone()));
            if self.fail_writes {
                return Err(anyhow!("write quota exceeded"));
            }

            let (first_row, first_col, _, _) = parse_a1(range);
            for (offset, cells) in rows.iter().enumerate() {
                for (column, value) in cells.iter().enumerate() {
                    self.set_cell(first_row + offset as u32, first_col + column, value);
                }
            }
            Ok(())
        })
    }

    fn copy_formatting<'a>(
        &'a self,
        _spreadsheet_id: &'a str,
        source: GridRect,
        destination: GridRect,
        kind: FormattingKind,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.calls
                .lock()
                .unwrap()
                .push(SheetCall::CopyFormatting(source, destination, kind));
            if self.fail_formatting {
                return Err(anyhow!("batchUpdate rejected"));
            }

            let rule = self.dropdown(source.start_row + 1);
            let mut validation = self.validation.lock().unwrap();
            for row in destination.start_row..destination.end_row {
                match &rule {
                    Some(rule) => validation.insert(row + 1, rule.clone()),
                    None => validation.remove(&(row + 1)),
                };
            }
            Ok(())
        })
    }
}
