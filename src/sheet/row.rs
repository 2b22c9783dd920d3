use crate::email::ExtractedRecord;

/// Columns A-F
pub const ROW_WIDTH: usize = 6;
/// Column E, carries the status dropdown
pub const STATUS_COLUMN: u32 = 4;
pub const DEFAULT_STATUS: &str = "Applied ";

/// One table row: [Company, "", "", Date Applied, Status, ""]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow([String; ROW_WIDTH]);

impl SheetRow {
    pub fn from_record(record: &ExtractedRecord) -> Self {
        SheetRow([
            capitalize_first(&record.company_name),
            String::new(),
            String::new(),
            record.date_applied.clone(),
            DEFAULT_STATUS.to_string(),
            String::new(),
        ])
    }

    pub fn cells(&self) -> &[String] {
        &self.0
    }

    pub fn into_cells(self) -> Vec<String> {
        self.0.into()
    }
}

/// Uppercase the first character, leave the rest as extracted
pub fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Quote a sheet name for A1 notation when needed
pub fn quote_sheet_name(name: &str) -> String {
    if name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}

/// `Sheet!A{first}:A{last}`
pub fn first_column_range(sheet_name: &str, first_row: u32, last_row: u32) -> String {
    format!("{}!A{}:A{}", quote_sheet_name(sheet_name), first_row, last_row)
}

/// `Sheet!A{first}:D{last}`, company through date applied
pub fn key_columns_range(sheet_name: &str, first_row: u32, last_row: u32) -> String {
    format!("{}!A{}:D{}", quote_sheet_name(sheet_name), first_row, last_row)
}

/// Identity of one application, case-insensitive on the company
pub fn application_key(company: &str, date_applied: &str) -> (String, String) {
    (company.trim().to_lowercase(), date_applied.trim().to_string())
}

/// Key of an existing sheet row read from columns A-D
pub fn row_key(cells: &[String]) -> Option<(String, String)> {
    let company = cells.first()?;
    if company.trim().is_empty() {
        return None;
    }
    let date = cells.get(3).map(String::as_str).unwrap_or_default();
    Some(application_key(company, date))
}

/// `Sheet!A{first}:F{last}`
pub fn row_block_range(sheet_name: &str, first_row: u32, last_row: u32) -> String {
    format!("{}!A{}:F{}", quote_sheet_name(sheet_name), first_row, last_row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_layout() {
        let record = ExtractedRecord {
            message_id: "m1".to_string(),
            company_name: "acme".to_string(),
            date_applied: "June 03, 2024".to_string(),
        };

        let row = SheetRow::from_record(&record);
        assert_eq!(
            row.cells(),
            &["Acme", "", "", "June 03, 2024", "Applied ", ""].map(String::from)
        );
        assert_eq!(row.into_cells().len(), ROW_WIDTH);
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("jobs"), "Jobs");
        assert_eq!(capitalize_first("iBM"), "IBM");
        assert_eq!(capitalize_first("écolab"), "Écolab");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_ranges() {
        assert_eq!(first_column_range("Sheet1", 5, 104), "Sheet1!A5:A104");
        assert_eq!(row_block_range("Job Apps", 7, 8), "'Job Apps'!A7:F8");
        assert_eq!(quote_sheet_name("Bob's"), "'Bob''s'");
        assert_eq!(key_columns_range("Sheet1", 10, 12), "Sheet1!A10:D12");
    }

    #[test]
    fn test_written_row_matches_its_record() {
        let record = ExtractedRecord {
            message_id: "m1".to_string(),
            company_name: "jobs".to_string(),
            date_applied: "June 03, 2024".to_string(),
        };

        let cells = SheetRow::from_record(&record).into_cells();
        assert_eq!(
            row_key(&cells),
            Some(application_key(&record.company_name, &record.date_applied))
        );
    }

    #[test]
    fn test_row_key_needs_a_company() {
        assert_eq!(row_key(&[]), None);
        assert_eq!(row_key(&["  ".to_string()]), None);
        assert_eq!(
            row_key(&["Acme".to_string()]),
            Some(("acme".to_string(), String::new()))
        );
    }
}
