/// Company and date extraction from job-application emails
pub mod company;
pub mod date;

pub use company::{CompanyExtractor, ExtractionRule};
pub use date::normalize_date;

use log::debug;

use crate::email::{flatten_body, ExtractedRecord, RawMessage};
use crate::error::DateFormatError;

/// Outcome for one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Accepted(ExtractedRecord),
    /// No rule found a company; the message is not written
    UnknownCompany,
}

/// Turn a fetched message into a record ready for the sheet
pub fn extract_record(
    extractor: &CompanyExtractor,
    message: &RawMessage,
) -> Result<Extraction, DateFormatError> {
    let body = flatten_body(&message.payload);
    debug!("Message {}: {} chars of body text", message.id, body.len());

    let company = extractor.extract(message.from(), message.subject(), &body);
    let record = ExtractedRecord {
        message_id: message.id.clone(),
        company_name: company,
        date_applied: String::new(),
    };
    if record.is_unknown() {
        return Ok(Extraction::UnknownCompany);
    }

    let date_applied = normalize_date(message.date())?;
    Ok(Extraction::Accepted(ExtractedRecord {
        date_applied,
        ..record
    }))
}
