/// Common structures for job-application email processing

/// Sentinel company name used when no extraction rule matched
pub const UNKNOWN_COMPANY: &str = "Unknown";

/// Node of a message body payload tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyPart {
    /// Single part carrying (optionally) base64url-encoded inline data
    Leaf {
        mime_type: String,
        data: Option<String>,
    },
    /// Multipart container; children keep the order delivered by the mail store
    Branch {
        mime_type: String,
        parts: Vec<BodyPart>,
    },
}

impl BodyPart {
    pub fn leaf(mime_type: impl Into<String>, data: Option<String>) -> Self {
        BodyPart::Leaf {
            mime_type: mime_type.into(),
            data,
        }
    }

    pub fn branch(mime_type: impl Into<String>, parts: Vec<BodyPart>) -> Self {
        BodyPart::Branch {
            mime_type: mime_type.into(),
            parts,
        }
    }

    pub fn mime_type(&self) -> &str {
        match self {
            BodyPart::Leaf { mime_type, .. } | BodyPart::Branch { mime_type, .. } => mime_type,
        }
    }
}

/// Email as fetched from the mail store, read-only for one extraction pass
#[derive(Debug, Clone)]
pub struct RawMessage {
    pub id: String,
    pub headers: Vec<(String, String)>,
    pub payload: BodyPart,
}

impl RawMessage {
    pub fn new(id: impl Into<String>, headers: Vec<(String, String)>, payload: BodyPart) -> Self {
        Self {
            id: id.into(),
            headers,
            payload,
        }
    }

    /// First header with the given name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn subject(&self) -> &str {
        self.header("Subject").unwrap_or("")
    }

    pub fn from(&self) -> &str {
        self.header("From").unwrap_or("")
    }

    pub fn date(&self) -> &str {
        self.header("Date").unwrap_or("")
    }
}

/// Company and application date extracted from one accepted message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRecord {
    pub message_id: String,
    pub company_name: String,
    pub date_applied: String,
}

impl ExtractedRecord {
    pub fn is_unknown(&self) -> bool {
        self.company_name == UNKNOWN_COMPANY
    }
}

/// Outcome of one tracker run
#[derive(Debug, Default)]
pub struct RunReport {
    pub candidates: usize,
    pub fetched: usize,
    pub accepted: usize,
    pub unknown_company: usize,
    pub duplicates: usize,
    pub failures: Vec<(String, String)>,
    pub start_row: Option<u32>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failure(&mut self, message_id: &str, reason: impl ToString) {
        self.failures.push((message_id.to_string(), reason.to_string()));
    }

    /// One-line human summary, used for logs and notifications
    pub fn summary(&self) -> String {
        let mut text = format!(
            "{} candidate(s), {} fetched, {} record(s) accepted, {} without company, {} duplicate(s), {} failure(s)",
            self.candidates,
            self.fetched,
            self.accepted,
            self.unknown_company,
            self.duplicates,
            self.failures.len()
        );
        if let Some(row) = self.start_row {
            text.push_str(&format!(", appended from row {}", row));
        }
        text
    }
}
