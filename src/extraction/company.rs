use log::debug;
use regex::Regex;
use std::sync::OnceLock;

use crate::email::UNKNOWN_COMPANY;

/// Header and body text a rule may look at
#[derive(Debug, Clone, Copy)]
pub struct EmailFields<'a> {
    pub from: &'a str,
    pub subject: &'a str,
    pub body: &'a str,
}

/// One heuristic step that may yield a company name
pub trait ExtractionRule: Send + Sync {
    /// Rule name (for logging)
    fn name(&self) -> &str;

    fn apply(&self, fields: &EmailFields<'_>) -> Option<String>;
}

/// Sender on the applicant-tracking-system domain: the local part names the company
pub struct AtsSenderRule {
    domain: String,
}

impl AtsSenderRule {
    pub fn new(domain: &str) -> Self {
        Self {
            domain: domain.trim().to_ascii_lowercase(),
        }
    }
}

impl ExtractionRule for AtsSenderRule {
    fn name(&self) -> &str {
        "ats-sender"
    }

    fn apply(&self, fields: &EmailFields<'_>) -> Option<String> {
        let (_name, address) = parse_sender(fields.from);
        let address = address?;
        let (local, domain) = address.rsplit_once('@')?;

        if domain.to_ascii_lowercase() != self.domain || local.is_empty() {
            return None;
        }

        Some(local.to_lowercase())
    }
}

/// Which text a [`PrepositionRule`] scans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    Body,
    Subject,
}

/// First "at <token>" in the chosen text
pub struct PrepositionRule {
    source: TextSource,
}

impl PrepositionRule {
    pub fn new(source: TextSource) -> Self {
        Self { source }
    }
}

impl ExtractionRule for PrepositionRule {
    fn name(&self) -> &str {
        match self.source {
            TextSource::Body => "body-preposition",
            TextSource::Subject => "subject-preposition",
        }
    }

    fn apply(&self, fields: &EmailFields<'_>) -> Option<String> {
        let text = match self.source {
            TextSource::Body => fields.body,
            TextSource::Subject => fields.subject,
        };
        company_after_preposition(text)
    }
}

/// Ordered rule chain; the first rule returning a name wins
pub struct CompanyExtractor {
    rules: Vec<Box<dyn ExtractionRule>>,
}

impl CompanyExtractor {
    /// Sender domain, then body, then subject
    pub fn new(ats_domain: &str) -> Self {
        Self::with_rules(vec![
            Box::new(AtsSenderRule::new(ats_domain)),
            Box::new(PrepositionRule::new(TextSource::Body)),
            Box::new(PrepositionRule::new(TextSource::Subject)),
        ])
    }

    pub fn with_rules(rules: Vec<Box<dyn ExtractionRule>>) -> Self {
        Self { rules }
    }

    /// Company name, or [`UNKNOWN_COMPANY`] when no rule matched
    pub fn extract(&self, from: &str, subject: &str, body: &str) -> String {
        let fields = EmailFields { from, subject, body };

        for rule in &self.rules {
            if let Some(company) = rule.apply(&fields) {
                debug!("Company '{}' found by rule {}", company, rule.name());
                return company;
            }
        }

        debug!("No company found for subject '{}'", subject);
        UNKNOWN_COMPANY.to_string()
    }
}

fn preposition_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bat\s+(\S+)").expect("valid preposition regex"))
}

fn address_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\w.+-]+@[\w.-]+").expect("valid address regex"))
}

/// Token following the first "at", if it passes validation
pub fn company_after_preposition(text: &str) -> Option<String> {
    let caps = preposition_regex().captures(text)?;
    let token = caps.get(1)?.as_str();
    validate_token(token)
}

/// Strip surrounding punctuation (quotes, ellipses) and reject tokens that
/// cannot be a company
fn validate_token(token: &str) -> Option<String> {
    let token = token.trim_matches(|c: char| !c.is_alphanumeric());

    if token.is_empty()
        || token.eq_ignore_ascii_case("this")
        || token.eq_ignore_ascii_case("the")
        || token.chars().any(|c| c.is_ascii_digit())
    {
        return None;
    }

    Some(token.to_string())
}

/// Split a From header into display name and address
pub fn parse_sender(header: &str) -> (Option<String>, Option<String>) {
    let raw = format!("From: {}\r\n\r\n", header.trim());
    let parsed = mail_parser::MessageParser::default()
        .parse(raw.as_bytes())
        .and_then(|message| {
            message
                .from()
                .and_then(|addrs| addrs.first())
                .map(|addr| {
                    (
                        addr.name.as_ref().map(|name| name.to_string()),
                        addr.address.as_ref().map(|address| address.to_string()),
                    )
                })
        });

    match parsed {
        Some((name, Some(address))) => (name, Some(address)),
        other => {
            let name = other.and_then(|(name, _)| name);
            let address = address_regex()
                .find(header)
                .map(|m| m.as_str().to_string());
            (name, address)
        }
    }
}
