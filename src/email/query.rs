use crate::error::ConfigError;

/// Gmail search predicate matching any keyword in the subject, inbox only.
///
/// `["thank you for applying", "application"]` becomes
/// `(subject:"thank you for applying" OR subject:"application") label:inbox`.
pub fn build_search_query(keywords: &[String]) -> Result<String, ConfigError> {
    let clauses: Vec<String> = keywords
        .iter()
        .map(|keyword| keyword.replace('"', ""))
        .map(|keyword| keyword.trim().to_string())
        .filter(|keyword| !keyword.is_empty())
        .map(|keyword| format!("subject:\"{}\"", keyword))
        .collect();

    if clauses.is_empty() {
        return Err(ConfigError::NoKeywords);
    }

    Ok(format!("({}) label:inbox", clauses.join(" OR ")))
}
