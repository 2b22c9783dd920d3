//! Typed failures of the extraction engine and the sheet writer.

/// Timestamp did not match `%a, %d %b %Y %H:%M:%S %z`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid email date '{input}': expected 'Mon, 3 Jun 2024 10:15:00 -0700'")]
pub struct DateFormatError {
    pub input: String,
}

/// Failures reported by the sheet writer
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("Unable to read existing rows {range}: {source}")]
    Read {
        range: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Unable to write rows {range}: {source}")]
    Write {
        range: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Rows {range} written but formatting copy failed: {source}")]
    Formatting {
        range: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Configuration problems detected at startup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable(s): {0}")]
    MissingEnvVar(String),

    #[error("No subject keyword configured: the search would match the whole inbox")]
    NoKeywords,

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Unable to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}
