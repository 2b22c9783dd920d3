use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::ConfigError;

/// Optional settings file for the tracker section (`tracker.toml`)
pub const TRACKER_CONFIG_FILE: &str = "tracker";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub gmail: GmailConfig,
    pub tracker: TrackerConfig,
    pub scheduler: SchedulerConfig,
    pub slack: Option<SlackConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SchedulerConfig {
    pub enabled: bool,
    pub schedule_times: Vec<String>, // Format: "HH:MM" (e.g., ["08:00", "18:00"])
}

#[derive(Debug, Deserialize, Clone)]
pub struct GmailConfig {
    pub credentials_path: String,
    pub token_cache_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SlackConfig {
    pub bot_token: String,
    pub channel_id: String,
}

/// What to search for and where to write it
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TrackerConfig {
    pub spreadsheet_id: String,
    pub sheet_name: String,
    pub sheet_id: i32,
    pub start_row: u32,
    pub keywords: Vec<String>,
    pub ats_domain: String,
    pub max_results: u32,
}

impl TrackerConfig {
    /// Defaults, then `tracker.toml` if present, then `TRACKER_*` variables
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Self::defaults()?
            .add_source(config::File::with_name(TRACKER_CONFIG_FILE).required(false))
            .add_source(
                config::Environment::with_prefix("TRACKER")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("keywords"),
            );
        Self::from_builder(builder)
    }

    /// Defaults overridden by an inline TOML document
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let builder = Self::defaults()?
            .add_source(config::File::from_str(toml, config::FileFormat::Toml));
        Self::from_builder(builder)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(config::Config::builder()
            .set_default("spreadsheet_id", "")?
            .set_default("sheet_name", "Sheet1")?
            .set_default("sheet_id", 0)?
            .set_default("start_row", 2)?
            .set_default(
                "keywords",
                vec![
                    "thank you for applying",
                    "thank you for your application",
                    "application received",
                    "your application",
                ],
            )?
            .set_default("ats_domain", "myworkday.com")?
            .set_default("max_results", 50)?)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let tracker: TrackerConfig = builder.build()?.try_deserialize()?;
        tracker.validate()?;
        Ok(tracker)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spreadsheet_id.trim().is_empty() {
            return Err(ConfigError::MissingEnvVar("TRACKER_SPREADSHEET_ID".to_string()));
        }
        if self.start_row == 0 {
            return Err(ConfigError::InvalidValue {
                key: "start_row".to_string(),
                message: "rows are 1-based".to_string(),
            });
        }
        if !(1..=500).contains(&self.max_results) {
            return Err(ConfigError::InvalidValue {
                key: "max_results".to_string(),
                message: format!("{} is outside 1..=500", self.max_results),
            });
        }
        if self.keywords.iter().all(|keyword| keyword.trim().is_empty()) {
            return Err(ConfigError::NoKeywords);
        }
        Ok(())
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        // Fail early with a helpful message when the basics are missing
        Self::check_required_env_vars()?;

        let tracker = TrackerConfig::load().context("Invalid tracker configuration")?;

        Ok(Config {
            gmail: GmailConfig {
                credentials_path: std::env::var("GMAIL_CREDENTIALS_PATH")
                    .context("GMAIL_CREDENTIALS_PATH must be set")?,
                token_cache_path: std::env::var("GMAIL_TOKEN_CACHE_PATH")
                    .unwrap_or_else(|_| "./gmail-token-cache.json".to_string()),
            },
            tracker,
            scheduler: SchedulerConfig {
                enabled: std::env::var("SCHEDULER_ENABLED")
                    .unwrap_or_else(|_| "false".to_string())
                    .parse()
                    .unwrap_or(false),
                schedule_times: std::env::var("SCHEDULER_TIMES")
                    .unwrap_or_else(|_| "08:00".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            slack: match (std::env::var("SLACK_BOT_TOKEN"), std::env::var("SLACK_CHANNEL_ID")) {
                (Ok(bot_token), Ok(channel_id)) => Some(SlackConfig {
                    bot_token,
                    channel_id,
                }),
                _ => {
                    log::warn!("SLACK_BOT_TOKEN or SLACK_CHANNEL_ID not set - Slack reports disabled");
                    None
                }
            },
        })
    }

    fn check_required_env_vars() -> Result<()> {
        let required_vars = ["GMAIL_CREDENTIALS_PATH"];

        let missing_vars: Vec<&str> = required_vars
            .iter()
            .filter(|var| std::env::var(var).is_err())
            .copied()
            .collect();

        if !missing_vars.is_empty() {
            return Err(ConfigError::MissingEnvVar(missing_vars.join(", "))).context(
                "💡 Create a .env file (cp .env.example .env) or export the variables:\n\
                 export GMAIL_CREDENTIALS_PATH=/path/to/client_credentials.json\n\
                 export TRACKER_SPREADSHEET_ID=<spreadsheet id>\n\
                 cargo run -- --dry-run",
            );
        }

        Ok(())
    }
}
