use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::collections::HashSet;

use crate::auth::build_authenticator;
use crate::config::{Config, TrackerConfig};
use crate::email::{build_search_query, ExtractedRecord, RunReport};
use crate::extraction::{extract_record, CompanyExtractor, Extraction};
use crate::gmail_client::GmailClient;
use crate::sheet::row::application_key;
use crate::sheet::{SheetRow, SheetTarget, SheetWriter};
use crate::sheets_client::SheetsClient;
use crate::slack_notifier::SlackNotifier;
use crate::store::{MailStore, TabularStore};

/// Mailbox scan → extraction → one sheet append
pub struct JobTracker {
    config: TrackerConfig,
    extractor: CompanyExtractor,
    mail: Box<dyn MailStore>,
    sheet: Box<dyn TabularStore>,
    slack: Option<SlackNotifier>,
}

impl JobTracker {
    /// Authenticate once and build the Gmail and Sheets clients
    pub async fn connect(config: &Config, dry_run: bool) -> Result<Self> {
        info!("Initializing job application tracker");

        let auth = build_authenticator(&config.gmail)
            .await
            .context("Unable to authenticate with Google")?;

        let gmail = GmailClient::new(auth.clone())?;
        let sheets = SheetsClient::new(auth)?;

        let slack = match (&config.slack, dry_run) {
            (Some(slack_config), false) => match SlackNotifier::new(slack_config) {
                Ok(notifier) => {
                    info!("✅ Slack reports enabled");
                    Some(notifier)
                }
                Err(e) => {
                    warn!("⚠️  Unable to initialize Slack notifier: {} - reports disabled", e);
                    None
                }
            },
            _ => None,
        };

        Ok(Self::with_stores(config.tracker.clone(), Box::new(gmail), Box::new(sheets)).with_slack(slack))
    }

    pub fn with_stores(
        config: TrackerConfig,
        mail: Box<dyn MailStore>,
        sheet: Box<dyn TabularStore>,
    ) -> Self {
        let extractor = CompanyExtractor::new(&config.ats_domain);
        JobTracker {
            config,
            extractor,
            mail,
            sheet,
            slack: None,
        }
    }

    pub fn with_slack(mut self, slack: Option<SlackNotifier>) -> Self {
        self.slack = slack;
        self
    }

    /// Scan, extract and append. Records that cannot be dated are skipped
    /// and listed in the report; a failed append fails the run.
    pub async fn run(&self, limit: Option<u32>) -> Result<RunReport> {
        info!("Starting job application scan");

        let mut report = RunReport::new();
        let records = self.collect_records(limit, &mut report).await?;

        if records.is_empty() {
            info!("No new application to record");
            self.report(&report).await;
            return Ok(report);
        }

        let writer = SheetWriter::new(self.sheet.as_ref(), SheetTarget::from_config(&self.config));
        match writer.append(&records).await {
            Ok(appended) => {
                report.start_row = appended.start_row;
                report.duplicates += appended.already_recorded;
                info!("Run completed: {}", report.summary());
                self.report(&report).await;
                Ok(report)
            }
            Err(e) => {
                error!("❌ Append failed: {} ({})", e, report.summary());
                if let Some(slack) = &self.slack {
                    if let Err(slack_error) = slack.notify_error(&e.to_string()).await {
                        warn!("⚠️  {}", slack_error);
                    }
                }
                Err(e).context("Unable to append records to the spreadsheet")
            }
        }
    }

    /// Same scan as [`run`](Self::run) but prints the rows instead of writing them
    pub async fn run_dry(&self, limit: Option<u32>) -> Result<RunReport> {
        println!("\n{}", "=".repeat(80));
        println!("🧪 MODE DRY-RUN - JOB APPLICATION SCAN");
        println!("{}", "=".repeat(80));

        let mut report = RunReport::new();
        let records = self.collect_records(limit, &mut report).await?;

        if records.is_empty() {
            println!("❌ No application found to record");
        } else {
            println!("✅ {} row(s) would be appended:\n", records.len());
            for record in &records {
                let row = SheetRow::from_record(record);
                println!("   📧 {} | {}", record.message_id, row.cells().join(" | "));
            }
        }

        for (message_id, reason) in &report.failures {
            println!("⚠️  Skipped {}: {}", message_id, reason);
        }

        println!("{}", "=".repeat(80));
        println!("🏁 {}", report.summary());
        println!("{}", "=".repeat(80));

        Ok(report)
    }

    /// Oldest-first extraction of every candidate message
    pub async fn collect_records(
        &self,
        limit: Option<u32>,
        report: &mut RunReport,
    ) -> Result<Vec<ExtractedRecord>> {
        let query = build_search_query(&self.config.keywords)?;
        let max_results = match limit {
            Some(limit) => self.config.max_results.min(limit.max(1)),
            None => self.config.max_results,
        };

        let mut message_ids = self
            .mail
            .search(&query, max_results)
            .await
            .context("Error searching for emails")?;
        report.candidates = message_ids.len();

        if message_ids.is_empty() {
            info!("No email matches {}", query);
            return Ok(Vec::new());
        }

        // The store lists newest first; rows must be chronological
        message_ids.reverse();

        let mut records = Vec::new();
        let mut seen = HashSet::new();

        for message_id in &message_ids {
            let message = match self.mail.fetch_full(message_id).await {
                Ok(message) => message,
                Err(e) => {
                    error!("Unable to fetch email {}: {:#}", message_id, e);
                    report.failure(message_id, format!("{:#}", e));
                    continue;
                }
            };
            report.fetched += 1;

            match extract_record(&self.extractor, &message) {
                Ok(Extraction::Accepted(record)) => {
                    let key = application_key(&record.company_name, &record.date_applied);
                    if !seen.insert(key) {
                        debug!("Duplicate application {} on {}, skipped", record.company_name, record.date_applied);
                        report.duplicates += 1;
                        continue;
                    }
                    debug!("Email {}: {} on {}", message_id, record.company_name, record.date_applied);
                    records.push(record);
                }
                Ok(Extraction::UnknownCompany) => {
                    debug!("Email {} ('{}'): no company found", message_id, message.subject());
                    report.unknown_company += 1;
                }
                Err(e) => {
                    error!("Email {} skipped: {}", message_id, e);
                    report.failure(message_id, e);
                }
            }
        }

        report.accepted = records.len();
        Ok(records)
    }

    async fn report(&self, report: &RunReport) {
        if let Some(slack) = &self.slack {
            if let Err(e) = slack.notify_run_report(report).await {
                warn!("⚠️  {}", e);
            }
        }
    }
}
