use anyhow::{Context, Result};
use log::{error, info};
use slack_morphism::prelude::*;

use crate::config::SlackConfig;
use crate::email::RunReport;

pub struct SlackNotifier {
    client: SlackClient<SlackClientHyperHttpsConnector>,
    token: SlackApiToken,
    channel_id: SlackChannelId,
}

impl SlackNotifier {
    pub fn new(config: &SlackConfig) -> Result<Self> {
        info!("Initializing Slack notifier");

        let client = SlackClient::new(SlackClientHyperHttpsConnector::new()?);
        let token = SlackApiToken::new(config.bot_token.clone().into());
        let channel_id = SlackChannelId::new(config.channel_id.clone());

        Ok(SlackNotifier {
            client,
            token,
            channel_id,
        })
    }

    pub async fn send_message(&self, text: &str) -> Result<()> {
        let post_chat_req = SlackApiChatPostMessageRequest::new(
            self.channel_id.clone(),
            SlackMessageContent::new().with_text(text.to_string()),
        );

        let session = self.client.open_session(&self.token);

        match session.chat_post_message(&post_chat_req).await {
            Ok(response) => {
                info!("✅ Slack message sent: {:?}", response.ts);
                Ok(())
            }
            Err(e) => {
                error!("❌ Unable to send Slack message: {}", e);
                Err(anyhow::anyhow!("Unable to send Slack message: {}", e))
            }
        }
    }

    /// Summary of one run, with the messages that need a re-run
    pub async fn notify_run_report(&self, report: &RunReport) -> Result<()> {
        self.send_message(&format_report(report))
            .await
            .context("Unable to send run report to Slack")
    }

    pub async fn notify_error(&self, error_message: &str) -> Result<()> {
        let message_text = format!(
            "❌ *Job application tracking failed*\n\n• Error: ```{}```",
            error_message
        );
        self.send_message(&message_text)
            .await
            .context("Unable to send error message to Slack")
    }
}

fn format_report(report: &RunReport) -> String {
    let mut text = format!("📋 *Job application tracking*\n\n• {}\n", report.summary());

    if !report.failures.is_empty() {
        text.push_str("• Skipped messages:\n");
        for (message_id, reason) in &report.failures {
            text.push_str(&format!("  - `{}`: {}\n", message_id, reason));
        }
    }

    text
}
