use anyhow::{Context, Result};
use base64::Engine as _;
use futures::future::BoxFuture;
use google_gmail1::api::{MessagePart, Scope};
use google_gmail1::Gmail;
use log::{debug, info};

use crate::auth::{https_client, Authenticator, HttpsConnector};
use crate::email::{BodyPart, RawMessage};
use crate::store::MailStore;

const USER_ID: &str = "me";

pub struct GmailClient {
    hub: Gmail<HttpsConnector>,
}

impl GmailClient {
    pub fn new(auth: Authenticator) -> Result<Self> {
        info!("Connecting to Gmail API via OAuth2");

        let hub = Gmail::new(https_client()?, auth);
        Ok(GmailClient { hub })
    }

    pub async fn search_messages(&self, query: &str, limit: u32) -> Result<Vec<String>> {
        debug!("Search criteria: {} (max {})", query, limit);

        let result = self
            .hub
            .users()
            .messages_list(USER_ID)
            .q(query)
            .max_results(limit)
            .add_scope(Scope::Readonly)
            .doit()
            .await
            .context("Error searching for emails")?;

        let message_ids: Vec<String> = result
            .1
            .messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|msg| msg.id)
            .collect();

        info!("Found {} candidate email(s)", message_ids.len());

        Ok(message_ids)
    }

    pub async fn fetch_message_full(&self, message_id: &str) -> Result<RawMessage> {
        debug!("Complete email retrieval for ID: {}", message_id);

        let (_, message) = self
            .hub
            .users()
            .messages_get(USER_ID, message_id)
            .format("full")
            .add_scope(Scope::Readonly)
            .doit()
            .await
            .with_context(|| format!("Unable to retrieve email {}", message_id))?;

        let mut payload = message
            .payload
            .with_context(|| format!("No payload in email {}", message_id))?;

        let headers = payload
            .headers
            .take()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|header| match (header.name, header.value) {
                (Some(name), Some(value)) => Some((name, value)),
                _ => None,
            })
            .collect();

        Ok(RawMessage::new(message_id, headers, body_part_from_gmail(payload)))
    }
}

/// Convert a Gmail payload into the body tree.
///
/// google-gmail1 hands back decoded body bytes; leaves carry them re-encoded
/// as base64url, the form the REST API delivers.
pub fn body_part_from_gmail(part: MessagePart) -> BodyPart {
    let mime_type = part.mime_type.unwrap_or_default();

    match part.parts {
        Some(children) if !children.is_empty() => BodyPart::branch(
            mime_type,
            children.into_iter().map(body_part_from_gmail).collect(),
        ),
        _ => {
            let data = part
                .body
                .and_then(|body| body.data)
                .map(|bytes| base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes));
            BodyPart::leaf(mime_type, data)
        }
    }
}

impl MailStore for GmailClient {
    fn search<'a>(&'a self, query: &'a str, limit: u32) -> BoxFuture<'a, Result<Vec<String>>> {
        Box::pin(self.search_messages(query, limit))
    }

    fn fetch_full<'a>(&'a self, message_id: &'a str) -> BoxFuture<'a, Result<RawMessage>> {
        Box::pin(self.fetch_message_full(message_id))
    }
}
