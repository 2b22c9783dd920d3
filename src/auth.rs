use anyhow::{Context, Result};
use google_gmail1::{hyper, hyper_rustls, oauth2};
use log::info;

use crate::config::GmailConfig;

pub type HttpsConnector = hyper_rustls::HttpsConnector<hyper::client::HttpConnector>;
pub type Authenticator = oauth2::authenticator::Authenticator<HttpsConnector>;

/// Installed-flow authenticator shared by the Gmail and Sheets hubs.
/// Tokens are cached on disk and refreshed by yup-oauth2.
pub async fn build_authenticator(config: &GmailConfig) -> Result<Authenticator> {
    info!("Loading OAuth2 client credentials from {}", config.credentials_path);

    let secret = oauth2::read_application_secret(&config.credentials_path)
        .await
        .context("Unable to read OAuth2 client credentials file")?;

    oauth2::InstalledFlowAuthenticator::builder(
        secret,
        oauth2::InstalledFlowReturnMethod::HTTPRedirect,
    )
    .persist_tokens_to_disk(&config.token_cache_path)
    .build()
    .await
    .context("Unable to create OAuth2 authenticator")
}

pub fn https_client() -> Result<hyper::Client<HttpsConnector>> {
    let connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()
        .context("Unable to load native TLS root certificates")?
        .https_or_http()
        .enable_http1()
        .build();

    Ok(hyper::Client::builder().build(connector))
}
