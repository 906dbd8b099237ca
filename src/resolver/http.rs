use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::Url;
use tracing::debug;

use crate::error::ReadmeError;
use crate::resolver::{is_remote, Resolve};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Build the blocking client shared by README and image fetches. `None`
/// waits indefinitely.
pub fn build_client(timeout: Option<Duration>) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")
}

/// Fetch `url` and return the body, turning non-2xx responses into errors
pub fn get_bytes(client: &Client, url: &Url) -> Result<Vec<u8>> {
    debug!(%url, "GET");
    let response = client
        .get(url.clone())
        .send()
        .with_context(|| format!("Failed to request {}", url))?;

    let status = response.status();
    let body = response
        .bytes()
        .with_context(|| format!("Failed to read response body from {}", url))?;

    if !status.is_success() {
        return Err(ReadmeError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).trim().to_string(),
        }
        .into());
    }

    Ok(body.to_vec())
}

/// Resolves destinations over HTTP. Relative destinations are joined onto
/// the base URL, typically a repository's raw-content root.
#[derive(Debug, Clone)]
pub struct HttpResolver {
    client: Client,
    base: Option<Url>,
}

impl HttpResolver {
    pub fn new(client: Client) -> Self {
        Self { client, base: None }
    }

    pub fn with_base(client: Client, base: Url) -> Self {
        Self {
            client,
            base: Some(base),
        }
    }

    pub fn url_for(&self, destination: &str) -> Result<Url> {
        if is_remote(destination) {
            return Url::parse(destination)
                .with_context(|| format!("Invalid URL '{}'", destination));
        }

        let base = self
            .base
            .as_ref()
            .ok_or_else(|| ReadmeError::NoBaseLocation(destination.to_string()))?;
        base.join(destination.trim_start_matches('/'))
            .with_context(|| format!("Cannot join '{}' onto {}", destination, base))
    }
}

impl Resolve for HttpResolver {
    fn resolve(&self, destination: &str) -> Result<Vec<u8>> {
        let url = self.url_for(destination)?;
        get_bytes(&self.client, &url)
    }
}
