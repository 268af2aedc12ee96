//! HTTP client for the KOBIS endpoints
//!
//! This module handles all outbound requests, including:
//! - Building the HTTP client with a user agent and timeouts
//! - Form-encoded POSTs returning HTML bodies
//! - The form-encoded POST that negotiates a JSON body
//! - The optional fixed retry policy for network failures

use crate::config::Config;
use crate::transport::{Endpoint, FormFields};
use crate::{KobisError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use std::time::Duration;

const JSON_ACCEPT: &str = "application/json, text/javascript, */*; q=0.01";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The scraper configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &Config) -> std::result::Result<Client, reqwest::Error> {
    // Format: Name/Version
    let user_agent = format!("{}/{}", config.user_agent.name, config.user_agent.version);

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(config.http.timeout_secs))
        .connect_timeout(Duration::from_secs(config.http.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues requests against the configured site origin
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    origin: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl Transport {
    /// Creates a transport from configuration
    pub fn new(config: &Config) -> Result<Self> {
        let client = build_http_client(config)?;
        Ok(Self::with_client(client, config))
    }

    /// Creates a transport around an existing client
    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            origin: config.site.origin.trim_end_matches('/').to_string(),
            max_retries: config.http.max_retries,
            retry_delay: Duration::from_millis(config.http.retry_delay_ms),
        }
    }

    /// The site origin, without a trailing slash
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Prefixes a site-relative path with the origin
    pub fn absolute(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }

    /// POSTs form fields and returns the raw body
    ///
    /// The body is returned whatever the HTTP status; only failures to
    /// complete the exchange are errors.
    pub async fn post(&self, endpoint: Endpoint, form: &FormFields) -> Result<String> {
        let url = self.absolute(endpoint.path());
        self.send(endpoint, || self.client.post(&url).form(form.as_slice()))
            .await
    }

    /// POSTs form fields, asking for a JSON response body
    pub async fn post_json(&self, endpoint: Endpoint, form: &FormFields) -> Result<String> {
        let url = self.absolute(endpoint.path());

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_ACCEPT));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));

        self.send(endpoint, || {
            self.client
                .post(&url)
                .form(form.as_slice())
                .headers(headers.clone())
        })
        .await
    }

    /// Sends a request, retrying network failures up to `max_retries` times
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | Any HTTP status | Return body |
    /// | Connect/timeout/body error | Retry after fixed delay |
    /// | Retries exhausted | `KobisError::Transport` |
    async fn send<F>(&self, endpoint: Endpoint, build: F) -> Result<String>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            tracing::debug!("POST {} (attempt {})", endpoint, attempt + 1);

            match Self::exchange(build()).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        "Request to {} failed ({}), retrying in {:?}",
                        endpoint,
                        e,
                        self.retry_delay
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(source) => {
                    return Err(KobisError::Transport {
                        endpoint: endpoint.path().to_string(),
                        source,
                    })
                }
            }
        }
    }

    async fn exchange(request: RequestBuilder) -> std::result::Result<String, reqwest::Error> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Non-success status {} returned, keeping body", status);
        }
        response.text().await
    }
}
