// src/wiktionary/client.rs
use crate::config::FetchConfig;
use crate::utils::error::FetchError;
use reqwest::header;

/// Source of raw entry markup for a character.
#[allow(async_fn_in_trait)]
pub trait DocumentFetcher {
    /// Returns the page markup, or a `FetchError` for any network or non-2xx failure.
    async fn fetch(&self, character: &str) -> Result<String, FetchError>;

    /// Where the page for `character` lives, for logs and saved metadata.
    fn source_url(&self, character: &str) -> String;
}

/// Fetches entry pages over HTTP.
pub struct WiktionaryClient {
    client: reqwest::Client,
    config: FetchConfig,
}

impl WiktionaryClient {
    /// Creates a reqwest client configured with the identification header and timeout.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?; // Propagate client build error if any

        Ok(Self { client, config })
    }
}

impl DocumentFetcher for WiktionaryClient {
    async fn fetch(&self, character: &str) -> Result<String, FetchError> {
        let url = self.config.page_url(character);

        tracing::info!("Downloading entry page from: {}", url);
        tracing::debug!("Using User-Agent: {}", self.config.user_agent);

        let response = self.client.get(&url)
            .header(header::ACCEPT, "text/html,application/xhtml+xml,*/*")
            .send()
            .await?; // Propagates reqwest::Error as FetchError::Network

        let status = response.status();
        if !status.is_success() {
            tracing::error!("HTTP error status: {} for URL: {}", status, url);
            return Err(classify_status(status, &url));
        }

        let body = response.text().await?;
        tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);

        Ok(body)
    }

    fn source_url(&self, character: &str) -> String {
        self.config.page_url(character)
    }
}

/// Maps a non-2xx status to the matching fetch failure.
fn classify_status(status: reqwest::StatusCode, url: &str) -> FetchError {
    match status {
        reqwest::StatusCode::NOT_FOUND => {
            tracing::warn!("Received 404 Not Found for URL: {}", url);
            FetchError::PageNotFound(url.to_string())
        }
        reqwest::StatusCode::FORBIDDEN | reqwest::StatusCode::TOO_MANY_REQUESTS => {
            tracing::warn!("Received {} - check User-Agent and request rate.", status);
            FetchError::RateLimited(status)
        }
        _ => FetchError::Http(status),
    }
}
