use crate::error::{Result, ScraperError};
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

const USER_AGENT: &str = "github-dependents-scraper/0.1.0";
const MAX_RETRIES: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// HTTP client for fetching dependents listing pages.
pub struct DependentsClient {
    client: Client,
}

impl DependentsClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(DependentsClient { client })
    }

    /// Fetch one listing page and return the raw HTML body.
    ///
    /// Server errors are retried a few times before giving up; any other
    /// non-success status fails the request immediately.
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        let mut retries = 0;

        loop {
            let response = self.client.get(url).send().await?;

            match response.status() {
                status if status.is_success() => {
                    return Ok(response.text().await?);
                }
                status if status.is_server_error() && retries < MAX_RETRIES => {
                    warn!(%url, %status, "server error, retrying in {} seconds", RETRY_DELAY.as_secs());
                    sleep(RETRY_DELAY).await;
                    retries += 1;
                }
                status => {
                    return Err(ScraperError::HttpStatus {
                        status,
                        url: url.to_string(),
                    });
                }
            }
        }
    }
}
