//! HTTP fetcher for downloading blocklists.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::BlocklistSource;
use crate::error::{HostblockError, Result};
use crate::extractor::{extract, DomainSet};
use crate::utils::format_count;

#[cfg(test)]
use mockall::automock;

const TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Maximum size per blocklist file (32 MB)
/// The larger unified hosts lists are a few MB, so this leaves ample margin
const MAX_BLOCKLIST_SIZE: usize = 32 * 1024 * 1024;

/// Anything that can turn a URL into raw blocklist text.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ListFetcher: Send + Sync {
    /// GET the URL and return the body, or a `Network` error.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Domains extracted from one successfully fetched source
#[derive(Debug)]
pub struct FetchResult {
    pub source: BlocklistSource,
    pub domains: DomainSet,
}

/// A source whose download failed; the run continues without it
#[derive(Debug)]
pub struct FetchFailure {
    pub source: BlocklistSource,
    pub error: HostblockError,
}

/// Outcome of fetching every resolved source in turn
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub fetched: Vec<FetchResult>,
    pub failed: Vec<FetchFailure>,
}

impl FetchOutcome {
    /// Union of all domains from successful sources
    pub fn domains(&self) -> DomainSet {
        self.fetched
            .iter()
            .flat_map(|r| r.domains.iter().cloned())
            .collect()
    }
}

/// Fetch and extract each source sequentially.
///
/// A failed URL is logged and recorded, never aborting the remaining ones.
pub async fn fetch_all<F: ListFetcher + ?Sized>(
    fetcher: &F,
    sources: &[BlocklistSource],
) -> FetchOutcome {
    let mut outcome = FetchOutcome::default();

    for source in sources {
        info!("Fetching {} list {}...", source.category, source.url);
        match fetcher.fetch(&source.url).await {
            Ok(body) => {
                let domains = extract(&body);
                info!(
                    "Fetched {} - {} domains",
                    source.url,
                    format_count(domains.len())
                );
                outcome.fetched.push(FetchResult {
                    source: source.clone(),
                    domains,
                });
            }
            Err(e) => {
                error!("Failed to download {}: {}", source.url, e);
                outcome.failed.push(FetchFailure {
                    source: source.clone(),
                    error: e,
                });
            }
        }
    }

    outcome
}

/// HTTP client for fetching lists
pub struct Fetcher {
    client: Client,
    max_size: usize,
}

impl Fetcher {
    /// Create a new fetcher with default settings
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(TIMEOUT_SECS))
    }

    /// Create a fetcher with a custom total request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS).min(timeout))
            .user_agent(format!("hostblock/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HostblockError::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            max_size: MAX_BLOCKLIST_SIZE,
        })
    }

    /// Override the per-list size cap
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    async fn get(&self, url: &str) -> std::result::Result<String, String> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > self.max_size as u64 {
                return Err(format!(
                    "Response too large: {} bytes (max: {} bytes)",
                    content_length, self.max_size
                ));
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| format!("Failed to read response body: {}", e))?;

        // Content-Length may be absent (chunked)
        if body.len() > self.max_size {
            return Err(format!(
                "Downloaded content too large: {} bytes (max: {} bytes)",
                body.len(),
                self.max_size
            ));
        }

        Ok(body)
    }
}

// Note: Default is intentionally not implemented for Fetcher
// because new() can fail and we want explicit error handling.

#[async_trait]
impl ListFetcher for Fetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.get(url).await.map_err(|reason| HostblockError::Network {
            url: url.to_string(),
            reason,
        })
    }
}
