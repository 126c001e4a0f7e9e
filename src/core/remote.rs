//! Remote file resolution with a live reachability check

use crate::core::vcs::PlatformTable;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

/// Errors resolving a remote descriptor URL
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("{url} responded with HTTP {status}")]
    NotFound { url: String, status: u16 },

    #[error("failed to reach {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Derives raw file URLs and confirms they exist
#[derive(Debug, Clone)]
pub struct RemoteResolver {
    client: Client,
    platforms: PlatformTable,
}

impl RemoteResolver {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            platforms: PlatformTable::default(),
        }
    }

    pub fn with_platforms(mut self, platforms: PlatformTable) -> Self {
        self.platforms = platforms;
        self
    }

    pub fn platforms(&self) -> &PlatformTable {
        &self.platforms
    }

    /// Map `url` to its raw file URL without touching the network
    pub fn raw_file_url(&self, url: &str) -> Result<Url, ResolveError> {
        let parsed = Url::parse(url.trim()).map_err(|e| ResolveError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        self.platforms
            .resolve_file(&parsed)
            .ok_or_else(|| ResolveError::InvalidUrl {
                url: url.to_string(),
                message: "not a file on a supported code hosting platform".to_string(),
            })
    }

    /// Resolve `url` to a raw file URL and check it with a GET.
    ///
    /// A 2xx answer returns the raw URL; any other status is `NotFound`;
    /// transport failures (DNS, refused connection, timeout) are `Network`.
    pub async fn resolve_file(&self, url: &str) -> Result<Url, ResolveError> {
        let raw = self.raw_file_url(url)?;
        info!("probing remote descriptor at {}", raw);

        let response = self
            .client
            .get(raw.clone())
            .send()
            .await
            .map_err(|source| ResolveError::Network {
                url: raw.to_string(),
                source,
            })?;

        let status = response.status();
        debug!("reachability check of {} answered {}", raw, status);
        if status.is_success() {
            Ok(raw)
        } else {
            Err(ResolveError::NotFound {
                url: raw.to_string(),
                status: status.as_u16(),
            })
        }
    }
}
