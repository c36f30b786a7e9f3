use crate::error::{Result, ResolveError};
use reqwest::Client;
use reqwest::header::LOCATION;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Something that can turn a short link into the URL it redirects to.
///
/// Implementations must be idempotent: the same input always resolves to the
/// same target, which is what makes [`crate::CachedResolver`] sound.
#[allow(async_fn_in_trait)]
pub trait Resolve {
    async fn resolve(&self, url: &str) -> Result<String>;
}

/// Resolves short links with a single redirect lookup over HTTP.
pub struct HttpResolver {
    client: Client,
    timeout_secs: u64,
}

impl HttpResolver {
    pub fn new() -> Result<Self> {
        Self::with_timeout(10)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent("tripmap/0.1")
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs((timeout_secs / 2).max(1)))
            .tcp_keepalive(Duration::from_secs(60))
            // We want to see the 3xx itself, not whatever it points at.
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

impl Resolve for HttpResolver {
    async fn resolve(&self, url: &str) -> Result<String> {
        let request_url =
            Url::parse(url).map_err(|e| ResolveError::InvalidUrl(format!("{}: {}", url, e)))?;

        debug!("Resolving {}", url);
        let response = self.client.get(request_url.clone()).send().await?;

        let status = response.status();
        if !status.is_redirection() {
            return Err(ResolveError::NotRedirected {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ResolveError::MissingLocation(url.to_string()))?;

        // Location may be relative to the short link
        let target = request_url
            .join(location)
            .map_err(|e| ResolveError::InvalidUrl(format!("{}: {}", location, e)))?;

        debug!("  -> {}", target);
        Ok(target.to_string())
    }
}
