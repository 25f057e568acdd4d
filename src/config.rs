//! Client configuration.

use std::time::Duration;

use crate::{ConfigError, PocketBase};

/// Total time allowed for a single request, body included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Time allowed to establish a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Environment variable read by [`ClientBuilder::from_env`].
pub const BASE_URL_ENV: &str = "POCKETBASE_URL";

/// Builds a [`PocketBase`] client with custom settings.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use pocketbase_users::PocketBase;
///
/// let pb = PocketBase::builder("https://pb.example.com/")
///     .timeout(Duration::from_secs(5))
///     .connect_timeout(Duration::from_secs(2))
///     .build()
///     .unwrap();
///
/// assert_eq!(pb.base_url(), "https://pb.example.com");
/// ```
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    base_url: String,
    timeout: Duration,
    connect_timeout: Duration,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Starts a builder with the default timeouts.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Starts a builder with the base URL taken from `POCKETBASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        std::env::var(BASE_URL_ENV)
            .map(|base_url| Self::new(&base_url))
            .map_err(|_| ConfigError::MissingEnv(BASE_URL_ENV))
    }

    /// Total time allowed for each request. Doesn't apply to realtime streams.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Time allowed to establish each connection.
    #[must_use]
    pub const fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Custom `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Validates the base URL and creates the client.
    pub fn build(self) -> Result<PocketBase, ConfigError> {
        let base_url = normalize_base_url(&self.base_url)?;

        tracing::debug!(%base_url, timeout = ?self.timeout, "Creating PocketBase client");

        Ok(PocketBase {
            base_url,
            reqwest_client: self.http_client(Some(self.timeout))?,
            stream_client: self.http_client(None)?,
        })
    }

    fn http_client(&self, timeout: Option<Duration>) -> Result<reqwest::Client, ConfigError> {
        let mut builder = reqwest::Client::builder().connect_timeout(self.connect_timeout);

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        Ok(builder.build()?)
    }
}

/// Checks that `base_url` is an absolute `http`/`https` URL and trims trailing slashes.
pub(crate) fn normalize_base_url(base_url: &str) -> Result<String, ConfigError> {
    let trimmed_url = base_url.trim().trim_end_matches('/');

    let parsed = reqwest::Url::parse(trimmed_url)
        .map_err(|error| ConfigError::InvalidBaseUrl(format!("{trimmed_url} ({error})")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl(trimmed_url.to_string()));
    }

    Ok(trimmed_url.to_string())
}
