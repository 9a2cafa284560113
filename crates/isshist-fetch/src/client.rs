//! HTTP transport for ISS requests.

use async_trait::async_trait;
use bytes::Bytes;
use isshist_types::TransportError;
use reqwest::Client;
use std::time::Duration;

/// Capability that performs one GET and returns the response body.
///
/// Implementations must not retry: the fetcher decides which requests are
/// retried and which abort the operation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues a GET for `url` and returns the raw body.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] for any non-success condition.
    async fn get(&self, url: &str) -> Result<Bytes, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn get(&self, url: &str) -> Result<Bytes, TransportError> {
        (**self).get(url).await
    }
}

/// Configuration for the ISS client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("isshist/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// reqwest-backed [`Transport`] with connection pooling.
#[derive(Debug, Clone)]
pub struct IssClient {
    client: Client,
    config: ClientConfig,
}

impl IssClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            // Pages are requested back to back on one host
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for IssClient {
    async fn get(&self, url: &str) -> Result<Bytes, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))
    }
}
