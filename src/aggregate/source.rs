//! Where block resources come from.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::RetrievalError;
use crate::config::ConfigError;
use crate::models::Item;

/// A store that can resolve a resource locator to its ordered item list.
///
/// Implementations must not retry: a single failure is reported as-is.
#[async_trait]
pub trait ResourceSource: Send + Sync {
    async fn fetch(&self, locator: &str) -> Result<Vec<Item>, RetrievalError>;

    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;
}

/// Decode a resource body. The payload must be a JSON array of item objects.
pub fn parse_items(locator: &str, body: &[u8]) -> Result<Vec<Item>, RetrievalError> {
    serde_json::from_slice(body).map_err(|source| RetrievalError::Malformed {
        locator: locator.to_string(),
        source,
    })
}

/// Fetches resources over HTTP relative to a base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: Url,
    client: Client,
}

impl HttpSource {
    /// Create a source rooted at `base_url`.
    ///
    /// Locators are joined onto the base as relative paths, so
    /// `http://host/festival` + `data/data1.json` resolves to
    /// `http://host/festival/data/data1.json`.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ConfigError> {
        let client = client_builder(timeout)
            .build()
            .map_err(|e| invalid_source(base_url, e))?;
        Self::with_client(base_url, client)
    }

    /// Create a source that sends requests through an existing client.
    pub fn with_client(base_url: &str, client: Client) -> Result<Self, ConfigError> {
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| invalid_source(base_url, e))?;
        Ok(Self { base_url, client })
    }

    fn url_for(&self, locator: &str) -> Result<Url, RetrievalError> {
        self.base_url
            .join(locator)
            .map_err(|e| RetrievalError::InvalidLocator {
                locator: locator.to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl ResourceSource for HttpSource {
    async fn fetch(&self, locator: &str) -> Result<Vec<Item>, RetrievalError> {
        let url = self.url_for(locator)?;
        let transport = |source| RetrievalError::Transport {
            locator: locator.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::Status {
                locator: locator.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        parse_items(locator, &body)
    }

    fn describe(&self) -> String {
        self.base_url.to_string()
    }
}

/// Client settings used by [`HttpSource::new`]. `None` never times out.
pub fn client_builder(timeout: Option<Duration>) -> reqwest::ClientBuilder {
    let builder = Client::builder();
    match timeout {
        Some(timeout) => builder.timeout(timeout),
        None => builder,
    }
}

fn invalid_source(value: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidValue {
        key: "source".to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Reads resources from files under a root directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ResourceSource for FileSource {
    async fn fetch(&self, locator: &str) -> Result<Vec<Item>, RetrievalError> {
        let path = self.root.join(locator);
        let body = tokio::fs::read(&path)
            .await
            .map_err(|source| RetrievalError::Io {
                locator: locator.to_string(),
                source,
            })?;
        parse_items(locator, &body)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
