//! Concurrent retrieval and order-preserving merge of the block resources.
//!
//! All resources are fetched at once. The merge only succeeds when every
//! resource succeeds; the first failure aborts the whole run and nothing is
//! returned for the resources that did load.

mod source;

pub use source::*;

use std::sync::Arc;

use futures::future::try_join_all;
use reqwest::StatusCode;
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::models::Item;

/// Failure to retrieve or decode one resource.
///
/// Every variant names the locator that failed. The `Display` output is shown
/// to the user verbatim.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("request for {locator} failed: {source}")]
    Transport {
        locator: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {} fetching {locator}", .status.as_u16())]
    Status { locator: String, status: StatusCode },

    #[error("failed to read {locator}: {source}")]
    Io {
        locator: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed payload in {locator}: {source}")]
    Malformed {
        locator: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid locator {locator}: {reason}")]
    InvalidLocator { locator: String, reason: String },
}

impl RetrievalError {
    pub fn locator(&self) -> &str {
        match self {
            Self::Transport { locator, .. }
            | Self::Status { locator, .. }
            | Self::Io { locator, .. }
            | Self::Malformed { locator, .. }
            | Self::InvalidLocator { locator, .. } => locator,
        }
    }
}

/// Fetches a fixed, ordered list of resources and merges their items.
pub struct Aggregator {
    source: Arc<dyn ResourceSource>,
    locators: Vec<String>,
}

impl Aggregator {
    pub fn new(source: Arc<dyn ResourceSource>, locators: Vec<String>) -> Self {
        Self { source, locators }
    }

    /// Build an aggregator for the configured source and resource list.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let source: Arc<dyn ResourceSource> = if config.is_remote() {
            Arc::new(HttpSource::new(&config.source, config.request_timeout())?)
        } else {
            Arc::new(FileSource::new(&config.source))
        };
        Ok(Self::new(source, config.resources.clone()))
    }

    pub fn locators(&self) -> &[String] {
        &self.locators
    }

    /// Retrieve every resource concurrently and concatenate the items in resource order.
    ///
    /// Completion order of the individual fetches never affects the result.
    pub async fn aggregate(&self) -> Result<Vec<Item>, RetrievalError> {
        tracing::debug!(
            source = %self.source.describe(),
            resources = self.locators.len(),
            "fetching resources"
        );

        let fetches = self.locators.iter().map(|locator| {
            let source = Arc::clone(&self.source);
            async move {
                let items = source.fetch(locator).await?;
                tracing::debug!(locator = %locator, items = items.len(), "resource loaded");
                Ok::<_, RetrievalError>(items)
            }
        });

        let per_resource = try_join_all(fetches).await?;
        let items: Vec<Item> = per_resource.into_iter().flatten().collect();

        // Schedules assume one item per resource; a mismatch shifts every later block.
        if items.len() != self.locators.len() {
            tracing::warn!(
                resources = self.locators.len(),
                items = items.len(),
                "item count differs from resource count; block numbers may not line up"
            );
        }

        Ok(items)
    }
}
