//! Token list document fetching
//!
//! Retrieves one token list, validates its shape and records the outcome in
//! the [`DocumentCache`]. Every failure (network, status, timeout, parse,
//! shape) is logged and collapsed into `None`, and remembered as a negative
//! entry so a broken list is not re-requested within the freshness window.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::cache::{DocumentCache, DocumentEntry};
use crate::errors::{FetchError, FetchResult};
use crate::models::TokenListDocument;
use crate::utils::{HttpTransport, UrlUtils};

#[derive(Clone)]
pub struct DocumentFetcher {
    transport: Arc<dyn HttpTransport>,
    cache: DocumentCache,
    timeout: Duration,
}

impl DocumentFetcher {
    pub fn new(transport: Arc<dyn HttpTransport>, cache: DocumentCache, timeout: Duration) -> Self {
        Self {
            transport,
            cache,
            timeout,
        }
    }

    /// Validated document at `url`, or `None` if it is unavailable
    pub async fn fetch(&self, url: &str) -> Option<Arc<TokenListDocument>> {
        if let Some(entry) = self.cache.get(url).await {
            debug!(
                "Token list cache hit: {} ({})",
                UrlUtils::obfuscate_credentials(url),
                if entry.document().is_some() { "available" } else { "unavailable" }
            );
            return entry.document();
        }

        match self.load(url).await {
            Ok(document) => {
                let document = Arc::new(document);
                debug!(
                    "Loaded token list '{}' from {} ({} tokens, {} nested lists)",
                    document.name,
                    UrlUtils::obfuscate_credentials(url),
                    document.tokens.len(),
                    document.nested_lists().len()
                );
                self.cache
                    .put(url, DocumentEntry::Available(Arc::clone(&document)))
                    .await;
                Some(document)
            }
            Err(e) => {
                warn!(
                    "Token list unavailable: {}",
                    UrlUtils::obfuscate_credentials(&e.to_string())
                );
                self.cache.put(url, DocumentEntry::Unavailable).await;
                None
            }
        }
    }

    async fn load(&self, url: &str) -> FetchResult<TokenListDocument> {
        let payload = tokio::time::timeout(self.timeout, self.transport.get(url))
            .await
            .map_err(|_| FetchError::timeout(url))??;

        Self::parse_document(url, &payload.body)
    }

    /// Parse and shape-check a token list body
    pub fn parse_document(url: &str, body: &[u8]) -> FetchResult<TokenListDocument> {
        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|e| FetchError::parse(url, e.to_string()))?;

        serde_json::from_value(value).map_err(|e| FetchError::validation(url, e.to_string()))
    }

    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }
}
