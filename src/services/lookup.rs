//! Token lookup service
//!
//! Boundary between the HTTP layer and the resolver. Turns a raw request
//! identifier into a [`LookupOutcome`] the handlers map to a status code,
//! and serves the registry overview, single list and health views.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::cache::{CacheStats, DocumentCache, ResourceCache};
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::{ImageResource, TokenListDocument, TokenRecord};
use crate::registry::TokenListRegistry;
use crate::utils::{HttpTransport, UrlUtils};

use super::{DocumentFetcher, GraphResolver, LookupMode, Resolution, ResourceFetcher};

/// Result of a lookup that did not fail internally
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome<T> {
    Found(T),
    /// No reachable token matched
    NotFound,
    /// The request carried no usable identifier
    MissingIdentifier,
    /// A token matched but its logo could not be downloaded
    Unavailable { url: String },
}

impl<T> LookupOutcome<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            _ => None,
        }
    }
}

/// One root list as shown in the registry overview
#[derive(Debug, Clone, Serialize)]
pub struct ListSummary {
    pub url: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_name: Option<String>,
    #[serde(rename = "logoURI", skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
    pub token_count: usize,
    pub nested_list_count: usize,
}

/// A registered root list with its fetched document
#[derive(Debug, Clone, Serialize)]
pub struct ListView {
    pub url: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    pub document: Arc<TokenListDocument>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheReport {
    pub documents: CacheStats,
    pub resources: CacheStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
    pub registry_size: usize,
    pub caches: CacheReport,
}

#[derive(Clone)]
pub struct TokenLookupService {
    registry: Arc<TokenListRegistry>,
    resolver: GraphResolver,
    resources: ResourceFetcher,
}

impl TokenLookupService {
    pub fn new(
        registry: Arc<TokenListRegistry>,
        resolver: GraphResolver,
        resources: ResourceFetcher,
    ) -> Self {
        Self {
            registry,
            resolver,
            resources,
        }
    }

    /// Wire caches, fetchers and resolver from configuration
    pub fn from_config(
        config: &Config,
        registry: Arc<TokenListRegistry>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let documents = DocumentFetcher::new(
            Arc::clone(&transport),
            DocumentCache::new("documents", config.cache.document_ttl, config.cache.max_documents),
            config.fetch.document_timeout,
        );
        let resources = ResourceFetcher::new(
            transport,
            ResourceCache::new("resources", config.cache.resource_ttl, config.cache.max_resources),
            config.fetch.resource_timeout,
            config.fetch.ipfs_gateway.clone(),
        );
        let resolver = GraphResolver::new(documents, config.fetch.max_concurrent_fetches);

        Self::new(registry, resolver, resources)
    }

    /// Metadata for the token identified by `identifier`
    ///
    /// Only an empty identifier is missing. A blank one is searched like any
    /// other key and matches nothing.
    pub async fn token_info(&self, identifier: &str) -> AppResult<LookupOutcome<TokenRecord>> {
        if identifier.is_empty() {
            return Ok(LookupOutcome::MissingIdentifier);
        }

        let token = self
            .resolver
            .resolve(identifier, self.registry.root_urls(), LookupMode::Metadata)
            .await?
            .and_then(Resolution::into_token);

        Ok(match token {
            Some(token) => {
                debug!("Token info for '{}': {} ({})", identifier.trim(), token.name, token.symbol);
                LookupOutcome::Found(token)
            }
            None => {
                info!("No token matches '{}'", identifier.trim());
                LookupOutcome::NotFound
            }
        })
    }

    /// Logo image for the token named by an image request path
    ///
    /// A trailing image extension on the path is ignored, so `btkn1abc.png`
    /// looks up `btkn1abc`.
    pub async fn token_image(&self, path: &str) -> AppResult<LookupOutcome<ImageResource>> {
        let identifier = UrlUtils::strip_image_extension(path);
        if identifier.is_empty() {
            return Ok(LookupOutcome::MissingIdentifier);
        }

        let Some(logo_url) = self
            .resolver
            .resolve(identifier, self.registry.root_urls(), LookupMode::Image)
            .await?
            .and_then(Resolution::into_logo_url)
        else {
            info!("No token logo matches '{}'", identifier.trim());
            return Ok(LookupOutcome::NotFound);
        };

        Ok(match self.resources.fetch(&logo_url).await {
            Some(image) => LookupOutcome::Found(image),
            None => LookupOutcome::Unavailable { url: logo_url },
        })
    }

    /// Every registered root with the state of its document
    pub async fn list_overview(&self) -> Vec<ListSummary> {
        let fetcher = self.resolver.fetcher();
        let summaries = self.registry.iter().map(|(url, entry)| async move {
            let document = fetcher.fetch(url).await;
            ListSummary {
                url: url.clone(),
                name: entry.name.clone(),
                homepage: entry.homepage.clone(),
                available: document.is_some(),
                list_name: document.as_ref().map(|d| d.name.clone()),
                logo_uri: document.as_ref().and_then(|d| d.logo_uri.clone()),
                token_count: document.as_ref().map_or(0, |d| d.tokens.len()),
                nested_list_count: document.as_ref().map_or(0, |d| d.nested_lists().len()),
            }
        });
        join_all(summaries).await
    }

    /// Document of one registered root list
    pub async fn list_view(&self, url: &str) -> LookupOutcome<ListView> {
        let url = url.trim();
        if url.is_empty() {
            return LookupOutcome::MissingIdentifier;
        }
        let Some(entry) = self.registry.get(url) else {
            return LookupOutcome::NotFound;
        };

        match self.resolver.fetcher().fetch(url).await {
            Some(document) => LookupOutcome::Found(ListView {
                url: url.to_string(),
                name: entry.name.clone(),
                homepage: entry.homepage.clone(),
                document,
            }),
            None => LookupOutcome::Unavailable {
                url: url.to_string(),
            },
        }
    }

    pub async fn health(&self) -> HealthReport {
        HealthReport {
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
            timestamp: Utc::now(),
            registry_size: self.registry.len(),
            caches: CacheReport {
                documents: self.resolver.fetcher().cache().stats().await,
                resources: self.resources.cache().stats().await,
            },
        }
    }
}
