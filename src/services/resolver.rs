//! Token list graph resolution
//!
//! Token lists may reference further token lists through their `lists`
//! field, so the registry describes a directed graph that can contain cycles.
//! [`GraphResolver`] searches that graph for the first token matching a key.
//!
//! # Traversal
//!
//! - Sibling lists (the registry roots, or the `lists` of one document) are
//!   explored concurrently; within one document tokens are scanned in
//!   declaration order and nested lists are only explored once the
//!   document's own tokens are exhausted.
//! - A URL is marked visited (atomic check-and-insert on a set shared by the
//!   whole call) before it is fetched, so cycles terminate and no list is
//!   fetched twice in one call.
//! - The first branch at any depth to produce a match wins. The remaining
//!   branch futures are dropped, which cancels their in-flight requests.
//! - In-flight document fetches per call are bounded by a semaphore. The
//!   permit covers the fetch only, never the recursion.
//!
//! Unavailable documents simply end their branch; only failures of the
//! traversal machinery itself are reported as errors.

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::collections::HashSet;
use std::sync::Mutex;
use tokio::sync::Semaphore;
use tracing::{debug, trace};

use crate::errors::{AppError, AppResult};
use crate::models::TokenRecord;
use crate::utils::UrlUtils;

use super::DocumentFetcher;

/// What a lookup is looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    /// The matching token record
    Metadata,
    /// The `logoURI` of the first matching token that has one
    Image,
}

/// Result of a successful resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Token(TokenRecord),
    LogoUrl(String),
}

impl Resolution {
    pub fn into_token(self) -> Option<TokenRecord> {
        match self {
            Self::Token(token) => Some(token),
            Self::LogoUrl(_) => None,
        }
    }

    pub fn into_logo_url(self) -> Option<String> {
        match self {
            Self::LogoUrl(url) => Some(url),
            Self::Token(_) => None,
        }
    }
}

/// Trimmed, lower-cased search key
#[derive(Debug, Clone, PartialEq, Eq)]
struct SearchKey(String);

impl SearchKey {
    fn normalize(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    fn as_str(&self) -> &str {
        &self.0
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn matches(&self, token: &TokenRecord) -> bool {
        token.matches_key(&self.0)
    }
}

#[derive(Clone)]
pub struct GraphResolver {
    fetcher: DocumentFetcher,
    max_concurrent_fetches: usize,
}

impl GraphResolver {
    pub fn new(fetcher: DocumentFetcher, max_concurrent_fetches: usize) -> Self {
        Self {
            fetcher,
            max_concurrent_fetches: max_concurrent_fetches.max(1),
        }
    }

    /// Resolve `search_key` against the graph reachable from `roots`
    pub async fn resolve(
        &self,
        search_key: &str,
        roots: &[String],
        mode: LookupMode,
    ) -> AppResult<Option<Resolution>> {
        match mode {
            LookupMode::Metadata => {
                self.resolve_with(search_key, roots, |token| {
                    Some(Resolution::Token(token.clone()))
                })
                .await
            }
            LookupMode::Image => {
                self.resolve_with(search_key, roots, |token| {
                    token.logo_uri.clone().map(Resolution::LogoUrl)
                })
                .await
            }
        }
    }

    /// Traverse the graph with a custom projection
    ///
    /// A matching token only satisfies the lookup when `project` returns
    /// `Some`; otherwise scanning continues.
    pub async fn resolve_with<T, P>(
        &self,
        search_key: &str,
        roots: &[String],
        project: P,
    ) -> AppResult<Option<T>>
    where
        T: Send + 'static,
        P: Fn(&TokenRecord) -> Option<T> + Send + Sync,
    {
        let key = SearchKey::normalize(search_key);
        if key.is_empty() {
            return Ok(None);
        }

        let traversal = Traversal {
            fetcher: &self.fetcher,
            key: &key,
            project: &project,
            visited: Mutex::new(HashSet::new()),
            permits: Semaphore::new(self.max_concurrent_fetches),
        };

        let result = traversal.explore(roots).await;
        debug!(
            "Resolved '{}' across {} token lists: {}",
            key.as_str(),
            traversal.visited_count(),
            match &result {
                Ok(Some(_)) => "match",
                Ok(None) => "no match",
                Err(_) => "error",
            }
        );
        result
    }

    pub fn fetcher(&self) -> &DocumentFetcher {
        &self.fetcher
    }
}

/// State of one top-level resolve call, shared by all of its branches
struct Traversal<'r, P> {
    fetcher: &'r DocumentFetcher,
    key: &'r SearchKey,
    project: &'r P,
    visited: Mutex<HashSet<String>>,
    permits: Semaphore,
}

impl<'r, T, P> Traversal<'r, P>
where
    T: Send + 'static,
    P: Fn(&TokenRecord) -> Option<T> + Send + Sync,
{
    /// Explore sibling lists concurrently; first match wins
    fn explore<'a>(&'a self, urls: &'a [String]) -> BoxFuture<'a, AppResult<Option<T>>> {
        async move {
            let mut branches: FuturesUnordered<_> =
                urls.iter().map(|url| self.visit(url)).collect();

            while let Some(outcome) = branches.next().await {
                if let Some(found) = outcome? {
                    return Ok(Some(found));
                }
            }
            Ok(None)
        }
        .boxed()
    }

    async fn visit(&self, url: &str) -> AppResult<Option<T>> {
        if !self.mark_visited(url)? {
            trace!("Skipping already visited token list: {}", UrlUtils::obfuscate_credentials(url));
            return Ok(None);
        }

        let document = {
            let _permit = self
                .permits
                .acquire()
                .await
                .map_err(|e| AppError::internal(format!("fetch limiter closed: {e}")))?;
            self.fetcher.fetch(url).await
        };
        let Some(document) = document else {
            return Ok(None);
        };

        let direct = document
            .tokens
            .iter()
            .filter(|token| self.key.matches(token))
            .find_map(|token| (self.project)(token));
        if direct.is_some() {
            trace!(
                "Match for '{}' in token list {}",
                self.key.as_str(),
                UrlUtils::obfuscate_credentials(url)
            );
            return Ok(direct);
        }

        let nested = document.nested_lists();
        if nested.is_empty() {
            return Ok(None);
        }
        self.explore(nested).await
    }

    /// Insert `url` into the visited set; `false` if it was already there
    fn mark_visited(&self, url: &str) -> AppResult<bool> {
        let mut visited = self
            .visited
            .lock()
            .map_err(|_| AppError::internal("visited set lock poisoned"))?;
        Ok(visited.insert(url.to_string()))
    }

    fn visited_count(&self) -> usize {
        self.visited.lock().map(|visited| visited.len()).unwrap_or_default()
    }
}
