//! In-memory transport and fixtures for service tests

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::cache::{DocumentCache, ResourceCache};
use crate::errors::{FetchError, FetchResult};
use crate::models::TokenRecord;
use crate::utils::{HttpPayload, HttpTransport};

use super::{DocumentFetcher, GraphResolver, ResourceFetcher};

#[derive(Clone)]
enum Canned {
    Body {
        body: Bytes,
        content_type: Option<String>,
    },
    Status(u16),
}

/// Serves canned responses and counts requests per URL
///
/// Unknown URLs fail like a refused connection. The highest number of
/// requests ever in progress at once is kept as `peak_in_flight`.
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<HashMap<String, Canned>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    requests: Arc<Mutex<HashMap<String, usize>>>,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

/// Decrements the in-flight count when a request ends or is cancelled
struct InFlight(Arc<AtomicUsize>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(self, url: &str, value: serde_json::Value) -> Self {
        self.with_response(url, value.to_string(), Some("application/json"))
    }

    pub fn with_body(self, url: &str, body: &str) -> Self {
        self.with_response(url, body.to_string(), None)
    }

    pub fn with_response(
        self,
        url: &str,
        body: impl Into<Bytes>,
        content_type: Option<&str>,
    ) -> Self {
        self.responses.lock().unwrap().insert(
            url.to_string(),
            Canned::Body {
                body: body.into(),
                content_type: content_type.map(str::to_string),
            },
        );
        self
    }

    pub fn with_status(self, url: &str, status: u16) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), Canned::Status(status));
        self
    }

    pub fn with_delay(self, url: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(url.to_string(), delay);
        self
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_requests(&self) -> usize {
        self.requests.lock().unwrap().values().sum()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(&self, url: &str) -> FetchResult<HttpPayload> {
        *self
            .requests
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_insert(0) += 1;

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);
        let _in_flight = InFlight(Arc::clone(&self.in_flight));

        let delay = self.delays.lock().unwrap().get(url).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let canned = self.responses.lock().unwrap().get(url).cloned();
        match canned {
            Some(Canned::Body { body, content_type }) => Ok(HttpPayload { body, content_type }),
            Some(Canned::Status(status)) => Err(FetchError::status(url, status)),
            None => Err(FetchError::transport(url, "connection refused")),
        }
    }
}

pub fn document_fetcher(transport: &MockTransport) -> DocumentFetcher {
    DocumentFetcher::new(
        Arc::new(transport.clone()),
        DocumentCache::new("documents", Duration::from_secs(3600), 64),
        Duration::from_secs(10),
    )
}

pub fn resource_fetcher(transport: &MockTransport) -> ResourceFetcher {
    ResourceFetcher::new(
        Arc::new(transport.clone()),
        ResourceCache::new("resources", Duration::from_secs(86400), 64),
        Duration::from_secs(10),
        "https://ipfs.io/ipfs/",
    )
}

pub fn resolver(transport: &MockTransport) -> GraphResolver {
    GraphResolver::new(document_fetcher(transport), 4)
}

pub fn token_json(name: &str, symbol: &str, address: &str) -> serde_json::Value {
    serde_json::json!({"name": name, "symbol": symbol, "address": address, "decimals": 8})
}

pub fn token_record(name: &str, symbol: &str, address: &str) -> TokenRecord {
    serde_json::from_value(token_json(name, symbol, address)).unwrap()
}
