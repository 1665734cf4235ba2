//! Service layer
//!
//! Fetchers own the caches and the transport; the resolver drives the
//! document fetcher across the token list graph; the lookup service is what
//! the web handlers talk to.

pub mod document_fetcher;
pub mod lookup;
pub mod resolver;
pub mod resource_fetcher;

#[cfg(test)]
pub(crate) mod test_support;

pub use document_fetcher::DocumentFetcher;
pub use lookup::{
    CacheReport, HealthReport, ListSummary, ListView, LookupOutcome, TokenLookupService,
};
pub use resolver::{GraphResolver, LookupMode, Resolution};
pub use resource_fetcher::ResourceFetcher;
