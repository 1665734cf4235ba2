//! Logo image fetching
//!
//! Downloads the image behind a resolved `logoURI` and caches the bytes with
//! their content type. Failures are not cached: a logo host that is down is
//! asked again on the next request.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::cache::ResourceCache;
use crate::errors::{FetchError, FetchResult};
use crate::models::ImageResource;
use crate::utils::{HttpPayload, HttpTransport, UrlUtils};

const DEFAULT_IMAGE_TYPE: &str = "image/png";

#[derive(Clone)]
pub struct ResourceFetcher {
    transport: Arc<dyn HttpTransport>,
    cache: ResourceCache,
    timeout: Duration,
    ipfs_gateway: String,
}

impl ResourceFetcher {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        cache: ResourceCache,
        timeout: Duration,
        ipfs_gateway: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            cache,
            timeout,
            ipfs_gateway: ipfs_gateway.into(),
        }
    }

    /// Image bytes and content type for `url`, or `None` if it is unavailable
    pub async fn fetch(&self, url: &str) -> Option<ImageResource> {
        if let Some(image) = self.cache.get(url).await {
            debug!("Logo cache hit: {}", UrlUtils::obfuscate_credentials(url));
            return Some(image);
        }

        match self.download(url).await {
            Ok(payload) => {
                let content_type = Self::content_type_for(url, payload.content_type.as_deref());
                let image = ImageResource::new(payload.body, content_type);
                debug!(
                    "Cached logo {} ({} bytes, {})",
                    UrlUtils::obfuscate_credentials(url),
                    image.len(),
                    image.content_type
                );
                self.cache.put(url, image.clone()).await;
                Some(image)
            }
            Err(e) => {
                warn!(
                    "Logo unavailable: {}",
                    UrlUtils::obfuscate_credentials(&e.to_string())
                );
                None
            }
        }
    }

    async fn download(&self, url: &str) -> FetchResult<HttpPayload> {
        let target = UrlUtils::resolve_ipfs(url, &self.ipfs_gateway);
        tokio::time::timeout(self.timeout, self.transport.get(&target))
            .await
            .map_err(|_| FetchError::timeout(&target))?
    }

    /// Declared type when it is an image type, otherwise inferred from the URL
    pub fn content_type_for(url: &str, declared: Option<&str>) -> String {
        if let Some(declared) = declared.map(str::trim)
            && declared.to_ascii_lowercase().starts_with("image/")
        {
            return declared.to_string();
        }

        let inferred = match UrlUtils::path_extension(url).as_deref() {
            Some("svg") => "image/svg+xml",
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => DEFAULT_IMAGE_TYPE,
        };
        inferred.to_string()
    }

    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{MockTransport, resource_fetcher};
    use rstest::rstest;

    const LOGO: &str = "https://img.example/foo.svg";

    #[rstest]
    #[case("https://img.example/a.png", Some("image/webp"), "image/webp")]
    #[case("https://img.example/a.svg", Some("text/plain"), "image/svg+xml")]
    #[case("https://img.example/a.JPG", None, "image/jpeg")]
    #[case("https://img.example/a.jpeg?size=64", Some("application/octet-stream"), "image/jpeg")]
    #[case("https://img.example/a.gif", None, "image/gif")]
    #[case("https://img.example/a.webp", None, "image/webp")]
    #[case("https://img.example/a", None, "image/png")]
    #[case("https://img.example/a.bmp", Some("binary/octet-stream"), "image/png")]
    fn test_content_type_for(
        #[case] url: &str,
        #[case] declared: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(ResourceFetcher::content_type_for(url, declared), expected);
    }

    #[tokio::test]
    async fn test_fetch_caches_successful_download() {
        let transport = MockTransport::new().with_response(LOGO, "<svg/>", Some("text/xml"));
        let fetcher = resource_fetcher(&transport);

        let image = fetcher.fetch(LOGO).await.unwrap();
        assert_eq!(image.content_type, "image/svg+xml");
        assert_eq!(&image.bytes[..], b"<svg/>");

        assert_eq!(fetcher.fetch(LOGO).await, Some(image));
        assert_eq!(transport.request_count(LOGO), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let transport = MockTransport::new().with_status(LOGO, 404);
        let fetcher = resource_fetcher(&transport);

        assert!(fetcher.fetch(LOGO).await.is_none());
        assert!(fetcher.fetch(LOGO).await.is_none());
        assert_eq!(transport.request_count(LOGO), 2);
        assert_eq!(fetcher.cache().stats().await.entries, 0);
    }

    #[tokio::test]
    async fn test_ipfs_uri_is_fetched_through_gateway() {
        let gateway_url = "https://ipfs.io/ipfs/bafycid/logo.png";
        let transport =
            MockTransport::new().with_response(gateway_url, vec![0x89, b'P', b'N', b'G'], Some("image/png"));
        let fetcher = resource_fetcher(&transport);

        let image = fetcher.fetch("ipfs://bafycid/logo.png").await.unwrap();
        assert_eq!(image.content_type, "image/png");
        assert_eq!(transport.request_count(gateway_url), 1);
    }
}
