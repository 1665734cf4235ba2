use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, header::CONTENT_TYPE};
use std::time::Duration;
use tracing::debug;

use crate::errors::{AppResult, FetchError, FetchResult};
use crate::utils::url::UrlUtils;

/// A successful upstream response body
#[derive(Debug, Clone)]
pub struct HttpPayload {
    pub body: Bytes,
    /// Declared `Content-Type`, if any
    pub content_type: Option<String>,
}

/// Minimal GET transport used by the document and resource fetchers
///
/// Non-success statuses are reported as [`FetchError::Status`]; callers only
/// ever see bodies of successful responses.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str) -> FetchResult<HttpPayload>;
}

/// Default implementation of HttpTransport using reqwest
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport whose requests give up after `timeout`
    pub fn new(timeout: Duration, user_agent: &str) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }

    fn map_send_error(url: &str, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::timeout(url)
        } else {
            FetchError::transport(url, UrlUtils::obfuscate_credentials(&error.to_string()))
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> FetchResult<HttpPayload> {
        debug!("Fetching {}", UrlUtils::obfuscate_credentials(url));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::map_send_error(url, e))?;

        if !response.status().is_success() {
            return Err(FetchError::status(url, response.status().as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| Self::map_send_error(url, e))?;

        debug!(
            "Fetched {} bytes from {}",
            body.len(),
            UrlUtils::obfuscate_credentials(url)
        );

        Ok(HttpPayload { body, content_type })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::header, routing::get};

    async fn spawn_upstream() -> String {
        let app = Router::new()
            .route(
                "/list.json",
                get(|| async { ([(header::CONTENT_TYPE, "application/json")], r#"{"name":"L1","tokens":[]}"#) }),
            )
            .route(
                "/slow.json",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_get_returns_body_and_content_type() {
        let base = spawn_upstream().await;
        let transport = ReqwestTransport::new(Duration::from_secs(5), "btkn-info-test").unwrap();

        let payload = transport.get(&format!("{base}/list.json")).await.unwrap();
        assert_eq!(payload.content_type.as_deref(), Some("application/json"));
        assert_eq!(&payload.body[..], br#"{"name":"L1","tokens":[]}"#);
    }

    #[tokio::test]
    async fn test_get_maps_status_and_timeout() {
        let base = spawn_upstream().await;
        let transport = ReqwestTransport::new(Duration::from_millis(200), "btkn-info-test").unwrap();

        let missing = format!("{base}/missing.json");
        assert_eq!(
            transport.get(&missing).await.unwrap_err(),
            FetchError::status(missing.clone(), 404)
        );

        let slow = format!("{base}/slow.json");
        assert_eq!(
            transport.get(&slow).await.unwrap_err(),
            FetchError::timeout(slow.clone())
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = ReqwestTransport::new(Duration::from_secs(2), "btkn-info-test").unwrap();
        let error = transport
            .get(&format!("http://{addr}/list.json"))
            .await
            .unwrap_err();
        assert!(matches!(error, FetchError::Transport { .. }));
    }
}
