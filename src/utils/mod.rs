//! Shared helpers: upstream HTTP transport and URL handling

pub mod http_client;
pub mod url;

pub use http_client::{HttpPayload, HttpTransport, ReqwestTransport};
pub use url::UrlUtils;
