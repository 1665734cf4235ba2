//! Response builders for the lookup endpoints
//!
//! Every lookup response carries the CORS headers and a `Cache-Control`
//! chosen by outcome. Error responses have an empty body.

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Serialize;
use tracing::error;

pub const TOKEN_IDENTIFIER_HEADER: &str = "x-token-identifier";

const ALLOW_ORIGIN: &str = "*";
const ALLOW_METHODS: &str = "GET, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type";
const PREFLIGHT_MAX_AGE: &str = "86400";

/// `Cache-Control` policy by lookup outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// 24h, plus 12h stale-while-revalidate
    Found,
    /// 5 minutes
    NotFound,
    /// 1 minute: missing identifier, upstream and internal failures
    Error,
    /// 5 minutes, for registry listings that change when upstream lists do
    Listing,
}

impl CachePolicy {
    pub fn header_value(self) -> HeaderValue {
        HeaderValue::from_static(match self {
            Self::Found => "public, max-age=86400, stale-while-revalidate=43200",
            Self::NotFound | Self::Listing => "public, max-age=300",
            Self::Error => "public, max-age=60",
        })
    }
}

pub fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}

fn base_response(status: StatusCode, policy: CachePolicy, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, policy.header_value());
    apply_cors(headers);
    response
}

/// Attach `X-Token-Identifier`, unless the value cannot be a header
fn with_identifier(mut response: Response, identifier: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(identifier) {
        response.headers_mut().insert(TOKEN_IDENTIFIER_HEADER, value);
    }
    response
}

/// Empty-bodied response for any non-success outcome
pub fn empty(status: StatusCode, policy: CachePolicy) -> Response {
    base_response(status, policy, Body::empty())
}

pub fn not_found() -> Response {
    empty(StatusCode::NOT_FOUND, CachePolicy::NotFound)
}

pub fn missing_identifier() -> Response {
    empty(StatusCode::NOT_FOUND, CachePolicy::Error)
}

pub fn bad_gateway() -> Response {
    empty(StatusCode::BAD_GATEWAY, CachePolicy::Error)
}

pub fn internal_error() -> Response {
    empty(StatusCode::INTERNAL_SERVER_ERROR, CachePolicy::Error)
}

/// JSON body with the given status and cache policy
pub fn json<T: Serialize>(status: StatusCode, policy: CachePolicy, value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => {
            let mut response = base_response(status, policy, Body::from(body));
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            response
        }
        Err(e) => {
            error!("Failed to serialize response body: {}", e);
            internal_error()
        }
    }
}

/// Long-cached JSON body for a resolved token
pub fn token_json<T: Serialize>(identifier: &str, value: &T) -> Response {
    with_identifier(json(StatusCode::OK, CachePolicy::Found, value), identifier)
}

/// Long-cached image bytes for a resolved token
pub fn token_image(identifier: &str, content_type: &str, bytes: Bytes) -> Response {
    let mut response = base_response(StatusCode::OK, CachePolicy::Found, Body::from(bytes));
    let content_type = HeaderValue::from_str(content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("image/png"));
    response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    with_identifier(response, identifier)
}

/// CORS preflight answer
pub fn preflight() -> Response {
    let mut headers = HeaderMap::new();
    apply_cors(&mut headers);
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(PREFLIGHT_MAX_AGE),
    );
    (StatusCode::OK, headers).into_response()
}
