//! HTTP handlers
//!
//! Handlers are thin: they pull the identifier out of the request, call the
//! [`TokenLookupService`](crate::services::TokenLookupService) and map the
//! outcome onto a response from [`responses`](super::responses).

pub mod health;
pub mod lists;
pub mod token_image;
pub mod token_info;

use axum::response::Response;

use super::responses;

/// `OPTIONS` on the lookup endpoints
pub async fn preflight() -> Response {
    responses::preflight()
}
