//! Token logo lookups

use axum::{
    extract::{Path, State},
    response::Response,
};
use tracing::{error, warn};

use crate::services::LookupOutcome;
use crate::utils::UrlUtils;
use crate::web::{responses, AppState};

/// `GET /image/{*path}`
///
/// The whole remaining path is the identifier, so `/image/btkn1abc.png` and
/// `/image/btkn1abc` name the same token.
pub async fn get_token_image(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Response {
    let identifier = UrlUtils::strip_image_extension(&path);

    match state.lookup.token_image(&path).await {
        Ok(LookupOutcome::Found(image)) => {
            responses::token_image(identifier, &image.content_type, image.bytes)
        }
        Ok(LookupOutcome::NotFound) => responses::not_found(),
        Ok(LookupOutcome::MissingIdentifier) => responses::missing_identifier(),
        Ok(LookupOutcome::Unavailable { url }) => {
            warn!(
                "Logo for '{}' could not be fetched from {}",
                identifier,
                UrlUtils::obfuscate_credentials(&url)
            );
            responses::bad_gateway()
        }
        Err(e) => {
            error!("Error serving token image for '{}': {}", identifier, e);
            responses::internal_error()
        }
    }
}

/// `GET /image/` with nothing after the slash
pub async fn missing_token_image() -> Response {
    responses::missing_identifier()
}
