//! Token metadata lookups

use axum::{
    extract::{Path, State},
    response::Response,
};
use tracing::error;

use crate::services::LookupOutcome;
use crate::web::{responses, AppState};

/// `GET /info/{identifier}`
pub async fn get_token_info(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Response {
    lookup(&state, &identifier).await
}

/// `GET /info/` with nothing after the slash
pub async fn missing_token_info() -> Response {
    responses::missing_identifier()
}

async fn lookup(state: &AppState, identifier: &str) -> Response {
    match state.lookup.token_info(identifier).await {
        Ok(LookupOutcome::Found(token)) => responses::token_json(identifier, &token),
        Ok(LookupOutcome::NotFound) => responses::not_found(),
        Ok(LookupOutcome::MissingIdentifier) => responses::missing_identifier(),
        Ok(LookupOutcome::Unavailable { .. }) => responses::bad_gateway(),
        Err(e) => {
            error!("Error serving token info for '{}': {}", identifier, e);
            responses::internal_error()
        }
    }
}
