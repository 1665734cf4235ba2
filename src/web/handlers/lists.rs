//! Registry overview and single list view

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;

use crate::services::LookupOutcome;
use crate::web::{
    responses::{self, CachePolicy},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub url: String,
}

/// `GET /lists`
pub async fn list_overview(State(state): State<AppState>) -> Response {
    let overview = state.lookup.list_overview().await;
    responses::json(StatusCode::OK, CachePolicy::Listing, &overview)
}

/// `GET /list?url=<root url>`
pub async fn list_view(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Response {
    match state.lookup.list_view(&query.url).await {
        LookupOutcome::Found(view) => responses::json(StatusCode::OK, CachePolicy::Listing, &view),
        LookupOutcome::MissingIdentifier => responses::missing_identifier(),
        LookupOutcome::NotFound | LookupOutcome::Unavailable { .. } => responses::not_found(),
    }
}
