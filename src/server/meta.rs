//! Metadata extraction endpoint.
//!
//! Format:
//! ```json
//! {
//!   "status": "ok",
//!   "url": "https://example.com/",
//!   "meta": { "og:title": "...", "twitter:card": "summary" }
//! }
//! ```
//!
//! Every success carries an `ETag` computed from `meta`; a matching
//! `If-None-Match` gets `304 Not Modified` with no body.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::error::ApiError;
use super::state::AppState;
use crate::fetch::parse_url;
use crate::model::MetadataSet;

#[derive(Debug, Deserialize)]
pub struct MetaQuery {
    url: Option<String>,
}

#[derive(Debug, Serialize)]
struct MetaResponse {
    status: &'static str,
    url: String,
    meta: MetadataSet,
}

/// `GET /api/meta?url=<url>`
pub async fn meta_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<MetaQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let raw = query
        .url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing required query parameter 'url'".to_string()))?;

    let url = parse_url(raw)?;

    // Dropping the handler (client disconnect) cancels the in-flight fetch
    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    let meta = state.site_meta.parse(url.as_str(), &cancel).await?;
    let etag = state.etags.generate(&meta);

    if if_none_match(&headers, &etag) {
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
    }

    let mut response = Json(MetaResponse {
        status: "ok",
        url: url.to_string(),
        meta,
    })
    .into_response();

    if let Ok(value) = HeaderValue::from_str(&etag) {
        response.headers_mut().insert(header::ETAG, value);
    }

    Ok(response)
}

/// Whether `If-None-Match` lists `etag` (or `*`)
fn if_none_match(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|tag| tag.trim().trim_start_matches("W/"))
        .any(|tag| tag == "*" || tag == etag)
}
