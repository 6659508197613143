use axum::{
    extract::Query,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use rooster_core::fetch::fetch_feed;
use serde::Deserialize;

use crate::route::{error_response, feed_source};

#[derive(Debug, Clone, Deserialize)]
pub struct QueryParams {
    url: String,
}

/// Pass a feed through unchanged, for clients that cannot fetch it directly.
pub async fn handler(
    Query(query_params): Query<QueryParams>,
) -> Result<Response, (StatusCode, String)> {
    let raw_text = fetch_feed(&feed_source(&query_params.url, None))
        .await
        .map_err(error_response)?;
    let response = ([(CONTENT_TYPE, "text/calendar")], raw_text).into_response();
    Ok(response)
}
