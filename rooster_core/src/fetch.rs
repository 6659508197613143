//! Retrieval of the raw feed text.

use std::fmt;

use log::{info, warn};
use reqwest::Url;

use crate::error::{ScheduleError, ScheduleResult};

/// Where a feed is retrieved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Direct(String),
    /// Fetched through a pass-through proxy that takes the feed address in
    /// its `url` query parameter.
    Proxied { proxy: String, url: String },
}

impl FeedSource {
    /// The address that is actually requested.
    pub fn request_url(&self) -> ScheduleResult<Url> {
        let parse = |url: &str| {
            Url::parse(url)
                .map_err(|err| ScheduleError::TransportFailure(format!("invalid url '{url}': {err}")))
        };
        match self {
            FeedSource::Direct(url) => parse(url),
            FeedSource::Proxied { proxy, url } => {
                let mut request_url = parse(proxy)?;
                request_url.query_pairs_mut().append_pair("url", url);
                Ok(request_url)
            }
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::Direct(url) => f.write_str(url),
            FeedSource::Proxied { proxy, url } => write!(f, "{url} via {proxy}"),
        }
    }
}

/// Get the feed text.
///
/// A non-success status is a transport failure like any network error.
pub async fn fetch_feed(source: &FeedSource) -> ScheduleResult<String> {
    let request_url = source.request_url()?;
    let client = reqwest::Client::new();
    let response = client.get(request_url).send().await?;
    let status = response.status();
    if !status.is_success() {
        warn!("fetching {source} failed with status {status}");
        return Err(ScheduleError::TransportFailure(format!(
            "HTTP status {status}"
        )));
    }
    let text = response.text().await?;
    info!("fetched {} bytes from {source}", text.len());
    Ok(text)
}
