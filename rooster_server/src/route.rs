pub mod calendar;
pub mod proxy;
pub mod schedule;

use axum::http::StatusCode;
use rooster_core::{fetch::FeedSource, ScheduleError};

/// Which feed to fetch, and through which proxy.
pub fn feed_source(url: &str, proxy: Option<&str>) -> FeedSource {
    match proxy {
        Some(proxy) => FeedSource::Proxied {
            proxy: proxy.to_string(),
            url: url.to_string(),
        },
        None => FeedSource::Direct(url.to_string()),
    }
}

/// Map a schedule error onto the response sent to the client.
pub fn error_response(err: ScheduleError) -> (StatusCode, String) {
    let status = match err {
        ScheduleError::TransportFailure(_) => StatusCode::BAD_GATEWAY,
        ScheduleError::InvalidGridConfig(_)
        | ScheduleError::InvalidWeekOffset(_)
        | ScheduleError::MalformedTimestamp(_) => StatusCode::BAD_REQUEST,
        ScheduleError::Storage(_) | ScheduleError::Serialization(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_source() {
        assert_eq!(
            feed_source("https://example.org/a.ics", None),
            FeedSource::Direct(String::from("https://example.org/a.ics"))
        );
        assert_eq!(
            feed_source("https://example.org/a.ics", Some("https://proxy.example/p")),
            FeedSource::Proxied {
                proxy: String::from("https://proxy.example/p"),
                url: String::from("https://example.org/a.ics"),
            }
        );
    }

    #[test]
    fn test_error_response() {
        let (status, message) =
            error_response(ScheduleError::TransportFailure(String::from("HTTP status 404")));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(message, "feed could not be retrieved: HTTP status 404");
        let (status, _) = error_response(ScheduleError::InvalidGridConfig(String::new()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, message) = error_response(ScheduleError::InvalidWeekOffset(i64::MAX));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, format!("week offset {} is out of range", i64::MAX));
        let (status, _) = error_response(ScheduleError::Storage(String::new()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
