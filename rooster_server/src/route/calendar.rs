use axum::{
    extract::Query,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Local;
use rooster_core::{
    export::week_calendar, feed, fetch::fetch_feed, ical::generator::Emitter, week::WeekWindow,
    ScheduleError, ScheduleResult,
};
use serde::Deserialize;

use crate::route::{error_response, feed_source};

#[derive(Debug, Clone, Deserialize)]
pub struct QueryParams {
    url: String,
    proxy: Option<String>,
    #[serde(default)]
    week: i64,
}

impl TryFrom<&QueryParams> for WeekWindow {
    type Error = ScheduleError;

    fn try_from(value: &QueryParams) -> ScheduleResult<Self> {
        WeekWindow::relative_to(Local::now().naive_local(), value.week)
    }
}

/// Handle calendar requests.
///
/// Responds with the lessons of one week as an iCalendar file.
pub async fn handler(
    Query(query_params): Query<QueryParams>,
) -> Result<Response, (StatusCode, String)> {
    let window = WeekWindow::try_from(&query_params).map_err(error_response)?;
    let raw_text = fetch_feed(&feed_source(
        &query_params.url,
        query_params.proxy.as_deref(),
    ))
    .await
    .map_err(error_response)?;
    let events = feed::parse(&raw_text);
    let ical_calendar = week_calendar(&events, &window);
    let response = ([(CONTENT_TYPE, "text/calendar")], ical_calendar.generate()).into_response();
    Ok(response)
}
