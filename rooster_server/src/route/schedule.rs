use axum::{extract::Query, http::StatusCode, Json};
use rooster_core::{
    schedule::GridConfig, ScheduleError, ScheduleResult, WeekNavigator, WeekView,
};
use serde::Deserialize;

use crate::route::{error_response, feed_source};

#[derive(Debug, Clone, Deserialize)]
pub struct QueryParams {
    url: String,
    proxy: Option<String>,
    /// weeks relative to the current one
    #[serde(default)]
    week: i64,
    start_hour: Option<u32>,
    end_hour: Option<u32>,
    slot_minutes: Option<u32>,
}

impl TryFrom<&QueryParams> for GridConfig {
    type Error = ScheduleError;

    fn try_from(value: &QueryParams) -> ScheduleResult<Self> {
        let default = GridConfig::default();
        GridConfig::new(
            value.start_hour.unwrap_or(default.start_hour),
            value.end_hour.unwrap_or(default.end_hour),
            value.slot_minutes.unwrap_or(default.slot_minutes),
        )
    }
}

/// Handle schedule requests.
///
/// Responds with the projected week as JSON.
pub async fn handler(
    Query(query_params): Query<QueryParams>,
) -> Result<Json<WeekView>, (StatusCode, String)> {
    let config = GridConfig::try_from(&query_params).map_err(error_response)?;
    let mut navigator = WeekNavigator::new(config);
    navigator
        .refresh(&feed_source(
            &query_params.url,
            query_params.proxy.as_deref(),
        ))
        .await
        .map_err(error_response)?;
    let view = navigator
        .jump(query_params.week)
        .ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            String::from("no feed loaded"),
        ))?
        .map_err(error_response)?;
    Ok(Json(view))
}
