use super::{error_response, run_blocking};
use crate::models::{ErrorResponse, PositionResponse};
use crate::services::positions::{check_positions, DEFAULT_SCAN_LIMIT};
use crate::trace::TraceSink;
use crate::AppState;
use rocket::serde::json::Json;
use rocket::{get, State};

const MAX_SCAN_LIMIT: usize = 500;

#[get("/positions?<keyword>&<channel>&<limit>")]
pub async fn channel_positions(
    keyword: String,
    channel: String,
    limit: Option<usize>,
    state: &State<AppState>,
) -> Result<Json<PositionResponse>, ErrorResponse> {
    let services = state.services.clone();
    let limit = limit.unwrap_or(DEFAULT_SCAN_LIMIT).min(MAX_SCAN_LIMIT);

    run_blocking(move || {
        let search = services.video_search()?;
        let fetcher = services.page_fetcher()?;
        let mut trace = TraceSink::new();
        let report = check_positions(
            search.as_ref(),
            fetcher.as_ref(),
            &keyword,
            &channel,
            limit,
            &mut trace,
        )?;
        Ok(PositionResponse {
            report,
            trace: trace.into_events(),
        })
    })
    .await
    .map(Json)
    .map_err(error_response)
}
