use super::{error_response, run_blocking};
use crate::models::{AggregateReport, ErrorResponse};
use crate::services::aggregator::{aggregate, DEFAULT_REPORT_CAP};
use crate::AppState;
use rocket::serde::json::Json;
use rocket::{get, State};

#[get("/report/<keyword>?<cap>")]
pub async fn keyword_report(
    keyword: String,
    cap: Option<usize>,
    state: &State<AppState>,
) -> Result<Json<AggregateReport>, ErrorResponse> {
    let services = state.services.clone();
    let cap = cap.unwrap_or(DEFAULT_REPORT_CAP).min(state.report_cap_max);

    run_blocking(move || {
        let search = services.video_search()?;
        Ok(aggregate(search.as_ref(), &keyword, cap))
    })
    .await
    .map(Json)
    .map_err(error_response)
}
