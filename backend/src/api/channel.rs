use super::{error_response, run_blocking};
use crate::models::{ErrorResponse, ResolveRequest, ResolveResponse};
use crate::services::resolver::resolve_channel_id;
use crate::AppState;
use log::{debug, info};
use rocket::serde::json::Json;
use rocket::{post, State};

#[post("/channel-id", data = "<request>")]
pub async fn resolve_channel(
    request: Json<ResolveRequest>,
    state: &State<AppState>,
) -> Result<Json<ResolveResponse>, ErrorResponse> {
    let services = state.services.clone();
    let input = request.into_inner().url;

    let response = run_blocking(move || {
        let fetcher = services.page_fetcher()?;
        let (result, trace) = resolve_channel_id(fetcher.as_ref(), &input);
        if result.is_err() {
            debug!("Resolution trail for '{input}':\n{}", trace.render());
        }
        Ok(ResolveResponse {
            found: result.is_ok(),
            channel_id: result.as_ref().ok().cloned(),
            error: result.err().map(|e| e.to_string()),
            input,
            trace: trace.into_events(),
        })
    })
    .await
    .map_err(error_response)?;

    info!(
        "Resolved '{}' -> {}",
        response.input,
        response.channel_id.as_deref().unwrap_or("not found")
    );
    Ok(Json(response))
}
