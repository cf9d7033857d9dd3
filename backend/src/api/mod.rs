pub mod channel;
pub mod positions;
pub mod report;

pub use channel::*;
pub use positions::*;
pub use report::*;

use crate::error::AppError;
use crate::models::ErrorResponse;
use log::error;
use rocket::get;

#[get("/")]
pub fn index() -> &'static str {
    "channel insights: POST /api/channel-id, GET /api/report/<keyword>, GET /api/positions"
}

/// Runs a synchronous core operation on the blocking pool.
pub async fn run_blocking<T, F>(operation: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(operation)
        .await
        .map_err(AppError::task)?
}

pub fn error_response(e: AppError) -> ErrorResponse {
    let (status, kind) = match &e {
        AppError::Resolve(inner) if inner.is_validation() => (400, "invalid_channel"),
        AppError::Resolve(_) => (404, "channel_not_found"),
        AppError::Config(_) => (503, "not_configured"),
        e if e.is_upstream() => (502, "upstream_failure"),
        _ => (500, "internal"),
    };
    if status >= 500 {
        error!("Request failed: {e}");
    }
    ErrorResponse {
        status,
        error: kind.to_string(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;

    #[test]
    fn maps_errors_to_statuses() {
        let status = |e: AppError| error_response(e).status;
        assert_eq!(status(ResolveError::UnsupportedHost("vimeo.com".into()).into()), 400);
        assert_eq!(status(ResolveError::NotFound.into()), 404);
        assert_eq!(status(AppError::config("missing key")), 503);
        assert_eq!(status(AppError::api(403, "quotaExceeded")), 502);
        assert_eq!(status(AppError::InvalidDuration("P1W".into())), 502);
        assert_eq!(status(AppError::task("join error")), 500);
    }
}
