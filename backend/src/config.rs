use crate::services::youtube::{LiveServices, DEFAULT_API_URL};
use crate::AppState;
use anyhow::Result;
use env_logger::Builder;
use lazy_static::lazy_static;
use log::{info, warn, LevelFilter};
use rocket::figment::Figment;
use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};
use std::env;
use std::sync::Arc;
use std::time::Duration;

lazy_static! {
    pub static ref YOUTUBE_API_KEY: Option<String> = env::var("YOUTUBE_API_KEY").ok();
    pub static ref YOUTUBE_API_URL: String =
        env::var("YOUTUBE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    pub static ref PORT: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()
        .unwrap_or(8080);
    pub static ref ALLOWED_ORIGIN: String =
        env::var("ALLOWED_ORIGIN").unwrap_or_else(|_| "http://localhost:8080".to_string());
    pub static ref HTTP_TIMEOUT_SECS: u64 = env::var("HTTP_TIMEOUT_SECS")
        .unwrap_or_else(|_| "30".to_string())
        .parse::<u64>()
        .unwrap_or(30);
    pub static ref REPORT_CAP_MAX: usize = env::var("REPORT_CAP_MAX")
        .unwrap_or_else(|_| "200".to_string())
        .parse::<usize>()
        .unwrap_or(200);
}

pub fn init_logger() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
    info!("Starting channel insights backend...");
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

pub fn create_live_services() -> LiveServices {
    if YOUTUBE_API_KEY.is_none() {
        warn!("YOUTUBE_API_KEY is not set; report and position endpoints will fail");
    }
    LiveServices {
        api_key: YOUTUBE_API_KEY.clone(),
        base_url: YOUTUBE_API_URL.clone(),
        timeout: Duration::from_secs(*HTTP_TIMEOUT_SECS),
    }
}

pub fn create_app_state() -> AppState {
    AppState {
        services: Arc::new(create_live_services()),
        report_cap_max: *REPORT_CAP_MAX,
    }
}

pub fn create_figment() -> Figment {
    rocket::Config::figment()
        .merge(("address", "0.0.0.0"))
        .merge(("port", *PORT))
}

pub fn create_cors() -> Result<rocket_cors::Cors> {
    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::some_exact(&[ALLOWED_ORIGIN.as_str()]))
        .allowed_methods(
            vec![Method::Get, Method::Post, Method::Options]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .allowed_headers(AllowedHeaders::some(&["Accept", "Content-Type"]))
        .allow_credentials(false)
        .to_cors()
        .map_err(|e| anyhow::anyhow!("Failed to create CORS options: {}", e))?;

    Ok(cors)
}
