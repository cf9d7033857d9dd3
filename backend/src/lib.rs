pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod trace;
pub mod utils;

use rocket::figment::Figment;
use rocket::{routes, Build, Rocket};
use services::youtube::YouTubeServices;
use std::sync::Arc;

pub struct AppState {
    pub services: Arc<dyn YouTubeServices>,
    pub report_cap_max: usize,
}

pub fn build_rocket(figment: Figment, state: AppState) -> Rocket<Build> {
    rocket::custom(figment)
        .manage(state)
        .mount("/", routes![api::index])
        .mount(
            "/api",
            routes![
                api::resolve_channel,
                api::keyword_report,
                api::channel_positions
            ],
        )
}
