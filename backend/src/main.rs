use channel_insights::{build_rocket, config};

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    config::load_environment();
    config::init_logger();

    let cors = config::create_cors()?;
    let state = config::create_app_state();

    build_rocket(config::create_figment(), state)
        .attach(cors)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket failed: {e}"))?;

    Ok(())
}
