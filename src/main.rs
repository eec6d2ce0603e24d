use anyhow::Result;
use quicklink::{config, server, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine; real deployments set the environment directly.
    dotenvy::dotenv().ok();

    let config = config::load_from_env()?;

    telemetry::init_tracing(&config.log_level, &config.log_format)?;
    config.print_summary();

    server::run(config).await
}
