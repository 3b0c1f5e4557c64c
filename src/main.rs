use tracing::{info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use climate_api::app::Application;
use climate_api::config::Config;
use climate_api::db::connect_read_only;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with environment filter support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,climate_api=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    info!("Starting climate api with config: {:?}", config);

    info!("Opening climate database {}", config.database_url);
    let pool = connect_read_only(&config.database_url, config.db_max_connections).await?;
    info!("Database connection established");

    let app = Application::build(config, pool).await?;
    app.run_until_stopped().await
}
