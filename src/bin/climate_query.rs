/// Run the climate queries against a database from the command line
use clap::{Parser, Subcommand};
use climate_api::db::{connect_read_only, ClimateRepository};
use climate_api::query::format_date;
use climate_api::services::ClimateService;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "climate-query")]
#[command(about = "Query precipitation and temperature observations from a climate database", long_about = None)]
struct Cli {
    /// Database connection string
    #[arg(long, env, default_value = "sqlite://Resources/hawaii.sqlite")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the trailing one-year window used by precipitation and tobs
    Window,
    /// Precipitation by date for the last year of data (JSON)
    Precipitation,
    /// All stations (JSON)
    Stations,
    /// Temperature observations for the last year of data (JSON)
    Tobs,
    /// Max, min and average temperature over a date range
    Stats {
        /// First date to include (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// Last date to include (YYYY-MM-DD); open-ended when omitted
        #[arg(long)]
        end: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("Opening {}", cli.database_url);
    let pool = connect_read_only(&cli.database_url, 1).await?;
    let service = ClimateService::new(Arc::new(ClimateRepository::new(pool)));

    match cli.command {
        Command::Window => match service.last_year_window().await? {
            Some(window) => {
                let end = window.end.map(format_date).unwrap_or_default();
                println!("{} (exclusive) to {} (inclusive)", format_date(window.start), end);
            }
            None => println!("No measurements in database"),
        },
        Command::Precipitation => {
            let series = service.precipitation().await?;
            println!("{}", serde_json::to_string_pretty(&series)?);
        }
        Command::Stations => {
            let stations = service.stations().await?;
            println!("{}", serde_json::to_string_pretty(&stations)?);
        }
        Command::Tobs => {
            let entries = service.tobs().await?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        Command::Stats { start, end } => {
            let stats = service.temperature_stats(&start, end.as_deref()).await?;
            match &end {
                Some(end) => println!("Temperature statistics from {start} to {end}:"),
                None => println!("Temperature statistics starting from {start}:"),
            }
            println!("  Maximum Temperature: {:.1} °F", stats.max);
            println!("  Minimum Temperature: {:.1} °F", stats.min);
            println!("  Average Temperature: {:.1} °F", stats.avg);
        }
    }

    Ok(())
}
