use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::{Config, DataSource};
use crate::db::{ClimateRepository, ClimateSnapshot, ClimateStore};
use crate::services::ClimateService;

/// Running HTTP server
pub struct Application {
    pub server_handle: JoinHandle<Result<(), std::io::Error>>,
}

impl Application {
    /// Build the store, service and router, then spawn the HTTP server
    ///
    /// With [`DataSource::Snapshot`] both tables are read once here and
    /// served from memory; with [`DataSource::Database`] every request
    /// queries the pool.
    pub async fn build(config: Config, pool: SqlitePool) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Initializing application components");

        let store = build_store(config.data_source, pool).await?;
        let climate_service = ClimateService::new(store);

        let app_state = AppState { climate_service };
        let app = create_router(app_state).layer(TraceLayer::new_for_http());

        let addr = config.server_addr();
        info!("Starting HTTP server on {}", addr);

        let server_handle = tokio::spawn(async move {
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, app).await
        });

        info!("Application initialized successfully");

        Ok(Self { server_handle })
    }

    /// Run until the server stops
    pub async fn run_until_stopped(self) -> Result<(), Box<dyn std::error::Error>> {
        self.server_handle.await??;
        Ok(())
    }
}

pub async fn build_store(
    data_source: DataSource,
    pool: SqlitePool,
) -> Result<Arc<dyn ClimateStore>, Box<dyn std::error::Error>> {
    let repo = ClimateRepository::new(pool);

    let store: Arc<dyn ClimateStore> = match data_source {
        DataSource::Snapshot => {
            info!("Loading climate snapshot into memory");
            Arc::new(ClimateSnapshot::load(&repo).await?)
        }
        DataSource::Database => {
            info!("Serving climate data directly from the database");
            Arc::new(repo)
        }
    };

    Ok(store)
}
