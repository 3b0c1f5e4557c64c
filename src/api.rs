use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use tracing::{debug, error, info, instrument, warn};
use utoipa::OpenApi;

use crate::db::{PrecipitationSeries, Station, TemperatureStats, TobsEntry};
use crate::services::{ClimateService, ServiceError};

#[derive(Clone)]
pub struct AppState {
    pub climate_service: ClimateService,
}

pub const API_PREFIX: &str = "/api/v1.0";

const ROUTE_LISTING: &str = "Available Routes:<br/>\
/api/v1.0/precipitation<br/>\
/api/v1.0/stations<br/>\
/api/v1.0/tobs<br/>\
/api/v1.0/&lt;start&gt;<br/>\
/api/v1.0/&lt;start&gt;/&lt;end&gt;<br/>\
<br/>\
NOTE: please enter &lt;start&gt; and &lt;end&gt; dates as YYYY-MM-DD";

#[derive(OpenApi)]
#[openapi(
    paths(
        welcome,
        get_precipitation,
        get_stations,
        get_tobs,
        get_stats_from,
        get_stats_between,
    ),
    components(schemas(Station, TobsEntry, TemperatureStats)),
    tags(
        (name = "climate-api", description = "Read-only queries over daily station precipitation and temperature observations")
    )
)]
pub struct ApiDoc;

pub fn generate_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/precipitation", get(get_precipitation))
        .route("/stations", get(get_stations))
        .route("/tobs", get(get_tobs))
        .route("/{start}", get(get_stats_from))
        .route("/{start}/{end}", get(get_stats_between))
        .with_state(state);

    Router::new()
        .route("/", get(welcome))
        .nest(API_PREFIX, api_routes)
}

/// Translate a service failure into a status code and message, logging it
/// at a level matching who is at fault.
fn reject(context: &str, err: ServiceError) -> (StatusCode, String) {
    let status = err.status_code();
    if status.is_server_error() {
        error!("Failed to {}: {}", context, err);
    } else {
        warn!("Rejected request to {}: {}", context, err);
    }
    (status, err.to_string())
}

/// Format a temperature with at least one decimal place
fn format_temperature(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

fn render_stats(heading: &str, stats: &TemperatureStats) -> String {
    format!(
        "{heading}:</br>\
         </br>\
         Maximum Temperature: {} °F</br>\
         Minimum Temperature: {} °F</br>\
         Average Temperature: {} °F",
        format_temperature(stats.max),
        format_temperature(stats.min),
        format_temperature(stats.avg),
    )
}

/// List all available api routes
#[utoipa::path(
    get,
    path = "/",
    tag = "climate-api",
    responses((status = 200, description = "Route listing", body = String, content_type = "text/html"))
)]
#[instrument]
async fn welcome() -> Html<&'static str> {
    debug!("Route listing requested");
    Html(ROUTE_LISTING)
}

/// Precipitation by date for the year before the latest measurement
#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    tag = "climate-api",
    responses(
        (status = 200, description = "Date to precipitation reading", body = BTreeMap<String, Option<f64>>),
        (status = 500, description = "Data store unavailable", body = String)
    )
)]
#[instrument(skip(state))]
async fn get_precipitation(
    State(state): State<AppState>,
) -> Result<Json<PrecipitationSeries>, (StatusCode, String)> {
    debug!("Fetching last year of precipitation");
    let series = state
        .climate_service
        .precipitation()
        .await
        .map_err(|e| reject("fetch precipitation", e))?;

    info!("Retrieved precipitation for {} dates", series.len());
    Ok(Json(series))
}

/// All weather stations
#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    tag = "climate-api",
    responses(
        (status = 200, description = "Station list", body = [Station]),
        (status = 500, description = "Data store unavailable", body = String)
    )
)]
#[instrument(skip(state))]
async fn get_stations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Station>>, (StatusCode, String)> {
    debug!("Fetching stations");
    let stations = state
        .climate_service
        .stations()
        .await
        .map_err(|e| reject("fetch stations", e))?;

    info!("Retrieved {} stations", stations.len());
    Ok(Json(stations))
}

/// Temperature observations for the year before the latest measurement
#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    tag = "climate-api",
    responses(
        (status = 200, description = "Temperature observations with station names", body = [TobsEntry]),
        (status = 500, description = "Data store unavailable", body = String)
    )
)]
#[instrument(skip(state))]
async fn get_tobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<TobsEntry>>, (StatusCode, String)> {
    debug!("Fetching last year of temperature observations");
    let entries = state
        .climate_service
        .tobs()
        .await
        .map_err(|e| reject("fetch temperature observations", e))?;

    info!("Retrieved {} temperature observations", entries.len());
    Ok(Json(entries))
}

/// Temperature statistics for dates on or after `start`
#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    tag = "climate-api",
    params(("start" = String, Path, description = "Start date, YYYY-MM-DD")),
    responses(
        (status = 200, description = "Max, min and average temperature", body = String, content_type = "text/html"),
        (status = 400, description = "Malformed date", body = String),
        (status = 404, description = "No observations in range", body = String),
        (status = 500, description = "Data store unavailable", body = String)
    )
)]
#[instrument(skip(state), fields(start = %start))]
async fn get_stats_from(
    State(state): State<AppState>,
    Path(start): Path<String>,
) -> Result<Html<String>, (StatusCode, String)> {
    debug!("Computing temperature statistics from {}", start);
    let stats = state
        .climate_service
        .temperature_stats(&start, None)
        .await
        .map_err(|e| reject("compute temperature statistics", e))?;

    info!(
        "Temperature statistics from {}: max {}, min {}, avg {}",
        start, stats.max, stats.min, stats.avg
    );
    let heading = format!("Temperature statistics starting from {start}");
    Ok(Html(render_stats(&heading, &stats)))
}

/// Temperature statistics for dates between `start` and `end` inclusive
#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    tag = "climate-api",
    params(
        ("start" = String, Path, description = "Start date, YYYY-MM-DD"),
        ("end" = String, Path, description = "End date, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Max, min and average temperature", body = String, content_type = "text/html"),
        (status = 400, description = "Malformed date", body = String),
        (status = 404, description = "No observations in range", body = String),
        (status = 500, description = "Data store unavailable", body = String)
    )
)]
#[instrument(skip(state), fields(start = %start, end = %end))]
async fn get_stats_between(
    State(state): State<AppState>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Html<String>, (StatusCode, String)> {
    debug!("Computing temperature statistics from {} to {}", start, end);
    let stats = state
        .climate_service
        .temperature_stats(&start, Some(&end))
        .await
        .map_err(|e| reject("compute temperature statistics", e))?;

    info!(
        "Temperature statistics from {} to {}: max {}, min {}, avg {}",
        start, end, stats.max, stats.min, stats.avg
    );
    let heading = format!("Temperature statistics starting from {start} and ending {end}");
    Ok(Html(render_stats(&heading, &stats)))
}
