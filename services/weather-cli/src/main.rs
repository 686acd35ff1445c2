//! Weather advice CLI.
//!
//! Resolves a coordinate to:
//! - its forecast grid cell (offline)
//! - the current weather record, cache first
//! - umbrella and day-over-day temperature advice
//! - PM10 mask advice for its district
//!
//! Results are printed to stdout as JSON; logs go to stderr.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde_json::json;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::{load_config, AppConfig, CacheBackend};
use forecast_client::{AirKoreaClient, KakaoGeocoder, KmaForecastClient};
use projection::LambertConformal;
use resolver::{AirQualityResolver, WeatherResolver, WeatherService};
use storage::{KeyValueCache, MemoryCache, RedisCache};
use weather_common::{GeoPoint, SystemClock, WeatherError};

#[derive(Parser, Debug)]
#[command(name = "weather-cli")]
#[command(about = "Weather, umbrella and mask advice for a coordinate")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// YAML configuration file
    #[arg(long, global = true, env = "WEATHER_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Redis URL, overrides the configured cache
    #[arg(long, global = true, env = "REDIS_URL")]
    redis_url: Option<String>,

    /// Use an in-process cache instead of Redis
    #[arg(long, global = true)]
    memory_cache: bool,

    /// Forecast API auth key
    #[arg(long, global = true, env = "KMA_AUTH_KEY", hide_env_values = true)]
    kma_auth_key: Option<String>,

    /// Air-quality API service key
    #[arg(long, global = true, env = "AIRKOREA_SERVICE_KEY", hide_env_values = true)]
    airkorea_service_key: Option<String>,

    /// Reverse-geocoding REST API key
    #[arg(long, global = true, env = "KAKAO_REST_API_KEY", hide_env_values = true)]
    kakao_rest_api_key: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the forecast grid cell for a coordinate
    Grid(PointArgs),
    /// Print the weather record for a coordinate
    Weather(PointArgs),
    /// Print umbrella and temperature-trend advice
    Summary(PointArgs),
    /// Print PM10 mask advice for the coordinate's district
    Mask(PointArgs),
}

#[derive(ClapArgs, Debug, Clone, Copy)]
struct PointArgs {
    /// Latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,
}

impl PointArgs {
    fn point(&self) -> GeoPoint {
        GeoPoint::from_lat_lon(self.lat, self.lon)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = resolve_config(&args)?;

    match execute(&args.command, &config).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(err) => match err.downcast_ref::<WeatherError>() {
            Some(weather_err) => {
                let body = json!({
                    "error": weather_err.error_code(),
                    "status": weather_err.http_status_code(),
                    "message": weather_err.to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
                std::process::exit(1);
            }
            None => Err(err),
        },
    }
}

/// Config file (or defaults) with command-line overrides applied.
fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    if let Some(url) = &args.redis_url {
        config.cache.backend = CacheBackend::Redis;
        config.cache.redis_url = url.clone();
    }
    if args.memory_cache {
        config.cache.backend = CacheBackend::Memory;
    }
    if let Some(key) = &args.kma_auth_key {
        config.forecast.auth_key = key.clone();
    }
    if let Some(key) = &args.airkorea_service_key {
        config.air_quality.service_key = key.clone();
    }
    if let Some(key) = &args.kakao_rest_api_key {
        config.geocoder.rest_api_key = key.clone();
    }

    Ok(config)
}

async fn execute(command: &Command, config: &AppConfig) -> Result<serde_json::Value> {
    match command {
        Command::Grid(point) => {
            let cell = LambertConformal::kma().to_grid(point.point())?;
            Ok(json!({
                "latitude": point.lat,
                "longitude": point.lon,
                "x": cell.x,
                "y": cell.y,
            }))
        }
        Command::Weather(point) => {
            let record = weather_service(config).await?.resolve_weather(point.point()).await?;
            Ok(serde_json::to_value(record)?)
        }
        Command::Summary(point) => {
            let summary = weather_service(config).await?.resolve_summary(point.point()).await?;
            Ok(serde_json::to_value(summary)?)
        }
        Command::Mask(point) => {
            let advice = air_resolver(config).await?.resolve(point.point()).await?;
            Ok(serde_json::to_value(advice)?)
        }
    }
}

async fn build_cache(config: &AppConfig) -> Result<Arc<dyn KeyValueCache>> {
    match config.cache.backend {
        CacheBackend::Redis => {
            info!(redis_url = %config.cache.redis_url, "Connecting to Redis");
            let cache = RedisCache::connect(&config.cache.redis_url)
                .await
                .with_context(|| format!("Failed to connect to {}", config.cache.redis_url))?;
            Ok(Arc::new(cache))
        }
        CacheBackend::Memory => {
            info!(capacity = config.cache.memory_capacity, "Using in-memory cache");
            Ok(Arc::new(MemoryCache::new(config.cache.memory_capacity)))
        }
    }
}

async fn weather_service(config: &AppConfig) -> Result<WeatherService> {
    anyhow::ensure!(
        !config.forecast.auth_key.is_empty(),
        "Forecast auth key is not configured (KMA_AUTH_KEY)"
    );

    let source = KmaForecastClient::new(config.forecast.clone())?;
    let resolver = WeatherResolver::new(
        build_cache(config).await?,
        Arc::new(source),
        Arc::new(SystemClock),
    );

    Ok(WeatherService::kma(resolver))
}

async fn air_resolver(config: &AppConfig) -> Result<AirQualityResolver> {
    anyhow::ensure!(
        !config.air_quality.service_key.is_empty(),
        "Air-quality service key is not configured (AIRKOREA_SERVICE_KEY)"
    );
    anyhow::ensure!(
        !config.geocoder.rest_api_key.is_empty(),
        "Geocoder REST API key is not configured (KAKAO_REST_API_KEY)"
    );

    let geocoder = KakaoGeocoder::new(config.geocoder.clone())?;
    let source = AirKoreaClient::new(config.air_quality.clone())?;

    Ok(AirQualityResolver::new(
        Arc::new(geocoder),
        Arc::new(source),
        build_cache(config).await?,
        Arc::new(SystemClock),
    ))
}
