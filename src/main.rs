// Main entry point - Dependency injection and analysis run
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use fleet_battery_health::application::device_analyzer::DeviceAnalyzer;
use fleet_battery_health::application::fleet_service::FleetHealthService;
use fleet_battery_health::application::health_classifier::HealthClassifier;
use fleet_battery_health::application::school_aggregator::SchoolAggregator;
use fleet_battery_health::infrastructure::cached_repository::CachedReadingRepository;
use fleet_battery_health::infrastructure::config::{load_app_config, OutputFormat};
use fleet_battery_health::infrastructure::json_repository::JsonReadingRepository;
use fleet_battery_health::presentation::report::{render_json, render_table};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create repository (infrastructure layer)
    let source = JsonReadingRepository::new(config.data.path.clone());
    tracing::info!("Reading battery data from {}", source.path().display());
    let repository = Arc::new(CachedReadingRepository::new(
        Arc::new(source),
        config.data.cache_policy(),
    ));

    // Create services (application layer)
    let analyzer = DeviceAnalyzer::new(HealthClassifier::new(config.health));
    let aggregator = SchoolAggregator::new(config.risk);
    let service = FleetHealthService::new(repository, analyzer, aggregator)
        .with_ranking(config.analysis.ranking)
        .with_parallelism(config.analysis.parallelism);

    let report = service.prioritize_schools().await?;

    // Render (presentation layer)
    let output = match config.output.format {
        OutputFormat::Table => render_table(&report, service.aggregator()),
        OutputFormat::Json => render_json(&report, service.aggregator())?,
    };
    println!("{}", output);

    if let Some(device_id) = &config.output.diagnose {
        let diagnostics = service.diagnose_device(device_id).await?;
        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
    }

    Ok(())
}
