use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Rate at or above which a device is flagged for replacement (30%/day).
pub const DEFAULT_REPLACEMENT_RATE: f64 = 0.30;
/// Physical discharge ceiling; anything faster is bad data (100%/day).
pub const DEFAULT_MAX_PLAUSIBLE_RATE: f64 = 1.0;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 5 * 60;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub health: HealthThresholds,
    #[serde(default)]
    pub risk: RiskThresholds,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DataSettings {
    pub path: PathBuf,
    pub cache_ttl_secs: u64,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/readings.json"),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl DataSettings {
    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy::new(Duration::from_secs(self.cache_ttl_secs))
    }
}

/// How long a loaded batch of readings stays fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub ttl: Duration,
}

impl CachePolicy {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    pub fn is_fresh(&self, age: Duration) -> bool {
        age < self.ttl
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct HealthThresholds {
    pub replacement_rate: f64,
    pub max_plausible_rate: f64,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            replacement_rate: DEFAULT_REPLACEMENT_RATE,
            max_plausible_rate: DEFAULT_MAX_PLAUSIBLE_RATE,
        }
    }
}

/// Weights and bucket boundaries for the school risk score.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct RiskThresholds {
    pub absolute_weight: f64,
    pub percentage_weight: f64,
    pub absolute_scale: f64,
    pub critical: f64,
    pub high: f64,
    pub medium: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            absolute_weight: 0.6,
            percentage_weight: 0.4,
            absolute_scale: 10.0,
            critical: 50.0,
            high: 25.0,
            medium: 10.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RankingStrategy {
    #[default]
    Priority,
    RiskScore,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct AnalysisSettings {
    pub parallelism: usize,
    pub ranking: RankingStrategy,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            parallelism: 1,
            ranking: RankingStrategy::Priority,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
    /// Device id to print a segment-by-segment breakdown for.
    pub diagnose: Option<String>,
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/fleet").required(false))
        .add_source(
            config::Environment::with_prefix("FLEET")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
