// JSON file repository implementation
use crate::application::reading_repository::ReadingRepository;
use crate::domain::reading::Reading;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Reads a static batch of readings from a JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonReadingRepository {
    path: PathBuf,
}

impl JsonReadingRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse and validate a JSON array of readings.
pub fn parse_readings(json: &str) -> Result<Vec<Reading>> {
    let readings: Vec<Reading> = serde_json::from_str(json).context("Invalid data format")?;

    if let Some((index, reading)) = readings
        .iter()
        .enumerate()
        .find(|(_, r)| !(0.0..=1.0).contains(&r.battery_level))
    {
        anyhow::bail!(
            "Invalid data format: reading {} of device {} has battery level {} outside [0, 1]",
            index,
            reading.device_id,
            reading.battery_level
        );
    }

    Ok(readings)
}

#[async_trait]
impl ReadingRepository for JsonReadingRepository {
    async fn load_readings(&self) -> Result<Arc<Vec<Reading>>> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read battery data from {}", self.path.display()))?;

        let readings = parse_readings(&json)
            .with_context(|| format!("Failed to load battery data from {}", self.path.display()))?;

        tracing::info!("Loaded {} battery readings from {}", readings.len(), self.path.display());
        Ok(Arc::new(readings))
    }
}
