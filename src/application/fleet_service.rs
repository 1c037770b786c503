// Fleet health service - Use case for ranking schools by replacement urgency
use crate::application::device_analyzer::{
    group_by_device, DeviceAnalyzer, DeviceDiagnostics, FleetAnalysis,
};
use crate::application::reading_repository::ReadingRepository;
use crate::application::school_aggregator::SchoolAggregator;
use crate::domain::device::DataQualityWarning;
use crate::domain::error::AnalysisError;
use crate::domain::reading::Reading;
use crate::domain::school::SchoolSummary;
use crate::infrastructure::config::RankingStrategy;
use anyhow::Context;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct FleetReport {
    pub schools: Vec<SchoolSummary>,
    pub warnings: Vec<DataQualityWarning>,
    pub failures: Vec<(String, AnalysisError)>,
    pub total_readings: usize,
    pub generated_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct FleetHealthService {
    repository: Arc<dyn ReadingRepository>,
    analyzer: DeviceAnalyzer,
    aggregator: SchoolAggregator,
    ranking: RankingStrategy,
    parallelism: usize,
}

impl FleetHealthService {
    pub fn new(
        repository: Arc<dyn ReadingRepository>,
        analyzer: DeviceAnalyzer,
        aggregator: SchoolAggregator,
    ) -> Self {
        Self {
            repository,
            analyzer,
            aggregator,
            ranking: RankingStrategy::Priority,
            parallelism: 1,
        }
    }

    pub fn with_ranking(mut self, ranking: RankingStrategy) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    pub fn aggregator(&self) -> &SchoolAggregator {
        &self.aggregator
    }

    /// Load the current batch, analyze every device and rank the schools.
    pub async fn prioritize_schools(&self) -> anyhow::Result<FleetReport> {
        let start_time = Instant::now();
        let readings = self
            .repository
            .load_readings()
            .await
            .context("Failed to load battery readings")?;

        let fleet = self.analyze(readings.clone()).await?;
        let schools = self
            .aggregator
            .aggregate_with(&fleet.devices, self.ranking)
            .context("Failed to aggregate schools")?;

        tracing::info!(
            "Analyzed {} readings across {} devices and {} schools in {}ms ({} warnings, {} failures)",
            readings.len(),
            fleet.devices.len(),
            schools.len(),
            start_time.elapsed().as_millis(),
            fleet.warnings.len(),
            fleet.failures.len()
        );

        Ok(FleetReport {
            schools,
            warnings: fleet.warnings,
            failures: fleet.failures,
            total_readings: readings.len(),
            generated_at: Utc::now(),
        })
    }

    /// Segment-by-segment breakdown of one device in the current batch.
    pub async fn diagnose_device(&self, device_id: &str) -> anyhow::Result<DeviceDiagnostics> {
        let readings = self
            .repository
            .load_readings()
            .await
            .context("Failed to load battery readings")?;

        let device_readings: Vec<Reading> = readings
            .iter()
            .filter(|r| r.device_id == device_id)
            .cloned()
            .collect();

        self.analyzer
            .analyze_detailed(device_id, device_readings)
            .with_context(|| format!("Failed to diagnose device {}", device_id))
    }

    async fn analyze(&self, readings: Arc<Vec<Reading>>) -> anyhow::Result<FleetAnalysis> {
        if self.parallelism == 1 {
            return Ok(self.analyzer.analyze_all(&readings));
        }

        let groups = group_by_device(&readings);
        let chunk_size = groups.len().div_ceil(self.parallelism).max(1);
        tracing::debug!(
            "Analyzing {} devices on {} workers ({} per chunk)",
            groups.len(),
            self.parallelism,
            chunk_size
        );

        let mut chunks = Vec::new();
        let mut groups = groups.into_iter().peekable();
        while groups.peek().is_some() {
            chunks.push(groups.by_ref().take(chunk_size).collect::<Vec<_>>());
        }

        let tasks = chunks.into_iter().map(|chunk| {
            let analyzer = self.analyzer;
            tokio::task::spawn_blocking(move || {
                let mut fleet = FleetAnalysis::default();
                for (device_id, device_readings) in chunk {
                    fleet.record(&device_id, analyzer.analyze(&device_id, device_readings));
                }
                fleet
            })
        });

        let partials = futures::future::try_join_all(tasks)
            .await
            .context("Device analysis worker panicked")?;

        let mut fleet = FleetAnalysis::default();
        for partial in partials {
            fleet.merge(partial);
        }
        Ok(fleet)
    }
}
