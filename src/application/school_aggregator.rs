// School aggregation - Roll devices up per school and rank by urgency
use crate::domain::device::{HealthStatus, ProcessedDevice};
use crate::domain::error::{AnalysisError, Result};
use crate::domain::school::{RiskLevel, SchoolSummary};
use crate::infrastructure::config::{RankingStrategy, RiskThresholds};
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default)]
pub struct SchoolAggregator {
    risk: RiskThresholds,
}

impl SchoolAggregator {
    pub fn new(risk: RiskThresholds) -> Self {
        Self { risk }
    }

    /// Summaries ranked most urgent first by the priority comparator.
    pub fn aggregate(&self, devices: &[ProcessedDevice]) -> Result<Vec<SchoolSummary>> {
        self.aggregate_with(devices, RankingStrategy::Priority)
    }

    pub fn aggregate_with(
        &self,
        devices: &[ProcessedDevice],
        strategy: RankingStrategy,
    ) -> Result<Vec<SchoolSummary>> {
        let mut summaries = group_by_school(devices)
            .into_iter()
            .map(|(school_id, devices)| summarize(school_id, devices))
            .collect::<Result<Vec<_>>>()?;

        // sort_by is stable, so residual ties keep discovery order
        match strategy {
            RankingStrategy::Priority => summaries.sort_by(compare_priority),
            RankingStrategy::RiskScore => summaries.sort_by(|a, b| {
                self.risk_score(b)
                    .total_cmp(&self.risk_score(a))
                    .then_with(|| compare_priority(a, b))
            }),
        }

        tracing::debug!("Ranked {} schools using {:?} ordering", summaries.len(), strategy);
        Ok(summaries)
    }

    /// Composite of the absolute unhealthy count and the unhealthy share.
    pub fn risk_score(&self, school: &SchoolSummary) -> f64 {
        let absolute_score = school.unhealthy_devices as f64 * self.risk.absolute_scale;
        absolute_score * self.risk.absolute_weight
            + school.unhealthy_percentage * self.risk.percentage_weight
    }

    pub fn risk_level(&self, school: &SchoolSummary) -> RiskLevel {
        let score = self.risk_score(school);
        if score >= self.risk.critical {
            RiskLevel::Critical
        } else if score >= self.risk.high {
            RiskLevel::High
        } else if score >= self.risk.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Unhealthy count, then unhealthy share, then size; all descending.
fn compare_priority(a: &SchoolSummary, b: &SchoolSummary) -> Ordering {
    b.unhealthy_devices
        .cmp(&a.unhealthy_devices)
        .then_with(|| b.unhealthy_percentage.total_cmp(&a.unhealthy_percentage))
        .then_with(|| b.total_devices.cmp(&a.total_devices))
}

fn group_by_school(devices: &[ProcessedDevice]) -> Vec<(i64, Vec<ProcessedDevice>)> {
    let mut index: HashMap<i64, usize> = HashMap::new();
    let mut groups: Vec<(i64, Vec<ProcessedDevice>)> = Vec::new();

    for device in devices {
        let slot = *index.entry(device.school_id).or_insert_with(|| {
            groups.push((device.school_id, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(device.clone());
    }

    groups
}

fn summarize(school_id: i64, mut devices: Vec<ProcessedDevice>) -> Result<SchoolSummary> {
    devices.sort_by(|a, b| a.device_id.cmp(&b.device_id));

    let count = |status: HealthStatus| devices.iter().filter(|d| d.health_status == status).count();
    let total_devices = devices.len();
    let healthy_devices = count(HealthStatus::Healthy);
    let unhealthy_devices = count(HealthStatus::NeedsReplacement);
    let unknown_devices = count(HealthStatus::Unknown);

    check_counts(school_id, healthy_devices, unhealthy_devices, unknown_devices, total_devices)?;

    let unhealthy_percentage = if total_devices > 0 {
        unhealthy_devices as f64 / total_devices as f64 * 100.0
    } else {
        0.0
    };

    Ok(SchoolSummary {
        school_id,
        total_devices,
        healthy_devices,
        unhealthy_devices,
        unknown_devices,
        unhealthy_percentage,
        devices,
    })
}

fn check_counts(
    school_id: i64,
    healthy: usize,
    unhealthy: usize,
    unknown: usize,
    total: usize,
) -> Result<()> {
    if healthy + unhealthy + unknown != total {
        return Err(AnalysisError::CountMismatch {
            school_id,
            healthy,
            unhealthy,
            unknown,
            total,
        });
    }
    Ok(())
}
