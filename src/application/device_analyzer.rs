// Device analysis - Turn raw readings into processed device records
use crate::application::health_classifier::HealthClassifier;
use crate::application::segment_extractor;
use crate::application::usage_rate::{self, UsageBreakdown};
use crate::domain::device::{DataQualityWarning, HealthStatus, ProcessedDevice};
use crate::domain::error::{AnalysisError, Result};
use crate::domain::reading::Reading;
use serde::Serialize;
use std::collections::HashMap;

/// Outcome of analyzing one device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceAnalysis {
    pub device: ProcessedDevice,
    pub warning: Option<DataQualityWarning>,
}

/// Outcome of analyzing a whole batch. Devices that failed analysis are
/// reported in `failures` and left out of `devices`.
#[derive(Debug, Clone, Default)]
pub struct FleetAnalysis {
    pub devices: Vec<ProcessedDevice>,
    pub warnings: Vec<DataQualityWarning>,
    pub failures: Vec<(String, AnalysisError)>,
}

impl FleetAnalysis {
    pub fn record(&mut self, device_id: &str, outcome: Result<DeviceAnalysis>) {
        match outcome {
            Ok(analysis) => {
                self.warnings.extend(analysis.warning);
                self.devices.push(analysis.device);
            }
            Err(e) => {
                tracing::error!("Skipping device {}: {}", device_id, e);
                self.failures.push((device_id.to_string(), e));
            }
        }
    }

    pub fn merge(&mut self, other: FleetAnalysis) {
        self.devices.extend(other.devices);
        self.warnings.extend(other.warnings);
        self.failures.extend(other.failures);
    }
}

/// Segment-by-segment view of how a device's rate was derived.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDiagnostics {
    pub device_id: String,
    pub total_readings: usize,
    pub breakdown: UsageBreakdown,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceAnalyzer {
    classifier: HealthClassifier,
}

impl DeviceAnalyzer {
    pub fn new(classifier: HealthClassifier) -> Self {
        Self { classifier }
    }

    /// Analyze every device in the batch, in order of first appearance.
    pub fn analyze_all(&self, readings: &[Reading]) -> FleetAnalysis {
        let mut fleet = FleetAnalysis::default();
        for (device_id, device_readings) in group_by_device(readings) {
            fleet.record(&device_id, self.analyze(&device_id, device_readings));
        }
        fleet
    }

    /// Analyze all readings of a single device.
    pub fn analyze(&self, device_id: &str, mut readings: Vec<Reading>) -> Result<DeviceAnalysis> {
        sort_chronologically(&mut readings);

        let Some(last) = readings.last() else {
            return Err(AnalysisError::NoReadings {
                device_id: device_id.to_string(),
            });
        };

        if readings.len() == 1 {
            return Ok(DeviceAnalysis {
                device: ProcessedDevice {
                    device_id: device_id.to_string(),
                    school_id: last.school_id,
                    current_battery_level: last.battery_level,
                    daily_usage_rate: 0.0,
                    health_status: HealthStatus::Unknown,
                    last_reading_time: last.timestamp,
                    total_readings: 1,
                },
                warning: None,
            });
        }

        let segments = segment_extractor::extract(&readings);
        let daily_usage_rate = usage_rate::estimate(&segments)?;
        let classification = self.classifier.classify(device_id, daily_usage_rate);

        Ok(DeviceAnalysis {
            device: ProcessedDevice {
                device_id: device_id.to_string(),
                school_id: last.school_id,
                current_battery_level: last.battery_level,
                daily_usage_rate,
                health_status: classification.status,
                last_reading_time: last.timestamp,
                total_readings: readings.len(),
            },
            warning: classification.warning,
        })
    }

    /// Debug projection of [`DeviceAnalyzer::analyze`] for a single device.
    pub fn analyze_detailed(&self, device_id: &str, mut readings: Vec<Reading>) -> Result<DeviceDiagnostics> {
        if readings.is_empty() {
            return Err(AnalysisError::NoReadings {
                device_id: device_id.to_string(),
            });
        }
        sort_chronologically(&mut readings);

        let segments = segment_extractor::extract(&readings);
        Ok(DeviceDiagnostics {
            device_id: device_id.to_string(),
            total_readings: readings.len(),
            breakdown: usage_rate::estimate_detailed(&segments)?,
        })
    }
}

/// Group readings by device id, keeping first-appearance order of devices
/// and input order within each device.
pub fn group_by_device(readings: &[Reading]) -> Vec<(String, Vec<Reading>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<Reading>)> = Vec::new();

    for reading in readings {
        let slot = *index.entry(reading.device_id.as_str()).or_insert_with(|| {
            groups.push((reading.device_id.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(reading.clone());
    }

    groups
}

// Stable, so equal timestamps keep input order.
fn sort_chronologically(readings: &mut [Reading]) {
    readings.sort_by_key(|r| r.timestamp);
}
