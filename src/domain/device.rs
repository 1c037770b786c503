// Per-device analysis result
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HealthStatus {
    Healthy,
    NeedsReplacement,
    Unknown,
}

/// Summary of one device over the analyzed batch.
///
/// `daily_usage_rate` of `0.0` means "unknown", not "no degradation".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedDevice {
    pub device_id: String,
    pub school_id: i64,
    pub current_battery_level: f64,
    pub daily_usage_rate: f64,
    pub health_status: HealthStatus,
    pub last_reading_time: DateTime<Utc>,
    pub total_readings: usize,
}

/// Emitted when a computed rate exceeds what the hardware can physically
/// discharge in a day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQualityWarning {
    pub device_id: String,
    pub daily_usage_rate: f64,
    pub ceiling: f64,
}
