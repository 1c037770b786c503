// Health classification - Map a daily usage rate to a device health status
use crate::domain::device::{DataQualityWarning, HealthStatus};
use crate::infrastructure::config::HealthThresholds;

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub status: HealthStatus,
    /// Set when the rate was physically impossible and got discarded.
    pub warning: Option<DataQualityWarning>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HealthClassifier {
    thresholds: HealthThresholds,
}

impl HealthClassifier {
    pub fn new(thresholds: HealthThresholds) -> Self {
        Self { thresholds }
    }

    pub fn classify(&self, device_id: &str, daily_usage_rate: f64) -> Classification {
        if daily_usage_rate == 0.0 {
            return Classification {
                status: HealthStatus::Unknown,
                warning: None,
            };
        }

        if daily_usage_rate > self.thresholds.max_plausible_rate {
            tracing::warn!(
                "Impossible daily usage rate {:.3} for device {} - treating as Unknown",
                daily_usage_rate,
                device_id
            );
            return Classification {
                status: HealthStatus::Unknown,
                warning: Some(DataQualityWarning {
                    device_id: device_id.to_string(),
                    daily_usage_rate,
                    ceiling: self.thresholds.max_plausible_rate,
                }),
            };
        }

        let status = if daily_usage_rate >= self.thresholds.replacement_rate {
            HealthStatus::NeedsReplacement
        } else {
            HealthStatus::Healthy
        };

        Classification {
            status,
            warning: None,
        }
    }
}
