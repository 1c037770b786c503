// School-level rollup of processed devices
use super::device::ProcessedDevice;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolSummary {
    pub school_id: i64,
    pub total_devices: usize,
    pub healthy_devices: usize,
    pub unhealthy_devices: usize,
    pub unknown_devices: usize,
    pub unhealthy_percentage: f64,
    pub devices: Vec<ProcessedDevice>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }
}
