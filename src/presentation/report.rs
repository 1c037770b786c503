// Report rendering - Ranked school table and JSON output
use crate::application::fleet_service::FleetReport;
use crate::application::school_aggregator::SchoolAggregator;
use crate::domain::device::DataQualityWarning;
use crate::domain::school::{RiskLevel, SchoolSummary};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RankedSchool<'a> {
    rank: usize,
    risk_score: f64,
    risk_level: RiskLevel,
    #[serde(flatten)]
    summary: &'a SchoolSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportView<'a> {
    generated_at: DateTime<Utc>,
    total_readings: usize,
    schools: Vec<RankedSchool<'a>>,
    warnings: &'a [DataQualityWarning],
    failures: Vec<String>,
}

pub fn render_json(report: &FleetReport, aggregator: &SchoolAggregator) -> serde_json::Result<String> {
    let view = ReportView {
        generated_at: report.generated_at,
        total_readings: report.total_readings,
        schools: report
            .schools
            .iter()
            .enumerate()
            .map(|(i, summary)| RankedSchool {
                rank: i + 1,
                risk_score: aggregator.risk_score(summary),
                risk_level: aggregator.risk_level(summary),
                summary,
            })
            .collect(),
        warnings: &report.warnings,
        failures: report
            .failures
            .iter()
            .map(|(device_id, e)| format!("{}: {}", device_id, e))
            .collect(),
    };
    serde_json::to_string_pretty(&view)
}

pub fn render_table(report: &FleetReport, aggregator: &SchoolAggregator) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:>8}  {:>7}  {:>7}  {:>9}  {:>7}  {:>10}  {:>6}  {:<8}",
        "Rank", "School", "Devices", "Healthy", "Unhealthy", "Unknown", "Unhealthy%", "Score", "Risk"
    );

    for (i, school) in report.schools.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>4}  {:>8}  {:>7}  {:>7}  {:>9}  {:>7}  {:>9.1}%  {:>6.1}  {:<8}",
            i + 1,
            school.school_id,
            school.total_devices,
            school.healthy_devices,
            school.unhealthy_devices,
            school.unknown_devices,
            school.unhealthy_percentage,
            aggregator.risk_score(school),
            aggregator.risk_level(school).label()
        );
    }

    let _ = writeln!(
        out,
        "\n{} readings, {} schools, {} data quality warnings, {} failed devices",
        report.total_readings,
        report.schools.len(),
        report.warnings.len(),
        report.failures.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::device::{HealthStatus, ProcessedDevice};
    use crate::domain::error::AnalysisError;

    fn report() -> FleetReport {
        let device = ProcessedDevice {
            device_id: "A".to_string(),
            school_id: 12,
            current_battery_level: 0.4,
            daily_usage_rate: 0.5,
            health_status: HealthStatus::NeedsReplacement,
            last_reading_time: Utc::now(),
            total_readings: 2,
        };
        FleetReport {
            schools: vec![SchoolSummary {
                school_id: 12,
                total_devices: 1,
                healthy_devices: 0,
                unhealthy_devices: 1,
                unknown_devices: 0,
                unhealthy_percentage: 100.0,
                devices: vec![device],
            }],
            warnings: Vec::new(),
            failures: vec![(
                "B".to_string(),
                AnalysisError::NoReadings {
                    device_id: "B".to_string(),
                },
            )],
            total_readings: 3,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_render_table() {
        let table = render_table(&report(), &SchoolAggregator::default());
        let row = table.lines().nth(1).unwrap();

        assert!(row.contains("12"));
        assert!(row.contains("100.0%"));
        // 0.6 * 10 + 0.4 * 100 = 46
        assert!(row.contains("46.0"));
        assert!(row.ends_with("High    "));
        assert!(table.contains("1 failed devices"));
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&report(), &SchoolAggregator::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let school = &value["schools"][0];
        assert_eq!(school["rank"], 1);
        assert_eq!(school["schoolId"], 12);
        assert_eq!(school["riskLevel"], "High");
        assert_eq!(school["devices"][0]["healthStatus"], "NeedsReplacement");
        assert_eq!(value["failures"][0], "B: device B: no readings to analyze");
    }
}
