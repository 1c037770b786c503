// Raw battery telemetry reading
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One battery sample reported by a handheld device.
///
/// Identity is `(device_id, timestamp)`. The legacy export names
/// (`serialNumber`, `academyId`) are accepted on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    #[serde(alias = "serialNumber")]
    pub device_id: String,
    #[serde(alias = "academyId")]
    pub school_id: i64,
    pub battery_level: f64,
    pub employee_id: String,
    pub timestamp: DateTime<Utc>,
}

impl Reading {
    pub fn new(
        device_id: impl Into<String>,
        school_id: i64,
        battery_level: f64,
        employee_id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            school_id,
            battery_level,
            employee_id: employee_id.into(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_legacy_field_names() {
        let json = r#"{
            "academyId": 7,
            "batteryLevel": 0.42,
            "employeeId": "T1007",
            "serialNumber": "1805C67HD02259",
            "timestamp": "2019-05-17T20:25:51.000Z"
        }"#;

        let reading: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.device_id, "1805C67HD02259");
        assert_eq!(reading.school_id, 7);
        assert_eq!(reading.battery_level, 0.42);
        assert_eq!(reading.timestamp.to_rfc3339(), "2019-05-17T20:25:51+00:00");
    }

    #[test]
    fn test_deserialize_current_field_names() {
        let json = r#"{
            "deviceId": "D1",
            "schoolId": 3,
            "batteryLevel": 1.0,
            "employeeId": "E1",
            "timestamp": "2024-01-01T09:00:00Z"
        }"#;

        let reading: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.device_id, "D1");
        assert_eq!(reading.school_id, 3);
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let json = r#"{ "deviceId": "D1", "schoolId": 3, "batteryLevel": 1.0 }"#;
        assert!(serde_json::from_str::<Reading>(json).is_err());
    }
}
