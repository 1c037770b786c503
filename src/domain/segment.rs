// Continuous-discharge segment of a single device
use crate::domain::reading::Reading;
use chrono::{DateTime, Utc};

/// A run of two or more consecutive readings with non-increasing battery
/// level.
#[derive(Debug, Clone, PartialEq)]
pub struct DischargeSegment {
    readings: Vec<Reading>,
}

impl DischargeSegment {
    /// Returns `None` for runs too short to carry rate information or
    /// containing a level increase.
    pub fn new(readings: Vec<Reading>) -> Option<Self> {
        let discharging = readings
            .windows(2)
            .all(|pair| pair[1].battery_level <= pair[0].battery_level);
        if readings.len() < 2 || !discharging {
            return None;
        }
        Some(Self { readings })
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn reading_count(&self) -> usize {
        self.readings.len()
    }

    pub fn first(&self) -> &Reading {
        &self.readings[0]
    }

    pub fn last(&self) -> &Reading {
        &self.readings[self.readings.len() - 1]
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.first().timestamp
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.last().timestamp
    }

    /// Net battery fraction lost between the first and last reading.
    pub fn battery_drop(&self) -> f64 {
        self.first().battery_level - self.last().battery_level
    }

    /// Hours between the first and last reading. Negative only if the
    /// input was not sorted.
    pub fn elapsed_hours(&self) -> f64 {
        (self.end_time() - self.start_time()).as_seconds_f64() / 3600.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reading(level: f64, hour: u32) -> Reading {
        Reading::new("D1", 1, level, "E1", Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap())
    }

    #[test]
    fn test_single_reading_is_not_a_segment() {
        assert!(DischargeSegment::new(vec![reading(0.5, 0)]).is_none());
        assert!(DischargeSegment::new(Vec::new()).is_none());
    }

    #[test]
    fn test_level_increase_is_not_a_segment() {
        assert!(DischargeSegment::new(vec![reading(0.5, 0), reading(0.6, 1)]).is_none());
        assert!(DischargeSegment::new(vec![reading(0.9, 0), reading(0.7, 1), reading(0.8, 2)]).is_none());
        assert!(DischargeSegment::new(vec![reading(0.7, 0), reading(0.7, 1)]).is_some());
    }

    #[test]
    fn test_sub_millisecond_elapsed_time_is_kept() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let segment = DischargeSegment::new(vec![
            Reading::new("D1", 1, 0.9, "E1", start),
            Reading::new("D1", 1, 0.8, "E1", start + chrono::Duration::microseconds(500)),
        ])
        .unwrap();

        assert!((segment.elapsed_hours() - 0.0005 / 3600.0).abs() < 1e-15);
    }

    #[test]
    fn test_drop_and_elapsed_hours() {
        let segment =
            DischargeSegment::new(vec![reading(0.9, 2), reading(0.8, 5), reading(0.6, 8)]).unwrap();

        assert_eq!(segment.reading_count(), 3);
        assert!((segment.battery_drop() - 0.3).abs() < 1e-9);
        assert_eq!(segment.elapsed_hours(), 6.0);
    }
}
