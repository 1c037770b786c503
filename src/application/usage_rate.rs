// Usage rate estimation - Duration-weighted daily discharge across segments
use crate::domain::error::{AnalysisError, Result};
use crate::domain::segment::DischargeSegment;
use chrono::{DateTime, Utc};
use serde::Serialize;

const HOURS_PER_DAY: f64 = 24.0;

/// One segment's contribution to a usage estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentBreakdown {
    pub segment_index: usize,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub start_level: f64,
    pub end_level: f64,
    pub battery_drop: f64,
    pub elapsed_hours: f64,
    pub daily_rate: f64,
    pub readings: usize,
    /// False for flat or zero-length segments, which are left out of the mean.
    pub contributes: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageBreakdown {
    pub segments: Vec<SegmentBreakdown>,
    pub daily_rate: f64,
}

/// Fractional battery loss per 24 hours, weighted by segment duration.
///
/// Returns `0.0` when no segment has both a positive drop and positive
/// duration. Callers must read that as "insufficient data".
pub fn estimate(segments: &[DischargeSegment]) -> Result<f64> {
    Ok(estimate_detailed(segments)?.daily_rate)
}

/// Same computation as [`estimate`], keeping the per-segment figures.
pub fn estimate_detailed(segments: &[DischargeSegment]) -> Result<UsageBreakdown> {
    let mut breakdown = Vec::with_capacity(segments.len());
    let mut weighted_usage = 0.0;
    let mut total_hours = 0.0;

    for (index, segment) in segments.iter().enumerate() {
        let elapsed_hours = segment.elapsed_hours();
        if elapsed_hours < 0.0 {
            return Err(AnalysisError::NegativeElapsedTime {
                device_id: segment.first().device_id.clone(),
                start: segment.start_time(),
                end: segment.end_time(),
                elapsed_hours,
            });
        }

        let battery_drop = segment.battery_drop();
        let contributes = elapsed_hours > 0.0 && battery_drop > 0.0;
        let daily_rate = if elapsed_hours > 0.0 {
            battery_drop / elapsed_hours * HOURS_PER_DAY
        } else {
            0.0
        };

        if contributes {
            tracing::debug!(
                "Segment {} of {}: {:.3} drop over {:.1}h = {:.3} daily rate",
                index,
                segment.first().device_id,
                battery_drop,
                elapsed_hours,
                daily_rate
            );
            weighted_usage += daily_rate * elapsed_hours;
            total_hours += elapsed_hours;
        }

        breakdown.push(SegmentBreakdown {
            segment_index: index,
            start_time: segment.start_time(),
            end_time: segment.end_time(),
            start_level: segment.first().battery_level,
            end_level: segment.last().battery_level,
            battery_drop,
            elapsed_hours,
            daily_rate,
            readings: segment.reading_count(),
            contributes,
        });
    }

    let daily_rate = if total_hours > 0.0 {
        weighted_usage / total_hours
    } else {
        0.0
    };

    Ok(UsageBreakdown {
        segments: breakdown,
        daily_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reading::Reading;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    }

    fn segment(points: &[(i64, f64)]) -> DischargeSegment {
        let readings = points
            .iter()
            .map(|(hours, level)| Reading::new("D1", 1, *level, "E1", start() + Duration::hours(*hours)))
            .collect();
        DischargeSegment::new(readings).unwrap()
    }

    #[test]
    fn test_no_segments_is_sentinel_zero() {
        assert_eq!(estimate(&[]).unwrap(), 0.0);
    }

    #[test]
    fn test_single_segment_rate() {
        // 20% over 36 hours
        let rate = estimate(&[segment(&[(0, 1.0), (12, 0.9), (36, 0.8)])]).unwrap();
        assert!((rate - 0.2 / 1.5).abs() < 1e-3);
    }

    #[test]
    fn test_longer_segments_dominate() {
        // 0.1 over 24h (0.1/day) and 0.1 over 2h (1.2/day)
        let segments = [segment(&[(0, 0.9), (24, 0.8)]), segment(&[(30, 0.9), (32, 0.8)])];
        let rate = estimate(&segments).unwrap();

        let expected = (0.1 * 24.0 + 1.2 * 2.0) / 26.0;
        assert!((rate - expected).abs() < 1e-9);
    }

    #[test]
    fn test_flat_and_instant_segments_are_excluded() {
        let segments = [
            segment(&[(0, 0.5), (10, 0.5)]),
            segment(&[(11, 0.9), (11, 0.8)]),
            segment(&[(12, 0.8), (24, 0.7)]),
        ];
        let breakdown = estimate_detailed(&segments).unwrap();

        let contributing: Vec<bool> = breakdown.segments.iter().map(|s| s.contributes).collect();
        assert_eq!(contributing, vec![false, false, true]);
        assert!((breakdown.daily_rate - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_only_flat_segments_is_sentinel_zero() {
        let rate = estimate(&[segment(&[(0, 0.5), (10, 0.5), (20, 0.5)])]).unwrap();
        assert_eq!(rate, 0.0);
    }

    #[test]
    fn test_negative_elapsed_time_is_invariant_violation() {
        let result = estimate(&[segment(&[(10, 0.9), (2, 0.8)])]);
        assert!(matches!(
            result,
            Err(AnalysisError::NegativeElapsedTime { ref device_id, .. }) if device_id == "D1"
        ));
    }

    #[test]
    fn test_detailed_matches_estimate() {
        let segments = [
            segment(&[(0, 1.0), (5, 0.8), (9, 0.7)]),
            segment(&[(10, 0.95), (20, 0.6)]),
        ];
        let breakdown = estimate_detailed(&segments).unwrap();

        assert_eq!(breakdown.daily_rate, estimate(&segments).unwrap());
        assert_eq!(breakdown.segments.len(), 2);
        assert_eq!(breakdown.segments[0].readings, 3);
        assert_eq!(breakdown.segments[1].segment_index, 1);
        assert_eq!(breakdown.segments[1].elapsed_hours, 10.0);
    }
}
