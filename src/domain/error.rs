use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalysisError {
    #[error("device {device_id}: no readings to analyze")]
    NoReadings { device_id: String },

    #[error(
        "device {device_id}: discharge segment ends at {end} before it starts at {start} ({elapsed_hours:.3}h)"
    )]
    NegativeElapsedTime {
        device_id: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        elapsed_hours: f64,
    },

    #[error(
        "school {school_id}: {healthy} healthy + {unhealthy} unhealthy + {unknown} unknown != {total} devices"
    )]
    CountMismatch {
        school_id: i64,
        healthy: usize,
        unhealthy: usize,
        unknown: usize,
        total: usize,
    },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
