// Segment extraction - Split a device's history into discharge runs
use crate::domain::reading::Reading;
use crate::domain::segment::DischargeSegment;

/// Splits chronologically sorted readings of one device into discharge
/// segments.
///
/// Any increase in battery level between adjacent samples counts as a
/// charging event and closes the current run, however small the increase.
/// Runs with fewer than two readings are dropped.
pub fn extract(readings: &[Reading]) -> Vec<DischargeSegment> {
    let mut segments = Vec::new();
    let mut current: Vec<Reading> = Vec::new();

    for reading in readings {
        let charged = current
            .last()
            .is_some_and(|previous| reading.battery_level > previous.battery_level);

        if charged {
            let run = std::mem::take(&mut current);
            segments.extend(DischargeSegment::new(run));
        }
        current.push(reading.clone());
    }

    segments.extend(DischargeSegment::new(current));
    segments
}
