use crate::models::config::ReductionMethod;
use crate::models::point::SamplePoint;

/// Collapses a time-ordered chunk of points into one representative point.
///
/// The result carries the middle element's timestamp regardless of method,
/// so reduced points stay inside their source range. Single-point chunks
/// pass through unchanged, peak tag included. The empty case only arises if
/// a caller partitions badly; it yields a silent point at `now_ms` instead
/// of panicking.
pub fn reduce_chunk(chunk: &[SamplePoint], method: ReductionMethod, now_ms: u64) -> SamplePoint {
    match chunk {
        [] => SamplePoint::new(0.0, now_ms),
        [only] => *only,
        _ => {
            let timestamp_ms = chunk[chunk.len() / 2].timestamp_ms;
            match method {
                ReductionMethod::Rms => SamplePoint::new(rms_level(chunk), timestamp_ms),
                ReductionMethod::Average => SamplePoint::new(mean_level(chunk), timestamp_ms),
                ReductionMethod::Peak => {
                    let mut level = f32::NEG_INFINITY;
                    let mut tagged = false;
                    for point in chunk {
                        level = level.max(point.level);
                        tagged |= point.is_peak;
                    }
                    SamplePoint {
                        level,
                        timestamp_ms,
                        is_peak: tagged,
                    }
                }
            }
        }
    }
}

fn rms_level(chunk: &[SamplePoint]) -> f32 {
    let sum_sq: f32 = chunk.iter().map(|point| point.level * point.level).sum();
    (sum_sq / chunk.len() as f32).sqrt()
}

fn mean_level(chunk: &[SamplePoint]) -> f32 {
    let sum: f32 = chunk.iter().map(|point| point.level).sum();
    sum / chunk.len() as f32
}
