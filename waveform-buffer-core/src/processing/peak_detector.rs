use crate::models::point::SamplePoint;

/// Trailing window consulted by the local-maximum rule, in points.
pub const PEAK_DETECTION_WINDOW: usize = 5;

/// Minimum spacing between two tagged peaks, in milliseconds.
pub const MIN_PEAK_DISTANCE_MS: u64 = 100;

/// Tags locally maximal samples as they arrive.
///
/// A sample is evaluated against points already buffered, before it is
/// appended, so the decision never depends on samples that arrive later.
/// The only state carried between calls is the timestamp of the last tagged
/// peak.
#[derive(Debug, Default)]
pub struct PeakDetector {
    last_peak_ms: Option<u64>,
}

impl PeakDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decides whether the incoming sample is a peak. Rules short-circuit
    /// in order:
    ///
    /// 1. levels below `threshold` never qualify;
    /// 2. a sample closer than [`MIN_PEAK_DISTANCE_MS`] to the last tagged
    ///    peak never qualifies;
    /// 3. otherwise the sample qualifies when its level is at least every
    ///    level among the last [`PEAK_DETECTION_WINDOW`] buffered points.
    ///    An empty buffer satisfies this vacuously.
    ///
    /// Only a tagged peak updates the spacing state; rejected samples leave
    /// it untouched.
    pub fn observe(
        &mut self,
        level: f32,
        timestamp_ms: u64,
        threshold: f32,
        buffered: &[SamplePoint],
    ) -> bool {
        if level < threshold {
            return false;
        }
        if let Some(last_ms) = self.last_peak_ms {
            if timestamp_ms.saturating_sub(last_ms) < MIN_PEAK_DISTANCE_MS {
                return false;
            }
        }

        let window_start = buffered.len().saturating_sub(PEAK_DETECTION_WINDOW);
        let is_local_max = buffered[window_start..]
            .iter()
            .all(|point| level >= point.level);
        if is_local_max {
            self.last_peak_ms = Some(timestamp_ms);
        }
        is_local_max
    }

    /// Forgets the last tagged peak. Called on session start and reset.
    pub fn reset(&mut self) {
        self.last_peak_ms = None;
    }
}
