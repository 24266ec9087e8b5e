use serde::{Deserialize, Serialize};

use super::point::SamplePoint;

/// Nominal ingest cadence assumed when estimating how many samples a raw
/// feed would have produced.
pub const NOMINAL_SAMPLE_INTERVAL_MS: u64 = 50;

/// Fixed per-point footprint used for the buffer size estimate.
pub const POINT_SIZE_BYTES: usize = 16;

/// Snapshot of buffer health, recomputed from the live buffer rather than
/// maintained incrementally.
///
/// Serializable for JSON export to the embedding bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveformStatistics {
    /// Points currently buffered.
    pub total_points: usize,

    /// Minutes elapsed since the session started.
    pub duration_minutes: f64,

    /// Estimated buffer footprint in kilobytes.
    pub estimated_size_kb: f64,

    /// Raw samples the elapsed time would have produced, divided by the
    /// buffered count. `1.0` until enough time has passed to expect samples.
    pub compression_ratio: f64,

    /// Points in the buffer still carrying their peak tag.
    pub peak_count: usize,

    /// Percentage of would-be raw samples the buffer no longer stores.
    /// Negative while the buffer briefly holds more than the expectation.
    pub memory_efficiency: f64,

    /// Identifier of the session this snapshot belongs to, if one started.
    pub session_id: Option<String>,

    /// RFC 3339 wall-clock time the session started, if one started.
    pub started_at: Option<String>,
}

impl Default for WaveformStatistics {
    fn default() -> Self {
        Self {
            total_points: 0,
            duration_minutes: 0.0,
            estimated_size_kb: 0.0,
            compression_ratio: 1.0,
            peak_count: 0,
            memory_efficiency: 0.0,
            session_id: None,
            started_at: None,
        }
    }
}

impl WaveformStatistics {
    /// Computes a fresh snapshot for the given buffer and session epoch.
    ///
    /// Every division guards its zero denominator: the ratio degrades to
    /// `1.0` and the efficiency to `0.0` instead of going non-finite.
    pub fn compute(points: &[SamplePoint], session_start_ms: u64, now_ms: u64) -> Self {
        let elapsed_ms = now_ms.saturating_sub(session_start_ms);
        let expected_points = (elapsed_ms / NOMINAL_SAMPLE_INTERVAL_MS) as usize;
        let total_points = points.len();

        let compression_ratio = if expected_points > 0 && total_points > 0 {
            expected_points as f64 / total_points as f64
        } else {
            1.0
        };
        let memory_efficiency = if expected_points > 0 {
            (1.0 - total_points as f64 / expected_points as f64) * 100.0
        } else {
            0.0
        };

        Self {
            total_points,
            duration_minutes: elapsed_ms as f64 / 60_000.0,
            estimated_size_kb: (total_points * POINT_SIZE_BYTES) as f64 / 1024.0,
            compression_ratio,
            peak_count: points.iter().filter(|point| point.is_peak).count(),
            memory_efficiency,
            session_id: None,
            started_at: None,
        }
    }
}
