use serde::{Deserialize, Serialize};

/// One buffered audio-level sample.
///
/// Levels are normalized by the caller (typically `0.0..=1.0`) and stored
/// unchanged. Timestamps come from the session clock and are strictly
/// buffer-ordering keys, not wall-clock times.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplePoint {
    /// Normalized level for one sampling interval.
    pub level: f32,

    /// Milliseconds on the session clock when the sample arrived. For
    /// reduced points, the middle source sample's timestamp.
    #[serde(rename = "timestamp")]
    pub timestamp_ms: u64,

    /// Local-maximum tag assigned at ingest. Survives reduction only under
    /// the peak method.
    #[serde(default)]
    pub is_peak: bool,
}

impl SamplePoint {
    pub fn new(level: f32, timestamp_ms: u64) -> Self {
        Self {
            level,
            timestamp_ms,
            is_peak: false,
        }
    }

    pub fn peak(level: f32, timestamp_ms: u64) -> Self {
        Self {
            level,
            timestamp_ms,
            is_peak: true,
        }
    }
}
