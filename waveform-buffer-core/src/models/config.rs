use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Converts a window width in minutes to session-clock milliseconds.
///
/// Negative or non-finite widths collapse to zero rather than wrapping.
pub(crate) fn minutes_to_ms(minutes: f64) -> u64 {
    if !minutes.is_finite() || minutes <= 0.0 {
        return 0;
    }
    (minutes * 60_000.0) as u64
}

/// Statistical method used to collapse a chunk of points into one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ReductionMethod {
    Rms,
    Peak,
    #[default]
    Average,
}

impl ReductionMethod {
    /// Parses a method tag: `"rms"`, `"peak"`, `"average"`, or the legacy
    /// alias `"max"` for peak. Anything else falls back to averaging with a
    /// warning.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "rms" => Self::Rms,
            "peak" | "max" => Self::Peak,
            "average" => Self::Average,
            other => {
                log::warn!("Unknown reduction method '{}', falling back to average", other);
                Self::Average
            }
        }
    }
}

impl From<String> for ReductionMethod {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<&str> for ReductionMethod {
    fn from(tag: &str) -> Self {
        Self::from_tag(tag)
    }
}

/// One time band of the progressive compression ladder.
///
/// Bands are ordered nearest-to-now first and their ranges are cumulative:
/// band `k` covers buffered points older than band `k - 1`'s range but within
/// its own, measured back from the current clock reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionBand {
    /// How far back from now this band reaches, in minutes.
    pub time_range_minutes: f64,

    /// Point budget for the band's window.
    pub max_points: usize,

    /// Reduction method applied when the window exceeds its budget.
    pub method: ReductionMethod,
}

impl ResolutionBand {
    pub fn new(time_range_minutes: f64, max_points: usize, method: ReductionMethod) -> Self {
        Self {
            time_range_minutes,
            max_points,
            method,
        }
    }

    pub(crate) fn window_ms(&self) -> u64 {
        minutes_to_ms(self.time_range_minutes)
    }
}

/// A named projection window offered to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomPreset {
    pub name: String,

    /// Window width in minutes, measured back from now.
    pub duration_minutes: f64,

    /// Point budget for the rendered sequence.
    pub max_points: usize,
}

impl ZoomPreset {
    pub fn new(name: impl Into<String>, duration_minutes: f64, max_points: usize) -> Self {
        Self {
            name: name.into(),
            duration_minutes,
            max_points,
        }
    }
}

/// Tuning profile for the waveform buffer.
///
/// The default profile targets multi-hour recordings sampled every ~50 ms
/// while keeping the buffer at a few thousand points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveformConfig {
    /// Hard ceiling on buffered points, enforced after every compression
    /// pass.
    pub max_total_points: usize,

    /// Width of the full-resolution recent window, in minutes.
    pub recent_data_minutes: f64,

    /// Cap on points kept inside the recent window by a compression pass.
    pub recent_data_points: usize,

    /// Minimum level for a sample to qualify as a peak.
    pub peak_threshold: f32,

    /// Progressive compression bands, nearest-to-now first.
    pub resolution_levels: Vec<ResolutionBand>,

    /// Named zoom windows offered to the presentation layer.
    pub zoom_levels: Vec<ZoomPreset>,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            max_total_points: 2000,
            recent_data_minutes: 2.0,
            recent_data_points: 600,
            peak_threshold: 0.6,
            resolution_levels: vec![
                ResolutionBand::new(5.0, 300, ReductionMethod::Peak),
                ResolutionBand::new(15.0, 200, ReductionMethod::Rms),
                ResolutionBand::new(30.0, 150, ReductionMethod::Rms),
                ResolutionBand::new(120.0, 100, ReductionMethod::Average),
            ],
            zoom_levels: vec![
                ZoomPreset::new("recent", 5.0, 200),
                ZoomPreset::new("overview", 20.0, 300),
                ZoomPreset::new("full", 120.0, 500),
            ],
        }
    }
}

impl WaveformConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_total_points == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !self.recent_data_minutes.is_finite() || self.recent_data_minutes <= 0.0 {
            return Err(ConfigError::InvalidRecentWindow);
        }
        if self.recent_data_points == 0 {
            return Err(ConfigError::ZeroRecentPoints);
        }
        if !self.peak_threshold.is_finite() || self.peak_threshold < 0.0 {
            return Err(ConfigError::InvalidPeakThreshold);
        }
        if self.resolution_levels.is_empty() {
            return Err(ConfigError::NoResolutionBands);
        }
        let mut reach = 0.0f64;
        for (index, band) in self.resolution_levels.iter().enumerate() {
            if band.max_points == 0 {
                return Err(ConfigError::ZeroBandBudget(index));
            }
            if !band.time_range_minutes.is_finite() || band.time_range_minutes <= reach {
                return Err(ConfigError::NonAscendingBands(index));
            }
            reach = band.time_range_minutes;
        }
        Ok(())
    }

    /// Returns a copy with the given overrides applied. Absent fields keep
    /// their current values.
    pub fn merged(&self, overrides: ConfigOverrides) -> Self {
        Self {
            max_total_points: overrides.max_total_points.unwrap_or(self.max_total_points),
            recent_data_minutes: overrides
                .recent_data_minutes
                .unwrap_or(self.recent_data_minutes),
            recent_data_points: overrides
                .recent_data_points
                .unwrap_or(self.recent_data_points),
            peak_threshold: overrides.peak_threshold.unwrap_or(self.peak_threshold),
            resolution_levels: overrides
                .resolution_levels
                .unwrap_or_else(|| self.resolution_levels.clone()),
            zoom_levels: overrides
                .zoom_levels
                .unwrap_or_else(|| self.zoom_levels.clone()),
        }
    }

    /// Looks up a zoom preset by name.
    pub fn preset(&self, name: &str) -> Option<&ZoomPreset> {
        self.zoom_levels.iter().find(|preset| preset.name == name)
    }

    pub(crate) fn recent_window_ms(&self) -> u64 {
        minutes_to_ms(self.recent_data_minutes)
    }
}

/// Partial configuration update, typically deserialized from a bridge call.
///
/// Applying overrides replaces the live configuration value going forward;
/// already-buffered points are never recompressed retroactively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigOverrides {
    pub max_total_points: Option<usize>,
    pub recent_data_minutes: Option<f64>,
    pub recent_data_points: Option<usize>,
    pub peak_threshold: Option<f32>,
    pub resolution_levels: Option<Vec<ResolutionBand>>,
    pub zoom_levels: Option<Vec<ZoomPreset>>,
}
