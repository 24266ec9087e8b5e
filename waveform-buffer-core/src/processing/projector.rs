use serde::{Deserialize, Serialize};

use crate::models::config::{minutes_to_ms, WaveformConfig};
use crate::models::point::SamplePoint;

/// Window applied when an unknown preset name is requested.
pub const FALLBACK_ZOOM_MINUTES: f64 = 20.0;

/// Point budget applied when an unknown preset name is requested.
pub const FALLBACK_ZOOM_POINTS: usize = 300;

/// How a caller names the window it wants rendered: a configured preset by
/// name, or an explicit width in minutes.
///
/// Deserializes from the bridge's dual wire shape, where a zoom argument is
/// either a string or a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ZoomSelector {
    Named(String),
    Duration(f64),
}

impl From<&str> for ZoomSelector {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for ZoomSelector {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<f64> for ZoomSelector {
    fn from(minutes: f64) -> Self {
        Self::Duration(minutes)
    }
}

/// A fully resolved projection window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomTarget {
    pub duration_minutes: f64,
    pub max_points: usize,
}

/// Resolves a selector against the configured presets.
///
/// Unknown preset names degrade to a fixed 20-minute, 300-point window with
/// a warning instead of failing the call. Duration selectors take the
/// buffer-wide capacity as their budget. An explicit override, when given,
/// beats whichever budget was resolved.
pub fn resolve(
    selector: &ZoomSelector,
    max_points_override: Option<usize>,
    config: &WaveformConfig,
) -> ZoomTarget {
    let resolved = match selector {
        ZoomSelector::Duration(minutes) => ZoomTarget {
            duration_minutes: *minutes,
            max_points: config.max_total_points,
        },
        ZoomSelector::Named(name) => match config.preset(name) {
            Some(preset) => ZoomTarget {
                duration_minutes: preset.duration_minutes,
                max_points: preset.max_points,
            },
            None => {
                log::warn!(
                    "Unknown zoom preset '{}', falling back to {} min / {} points",
                    name,
                    FALLBACK_ZOOM_MINUTES,
                    FALLBACK_ZOOM_POINTS
                );
                ZoomTarget {
                    duration_minutes: FALLBACK_ZOOM_MINUTES,
                    max_points: FALLBACK_ZOOM_POINTS,
                }
            }
        },
    };

    match max_points_override {
        Some(max_points) => ZoomTarget {
            max_points,
            ..resolved
        },
        None => resolved,
    }
}

/// Projects the buffer into a flat level sequence for rendering.
///
/// Points inside the window are returned verbatim when they fit the budget.
/// Otherwise contiguous index ranges collapse to their RMS, always RMS,
/// independent of any band's configured reduction method. The input must be
/// sorted by timestamp.
pub fn project(points: &[SamplePoint], target: ZoomTarget, now_ms: u64) -> Vec<f32> {
    let window_start_ms = now_ms.saturating_sub(minutes_to_ms(target.duration_minutes));
    let first_visible = points.partition_point(|point| point.timestamp_ms < window_start_ms);
    let visible = &points[first_visible..];

    if visible.len() <= target.max_points {
        return visible.iter().map(|point| point.level).collect();
    }
    if target.max_points == 0 {
        return Vec::new();
    }
    downsample_rms(visible, target.max_points)
}

/// Collapses `points` into at most `max_points` RMS values over contiguous
/// index ranges `[i * len / n, (i + 1) * len / n)`. Ranges emptied by
/// rounding are skipped, so the output can come up short.
fn downsample_rms(points: &[SamplePoint], max_points: usize) -> Vec<f32> {
    let len = points.len();
    let mut output = Vec::with_capacity(max_points);

    for i in 0..max_points {
        let range_start = i * len / max_points;
        let range_end = (i + 1) * len / max_points;
        if range_start == range_end {
            continue;
        }
        let range = &points[range_start..range_end];
        let sum_sq: f32 = range.iter().map(|point| point.level * point.level).sum();
        output.push((sum_sq / range.len() as f32).sqrt());
    }
    output
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::models::config::ZoomPreset;

    use super::*;

    fn feed(count: usize, start_ms: u64, step_ms: u64) -> Vec<SamplePoint> {
        (0..count)
            .map(|i| SamplePoint::new((i % 10) as f32 / 10.0, start_ms + i as u64 * step_ms))
            .collect()
    }

    #[test]
    fn resolve_finds_named_presets() {
        let config = WaveformConfig::default();
        let target = resolve(&ZoomSelector::from("overview"), None, &config);

        assert_eq!(target.duration_minutes, 20.0);
        assert_eq!(target.max_points, 300);
    }

    #[test]
    fn resolve_falls_back_on_unknown_presets() {
        let config = WaveformConfig::default();
        let target = resolve(&ZoomSelector::from("galactic"), None, &config);

        assert_eq!(target.duration_minutes, FALLBACK_ZOOM_MINUTES);
        assert_eq!(target.max_points, FALLBACK_ZOOM_POINTS);
    }

    #[test]
    fn resolve_duration_uses_global_capacity_as_budget() {
        let config = WaveformConfig::default();
        let target = resolve(&ZoomSelector::from(7.5), None, &config);

        assert_eq!(target.duration_minutes, 7.5);
        assert_eq!(target.max_points, config.max_total_points);
    }

    #[test]
    fn resolve_override_beats_any_budget() {
        let config = WaveformConfig::default();

        let named = resolve(&ZoomSelector::from("recent"), Some(64), &config);
        assert_eq!(named.max_points, 64);

        let unknown = resolve(&ZoomSelector::from("galactic"), Some(64), &config);
        assert_eq!(unknown.max_points, 64);
        assert_eq!(unknown.duration_minutes, FALLBACK_ZOOM_MINUTES);
    }

    #[test]
    fn selector_deserializes_from_string_or_number() {
        let named: ZoomSelector = serde_json::from_str(r#""recent""#).unwrap();
        assert_eq!(named, ZoomSelector::Named("recent".to_string()));

        let duration: ZoomSelector = serde_json::from_str("12.5").unwrap();
        assert_eq!(duration, ZoomSelector::Duration(12.5));
    }

    #[test]
    fn projection_is_verbatim_when_under_budget() {
        let points = feed(10, 0, 50);
        let target = ZoomTarget {
            duration_minutes: 5.0,
            max_points: 60,
        };

        let out = project(&points, target, 500);
        let expected: Vec<f32> = points.iter().map(|point| point.level).collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn projection_filters_to_the_window() {
        // Half the points fall outside a one-minute window.
        let mut points = feed(10, 0, 1_000);
        points.extend(feed(10, 100_000, 1_000));
        let target = ZoomTarget {
            duration_minutes: 1.0,
            max_points: 100,
        };

        let out = project(&points, target, 120_000);
        assert_eq!(out.len(), 10);
    }

    #[test]
    fn projection_downsamples_to_the_budget() {
        let points = feed(1_000, 0, 50);
        let target = ZoomTarget {
            duration_minutes: 5.0,
            max_points: 100,
        };

        let out = project(&points, target, 50_000);
        assert_eq!(out.len(), 100);
    }

    #[test]
    fn downsampling_takes_range_rms() {
        let points = vec![
            SamplePoint::new(0.3, 0),
            SamplePoint::new(0.4, 50),
            SamplePoint::new(0.6, 100),
            SamplePoint::new(0.8, 150),
        ];
        let target = ZoomTarget {
            duration_minutes: 1.0,
            max_points: 2,
        };

        let out = project(&points, target, 200);

        assert_eq!(out.len(), 2);
        assert_relative_eq!(out[0], (0.25f32 / 2.0).sqrt(), epsilon = 1e-6);
        assert_relative_eq!(out[1], (1.0f32 / 2.0).sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn empty_buffer_projects_to_nothing() {
        let target = ZoomTarget {
            duration_minutes: 5.0,
            max_points: 100,
        };
        assert!(project(&[], target, 1_000_000).is_empty());
    }

    #[test]
    fn zero_budget_projects_to_nothing() {
        let points = feed(10, 0, 50);
        let target = ZoomTarget {
            duration_minutes: 5.0,
            max_points: 0,
        };
        assert!(project(&points, target, 500).is_empty());
    }

    #[test]
    fn downsampling_is_idempotent_at_the_same_budget() {
        let points = feed(500, 0, 50);
        let target = ZoomTarget {
            duration_minutes: 10.0,
            max_points: 100,
        };
        let now_ms = 25_000;

        let once = project(&points, target, now_ms);
        assert_eq!(once.len(), 100);

        // Re-projecting the downsampled sequence must not shrink it again.
        let reprojected: Vec<SamplePoint> = once
            .iter()
            .enumerate()
            .map(|(i, &level)| SamplePoint::new(level, i as u64 * 50))
            .collect();
        let twice = project(&reprojected, target, now_ms);
        assert_eq!(twice, once);
    }

    #[test]
    fn unknown_preset_resolution_still_projects() {
        let config = WaveformConfig {
            zoom_levels: vec![ZoomPreset::new("only", 1.0, 50)],
            ..WaveformConfig::default()
        };
        let points = feed(10, 0, 50);

        let target = resolve(&ZoomSelector::from("missing"), None, &config);
        let out = project(&points, target, 500);

        // Ten points fit the fallback's 300-point budget.
        assert_eq!(out.len(), 10);
    }
}
