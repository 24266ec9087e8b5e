use crate::models::config::WaveformConfig;
use crate::models::point::SamplePoint;

use super::reducer::reduce_chunk;

/// Runs one progressive compression pass over the whole buffer.
///
/// Points inside the recent window survive at full resolution (trimmed to
/// the recent budget); everything older is thinned band by band, then the
/// configured capacity is enforced by discarding the oldest points. The
/// input must be sorted by timestamp and the output stays sorted.
///
/// While the entire buffer still sits inside the recent window there is
/// nothing to thin, and the pass returns it unchanged even when it exceeds
/// the capacity. The overshoot corrects itself once points age out of the
/// window.
pub fn compress(points: Vec<SamplePoint>, config: &WaveformConfig, now_ms: u64) -> Vec<SamplePoint> {
    let recent_start_ms = now_ms.saturating_sub(config.recent_window_ms());
    let split = points.partition_point(|point| point.timestamp_ms < recent_start_ms);
    if split == 0 {
        return points;
    }
    let before = points.len();
    let (older, recent) = points.split_at(split);

    let mut compressed = compress_bands(older, config, now_ms);

    let keep = recent.len().min(config.recent_data_points);
    compressed.extend_from_slice(&recent[recent.len() - keep..]);
    compressed.sort_by_key(|point| point.timestamp_ms);

    if compressed.len() > config.max_total_points {
        let excess = compressed.len() - config.max_total_points;
        compressed.drain(..excess);
    }

    log::debug!("Compressed waveform buffer: {} -> {} points", before, compressed.len());
    compressed
}

/// Thins aged points through the configured resolution ladder.
///
/// Band `k` owns the half-open window `[now - range_k, now - range_k1)`
/// where `range_k1` is the previous band's reach (`now` itself for band 0),
/// so every aged point belongs to at most one band. Points older than the
/// outermost band fall off the end of the ladder.
fn compress_bands(older: &[SamplePoint], config: &WaveformConfig, now_ms: u64) -> Vec<SamplePoint> {
    let mut output = Vec::new();
    let mut window_end_ms = now_ms;

    for band in &config.resolution_levels {
        let window_start_ms = now_ms.saturating_sub(band.window_ms());
        let selected: Vec<SamplePoint> = older
            .iter()
            .filter(|point| {
                point.timestamp_ms >= window_start_ms && point.timestamp_ms < window_end_ms
            })
            .copied()
            .collect();

        if selected.len() > band.max_points && band.max_points > 0 {
            let chunk_size = selected.len().div_ceil(band.max_points);
            output.extend(
                selected
                    .chunks(chunk_size)
                    .map(|chunk| reduce_chunk(chunk, band.method, now_ms)),
            );
        } else {
            output.extend_from_slice(&selected);
        }
        window_end_ms = window_start_ms;
    }

    // Bands were walked newest-first, so the concatenation is not ordered.
    output.sort_by_key(|point| point.timestamp_ms);
    output
}

#[cfg(test)]
mod tests {
    use crate::models::config::{ReductionMethod, ResolutionBand};

    use super::*;

    fn config(
        max_total_points: usize,
        recent_data_minutes: f64,
        recent_data_points: usize,
        resolution_levels: Vec<ResolutionBand>,
    ) -> WaveformConfig {
        WaveformConfig {
            max_total_points,
            recent_data_minutes,
            recent_data_points,
            resolution_levels,
            ..WaveformConfig::default()
        }
    }

    fn feed(count: usize, start_ms: u64, step_ms: u64, level: f32) -> Vec<SamplePoint> {
        (0..count)
            .map(|i| SamplePoint::new(level, start_ms + i as u64 * step_ms))
            .collect()
    }

    fn is_sorted(points: &[SamplePoint]) -> bool {
        points
            .windows(2)
            .all(|pair| pair[0].timestamp_ms <= pair[1].timestamp_ms)
    }

    #[test]
    fn all_recent_data_passes_through_even_over_capacity() {
        let config = config(
            10,
            1.0,
            5,
            vec![ResolutionBand::new(5.0, 100, ReductionMethod::Rms)],
        );
        // 30 points within the last minute, three times the capacity.
        let points = feed(30, 0, 1_000, 0.5);

        let out = compress(points.clone(), &config, 30_000);
        assert_eq!(out, points);
    }

    #[test]
    fn recent_window_is_trimmed_to_its_budget() {
        let config = config(
            10_000,
            1.0,
            40,
            vec![ResolutionBand::new(240.0, 1_000, ReductionMethod::Rms)],
        );
        let now_ms = 200_000;

        // 50 aged points plus 100 inside the last minute.
        let mut points = feed(50, 0, 1_000, 0.5);
        points.extend(feed(100, 140_000, 500, 0.5));

        let out = compress(points, &config, now_ms);

        let recent: Vec<_> = out
            .iter()
            .filter(|point| point.timestamp_ms >= 140_000)
            .collect();
        assert_eq!(recent.len(), 40);
        // The newest samples survive; the head of the recent run is dropped.
        assert_eq!(recent[0].timestamp_ms, 140_000 + 60 * 500);
        assert_eq!(out.len(), 50 + 40);
        assert!(is_sorted(&out));
    }

    #[test]
    fn bands_reduce_their_own_windows() {
        let config = config(
            10_000,
            2.0,
            600,
            vec![
                ResolutionBand::new(5.0, 10, ReductionMethod::Rms),
                ResolutionBand::new(20.0, 5, ReductionMethod::Average),
            ],
        );
        let now_ms = 1_200_000;

        // 50 points for the outer band, 100 for the inner, 10 recent.
        let mut points = feed(50, 0, 1_000, 0.5);
        points.extend(feed(100, 900_000, 1_800, 0.5));
        points.extend(feed(10, 1_090_000, 1_000, 0.5));

        let out = compress(points, &config, now_ms);

        let outer = out
            .iter()
            .filter(|point| point.timestamp_ms < 900_000)
            .count();
        let inner = out
            .iter()
            .filter(|point| point.timestamp_ms >= 900_000 && point.timestamp_ms < 1_080_000)
            .count();
        let recent = out
            .iter()
            .filter(|point| point.timestamp_ms >= 1_080_000)
            .count();

        assert_eq!(outer, 5);
        assert_eq!(inner, 10);
        assert_eq!(recent, 10);
        assert!(is_sorted(&out));
    }

    #[test]
    fn band_windows_neither_overlap_nor_leave_gaps() {
        let config = config(
            10_000,
            0.1,
            600,
            vec![
                ResolutionBand::new(1.0, 10, ReductionMethod::Rms),
                ResolutionBand::new(2.0, 10, ReductionMethod::Rms),
            ],
        );
        let now_ms = 300_000;

        // One point exactly on the band boundary, one just inside the outer
        // band. Neither window may claim both or drop either.
        let points = vec![
            SamplePoint::new(0.5, 239_999),
            SamplePoint::new(0.5, 240_000),
            SamplePoint::new(0.5, 299_000),
        ];

        let out = compress(points, &config, now_ms);
        let timestamps: Vec<u64> = out.iter().map(|point| point.timestamp_ms).collect();
        assert_eq!(timestamps, vec![239_999, 240_000, 299_000]);
    }

    #[test]
    fn points_past_the_outermost_band_are_dropped() {
        let config = config(
            10_000,
            0.5,
            600,
            vec![ResolutionBand::new(1.0, 100, ReductionMethod::Rms)],
        );
        let now_ms = 600_000;

        let points = vec![
            SamplePoint::new(0.5, 100_000), // beyond the one-minute ladder
            SamplePoint::new(0.5, 550_000),
            SamplePoint::new(0.5, 599_000),
        ];

        let out = compress(points, &config, now_ms);
        let timestamps: Vec<u64> = out.iter().map(|point| point.timestamp_ms).collect();
        assert_eq!(timestamps, vec![550_000, 599_000]);
    }

    #[test]
    fn capacity_trim_discards_the_oldest_points() {
        let config = config(
            60,
            0.5,
            30,
            vec![ResolutionBand::new(10.0, 50, ReductionMethod::Rms)],
        );
        let now_ms = 400_000;

        // 100 aged points reduce to 50; 30 recent points stay; the cap of
        // 60 then removes the 20 oldest reduced points.
        let mut points = feed(100, 0, 3_000, 0.5);
        points.extend(feed(30, 380_000, 500, 0.5));

        let out = compress(points, &config, now_ms);

        assert_eq!(out.len(), 60);
        assert!(is_sorted(&out));
        let recent = out
            .iter()
            .filter(|point| point.timestamp_ms >= 370_000)
            .count();
        assert_eq!(recent, 30);
    }

    #[test]
    fn uniform_levels_survive_every_method() {
        let config = config(
            200,
            1.0,
            50,
            vec![
                ResolutionBand::new(5.0, 20, ReductionMethod::Peak),
                ResolutionBand::new(15.0, 10, ReductionMethod::Rms),
                ResolutionBand::new(30.0, 5, ReductionMethod::Average),
            ],
        );
        let now_ms = 1_500_000;

        let points = feed(1_000, 0, 1_450, 0.5);
        let out = compress(points, &config, now_ms);

        assert!(!out.is_empty());
        for point in &out {
            assert!((point.level - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn under_budget_bands_pass_points_through_unchanged() {
        let config = config(
            10_000,
            0.5,
            600,
            vec![ResolutionBand::new(10.0, 100, ReductionMethod::Rms)],
        );
        let now_ms = 300_000;

        let aged = SamplePoint::peak(0.9, 100_000);
        let out = compress(vec![aged, SamplePoint::new(0.4, 299_000)], &config, now_ms);

        // No reduction ran, so even the rms band keeps the peak tag.
        assert_eq!(out[0], aged);
    }
}
