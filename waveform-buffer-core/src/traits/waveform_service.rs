use crate::models::config::{ConfigOverrides, ZoomPreset};
use crate::models::state::SessionState;
use crate::models::statistics::WaveformStatistics;
use crate::processing::projector::ZoomSelector;

/// Main waveform buffer interface.
///
/// The capture backend feeds it levels; the presentation bridge queries it
/// for display sequences and statistics. Every method takes `&self` so one
/// instance can be shared across threads, and none of them can fail: bad
/// zoom requests degrade to documented defaults and queries against an
/// empty buffer return empty data.
pub trait WaveformService: Send + Sync {
    /// Begin a session. Clears anything buffered by a previous one and
    /// starts accepting levels.
    fn start(&self);

    /// End the session. Ingestion stops; the buffer stays queryable.
    fn stop(&self);

    /// Drop all buffered state and return to a fresh idle session.
    fn reset(&self);

    /// Ingest one normalized level sample. Ignored while idle.
    fn add_level(&self, level: f32);

    /// Project the buffer for the given zoom window, flattened to levels.
    fn display_data(&self, zoom: ZoomSelector, max_points: Option<usize>) -> Vec<f32>;

    /// Switch the active zoom and recompute the cached projection for it.
    fn set_zoom(&self, zoom: ZoomSelector);

    /// Named zoom windows currently configured.
    fn zoom_presets(&self) -> Vec<ZoomPreset>;

    /// The most recent statistics snapshot.
    fn current_statistics(&self) -> WaveformStatistics;

    /// Merge partial overrides into the live configuration. Takes effect on
    /// subsequent compression and projection passes.
    fn update_config(&self, overrides: ConfigOverrides);

    /// Current session state.
    fn state(&self) -> SessionState;
}
