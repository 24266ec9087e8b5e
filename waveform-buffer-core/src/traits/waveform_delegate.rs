use crate::models::state::SessionState;
use crate::models::statistics::WaveformStatistics;

/// Event delegate for waveform session notifications.
///
/// Methods are called on whichever thread performed the triggering
/// operation, never while the session lock is held. Implementations should
/// marshal to the UI thread if needed.
pub trait WaveformDelegate: Send + Sync {
    /// Called when the session moves between idle and recording.
    fn on_state_changed(&self, state: SessionState);

    /// Called when the statistics snapshot is refreshed (periodically during
    /// ingestion, and once more on stop).
    fn on_statistics_updated(&self, statistics: &WaveformStatistics);
}
