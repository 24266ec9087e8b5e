use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::config::{ConfigOverrides, WaveformConfig, ZoomPreset};
use crate::models::point::SamplePoint;
use crate::models::state::SessionState;
use crate::models::statistics::WaveformStatistics;
use crate::processing::compressor;
use crate::processing::peak_detector::PeakDetector;
use crate::processing::projector::{self, ZoomSelector};
use crate::traits::clock::{Clock, MonotonicClock};
use crate::traits::waveform_delegate::WaveformDelegate;
use crate::traits::waveform_service::WaveformService;

/// Ingest calls between two statistics refreshes.
pub const STATS_REFRESH_INTERVAL: u64 = 100;

/// Internal mutable session state, protected by `parking_lot::Mutex`.
struct BufferState {
    state: SessionState,
    config: WaveformConfig,
    points: Vec<SamplePoint>,
    detector: PeakDetector,
    session_start_ms: u64,
    ingest_count: u64,
    session_id: Option<String>,
    started_at: Option<String>,
    active_zoom: ZoomSelector,
    display_cache: Vec<f32>,
    display_cached_at: Option<u64>,
    statistics: WaveformStatistics,
}

impl BufferState {
    fn new(config: WaveformConfig) -> Self {
        let active_zoom = default_zoom(&config);
        Self {
            state: SessionState::Idle,
            points: Vec::new(),
            detector: PeakDetector::new(),
            session_start_ms: 0,
            ingest_count: 0,
            session_id: None,
            started_at: None,
            active_zoom,
            display_cache: Vec::new(),
            display_cached_at: None,
            statistics: WaveformStatistics::default(),
            config,
        }
    }

    fn clear_data(&mut self) {
        self.points.clear();
        self.detector.reset();
        self.ingest_count = 0;
        self.display_cache.clear();
        self.display_cached_at = None;
        self.statistics = WaveformStatistics::default();
    }

    fn refresh_statistics(&mut self, now_ms: u64) {
        let mut statistics =
            WaveformStatistics::compute(&self.points, self.session_start_ms, now_ms);
        statistics.session_id = self.session_id.clone();
        statistics.started_at = self.started_at.clone();
        self.statistics = statistics;
    }

    fn refresh_display(&mut self, now_ms: u64) {
        let target = projector::resolve(&self.active_zoom, None, &self.config);
        self.display_cache = projector::project(&self.points, target, now_ms);
        self.display_cached_at = Some(now_ms);
    }
}

fn default_zoom(config: &WaveformConfig) -> ZoomSelector {
    match config.zoom_levels.first() {
        Some(preset) => ZoomSelector::Named(preset.name.clone()),
        None => ZoomSelector::Duration(projector::FALLBACK_ZOOM_MINUTES),
    }
}

/// Adaptive multi-resolution waveform buffer session.
///
/// Owns the level buffer and runs the whole pipeline inline:
/// ```text
/// add_level → [PeakDetector] → append → [compressor, once over capacity]
///                                               ↓
///     display_data / set_zoom ← [projector] ← points
/// ```
///
/// One mutex guards all mutable state and every entry point completes its
/// work synchronously before returning, so a capture callback can feed
/// levels while a UI thread queries projections through the same shared
/// instance. Delegate notifications fire after the lock is released.
///
/// Generic over the time source via `Clock`; production code uses the
/// monotonic default.
pub struct WaveformSession<C: Clock = MonotonicClock> {
    clock: C,
    buffer_state: Mutex<BufferState>,
    delegate: Option<Arc<dyn WaveformDelegate>>,
}

impl WaveformSession<MonotonicClock> {
    pub fn new(config: WaveformConfig) -> Self {
        Self::with_clock(config, MonotonicClock::new())
    }
}

impl<C: Clock> WaveformSession<C> {
    /// Creates a session driven by an explicit clock (tests, replay feeds).
    pub fn with_clock(config: WaveformConfig, clock: C) -> Self {
        Self {
            clock,
            buffer_state: Mutex::new(BufferState::new(config)),
            delegate: None,
        }
    }

    /// Registers the notification delegate. Call before sharing the session
    /// with the capture and presentation layers.
    pub fn set_delegate(&mut self, delegate: Arc<dyn WaveformDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn state(&self) -> SessionState {
        self.buffer_state.lock().state
    }

    pub fn config(&self) -> WaveformConfig {
        self.buffer_state.lock().config.clone()
    }

    /// Begin a session. Clears anything left from a previous one, stamps a
    /// fresh session identity, and starts accepting levels. Calling `start`
    /// while already recording is a no-op.
    pub fn start(&self) {
        let now_ms = self.clock.now_ms();
        {
            let mut s = self.buffer_state.lock();
            if s.state.is_recording() {
                return;
            }
            s.clear_data();
            s.session_start_ms = now_ms;
            s.session_id = Some(uuid::Uuid::new_v4().to_string());
            s.started_at = Some(chrono::Utc::now().to_rfc3339());
            s.state = SessionState::Recording;
            s.refresh_statistics(now_ms);
        }
        self.notify_state(SessionState::Recording);
    }

    /// End the session. Ingestion stops, the buffer stays queryable, and a
    /// final statistics snapshot is taken. Calling `stop` while idle is a
    /// no-op.
    pub fn stop(&self) {
        let final_statistics = {
            let mut s = self.buffer_state.lock();
            if !s.state.is_recording() {
                return;
            }
            s.state = SessionState::Idle;
            s.refresh_statistics(self.clock.now_ms());
            s.statistics.clone()
        };
        self.notify_state(SessionState::Idle);
        self.notify_statistics(&final_statistics);
    }

    /// Drop all buffered state and return to a fresh idle session. Valid
    /// from either state; the delegate hears a state change only when the
    /// reset actually ends a recording.
    pub fn reset(&self) {
        let was_recording = {
            let mut s = self.buffer_state.lock();
            let was_recording = s.state.is_recording();
            s.state = SessionState::Idle;
            s.clear_data();
            s.session_id = None;
            s.started_at = None;
            s.session_start_ms = 0;
            was_recording
        };
        if was_recording {
            self.notify_state(SessionState::Idle);
        }
    }

    /// Ingest one normalized level sample. Ignored while idle.
    ///
    /// Runs peak detection against the trailing window, appends the point,
    /// compresses when the buffer exceeds its capacity, and refreshes the
    /// statistics snapshot every [`STATS_REFRESH_INTERVAL`] calls. All of it
    /// happens inline; there is no deferred work.
    pub fn add_level(&self, level: f32) {
        let refreshed = {
            let mut guard = self.buffer_state.lock();
            let s = &mut *guard;
            if !s.state.is_recording() {
                return;
            }
            let now_ms = self.clock.now_ms();

            let is_peak = s
                .detector
                .observe(level, now_ms, s.config.peak_threshold, &s.points);
            let point = if is_peak {
                SamplePoint::peak(level, now_ms)
            } else {
                SamplePoint::new(level, now_ms)
            };
            s.points.push(point);

            if s.points.len() > s.config.max_total_points {
                let points = std::mem::take(&mut s.points);
                s.points = compressor::compress(points, &s.config, now_ms);
            }
            s.display_cached_at = None;

            s.ingest_count += 1;
            if s.ingest_count % STATS_REFRESH_INTERVAL == 0 {
                s.refresh_statistics(now_ms);
                Some(s.statistics.clone())
            } else {
                None
            }
        };
        if let Some(statistics) = refreshed {
            self.notify_statistics(&statistics);
        }
    }

    /// Project the buffer for the given zoom selector, flattened to levels.
    ///
    /// The active zoom without an override is served from the cached
    /// projection when the buffer and clock have not moved since it was
    /// computed; the result is indistinguishable from a fresh projection.
    pub fn display_data(&self, zoom: ZoomSelector, max_points: Option<usize>) -> Vec<f32> {
        let mut guard = self.buffer_state.lock();
        let s = &mut *guard;
        let now_ms = self.clock.now_ms();

        if max_points.is_none() && zoom == s.active_zoom {
            if s.display_cached_at != Some(now_ms) {
                s.refresh_display(now_ms);
            }
            return s.display_cache.clone();
        }

        let target = projector::resolve(&zoom, max_points, &s.config);
        projector::project(&s.points, target, now_ms)
    }

    /// Switch the active zoom and recompute the cached projection for it.
    pub fn set_zoom(&self, zoom: ZoomSelector) {
        let mut guard = self.buffer_state.lock();
        let s = &mut *guard;
        s.active_zoom = zoom;
        s.refresh_display(self.clock.now_ms());
    }

    /// Named zoom windows currently configured.
    pub fn zoom_presets(&self) -> Vec<ZoomPreset> {
        self.buffer_state.lock().config.zoom_levels.clone()
    }

    /// The most recent statistics snapshot. Refreshed on a fixed ingest
    /// cadence and on stop, not on every call.
    pub fn current_statistics(&self) -> WaveformStatistics {
        self.buffer_state.lock().statistics.clone()
    }

    /// Merge partial overrides into the live configuration. The merged
    /// profile governs subsequent compression and projection passes;
    /// already-buffered points are not recompressed retroactively.
    pub fn update_config(&self, overrides: ConfigOverrides) {
        let mut s = self.buffer_state.lock();
        s.config = s.config.merged(overrides);
        s.display_cached_at = None;
    }

    fn notify_state(&self, state: SessionState) {
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(state);
        }
    }

    fn notify_statistics(&self, statistics: &WaveformStatistics) {
        if let Some(ref delegate) = self.delegate {
            delegate.on_statistics_updated(statistics);
        }
    }
}

impl<C: Clock> WaveformService for WaveformSession<C> {
    fn start(&self) {
        WaveformSession::start(self);
    }

    fn stop(&self) {
        WaveformSession::stop(self);
    }

    fn reset(&self) {
        WaveformSession::reset(self);
    }

    fn add_level(&self, level: f32) {
        WaveformSession::add_level(self, level);
    }

    fn display_data(&self, zoom: ZoomSelector, max_points: Option<usize>) -> Vec<f32> {
        WaveformSession::display_data(self, zoom, max_points)
    }

    fn set_zoom(&self, zoom: ZoomSelector) {
        WaveformSession::set_zoom(self, zoom);
    }

    fn zoom_presets(&self) -> Vec<ZoomPreset> {
        WaveformSession::zoom_presets(self)
    }

    fn current_statistics(&self) -> WaveformStatistics {
        WaveformSession::current_statistics(self)
    }

    fn update_config(&self, overrides: ConfigOverrides) {
        WaveformSession::update_config(self, overrides);
    }

    fn state(&self) -> SessionState {
        WaveformSession::state(self)
    }
}
