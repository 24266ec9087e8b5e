//! # waveform-buffer-core
//!
//! Platform-agnostic waveform buffering core library.
//!
//! Ingests scalar audio levels at a nominal 50 ms cadence and keeps a
//! bounded, multi-resolution representation of the whole session: recent
//! data at full detail, older data progressively compressed through
//! configurable resolution bands. Peak tagging, zoom projection for
//! display, and session statistics ride along. Frontends drive the
//! `WaveformService` trait and observe changes through `WaveformDelegate`.
//!
//! ## Architecture
//!
//! ```text
//! waveform-buffer-core (this crate)
//! ├── traits/       ← WaveformService, WaveformDelegate, Clock
//! ├── models/       ← ConfigError, SessionState, WaveformConfig, SamplePoint, WaveformStatistics
//! ├── processing/   ← PeakDetector, chunk reduction, progressive compression, zoom projection
//! └── session/      ← WaveformSession (generic orchestrator)
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::config::{
    ConfigOverrides, ReductionMethod, ResolutionBand, WaveformConfig, ZoomPreset,
};
pub use models::error::ConfigError;
pub use models::point::SamplePoint;
pub use models::state::SessionState;
pub use models::statistics::WaveformStatistics;
pub use processing::peak_detector::PeakDetector;
pub use processing::projector::{ZoomSelector, ZoomTarget};
pub use session::waveform::WaveformSession;
pub use traits::clock::{Clock, ManualClock, MonotonicClock};
pub use traits::waveform_delegate::WaveformDelegate;
pub use traits::waveform_service::WaveformService;
