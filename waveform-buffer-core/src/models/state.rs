use serde::{Deserialize, Serialize};

/// Waveform session state machine.
///
/// State transitions:
/// ```text
/// idle → recording → idle (stop)
///   ↑________________↓
///        (reset, from either state)
/// ```
///
/// Pause/resume belongs to the capture layer driving this session; while the
/// feed is paused the capture layer simply stops calling `add_level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Recording,
}

impl SessionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }
}
