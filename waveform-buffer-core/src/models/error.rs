use thiserror::Error;

/// Problems detected while validating a waveform configuration.
///
/// Runtime operations never return errors: the live configuration is trusted
/// as supplied and queries fall back to documented defaults. Validation is
/// offered so an embedding bridge can reject a bad profile before installing
/// it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("maxTotalPoints must be positive")]
    ZeroCapacity,

    #[error("recentDataMinutes must be positive and finite")]
    InvalidRecentWindow,

    #[error("recentDataPoints must be positive")]
    ZeroRecentPoints,

    #[error("peakThreshold must be finite and non-negative")]
    InvalidPeakThreshold,

    #[error("resolutionLevels must not be empty")]
    NoResolutionBands,

    #[error("resolution band {0} has a zero point budget")]
    ZeroBandBudget(usize),

    #[error("resolution band {0} does not reach further back than its predecessor")]
    NonAscendingBands(usize),
}
