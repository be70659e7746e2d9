//! Error types for fillrate.

/// Result type alias for fillrate operations.
pub type Result<T> = std::result::Result<T, FillRateError>;

/// Errors that can occur when configuring sampling.
#[derive(Debug, thiserror::Error)]
pub enum FillRateError {
    /// Sample rate outside the valid `[0.0, 1.0]` range (or NaN).
    #[error("sample rate must be within [0.0, 1.0], got {0}")]
    InvalidSampleRate(f64),
}
