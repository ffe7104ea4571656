//! Error types for the `binsim-telemetry` crate.

/// Errors raised when constructing a bin simulator.
#[derive(Debug, thiserror::Error)]
pub enum SimulatorError {
    /// The initial fill level is outside the `[0, 100]` percentage range.
    #[error("initial fill level must be within [0, 100], got {0}")]
    FillLevelOutOfRange(f64),

    /// The update interval must be strictly positive.
    #[error("update interval must be positive, got {seconds} seconds")]
    NonPositiveInterval {
        /// The rejected interval.
        seconds: u64,
    },

    /// Noise bounds must be non-negative (a negative bound would invert
    /// the sampling interval).
    #[error("variation bound must be non-negative, got {0}")]
    NegativeVariation(f64),
}
