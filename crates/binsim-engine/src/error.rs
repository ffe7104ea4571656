//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during a generation-and-publish run.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: crate::config::ConfigError,
    },

    /// A tier generator rejected its inputs.
    #[error("generation error: {source}")]
    Generator {
        /// The underlying generator error.
        #[from]
        source: binsim_suburb::GeneratorError,
    },

    /// A bin simulator rejected its configuration.
    #[error("simulator error: {source}")]
    Simulator {
        /// The underlying simulator error.
        #[from]
        source: binsim_telemetry::SimulatorError,
    },

    /// Persisting a generated tier failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: binsim_store::StoreError,
    },

    /// Connecting to the message bus failed.
    ///
    /// Only the initial connection is fatal; per-record publish
    /// failures are aggregated in batch results instead.
    #[error("publish error: {source}")]
    Publish {
        /// The underlying publish error.
        #[from]
        source: binsim_publisher::PublishError,
    },
}
