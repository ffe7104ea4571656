//! Error types for the `binsim-publisher` crate.
//!
//! Record-level failures are isolated per record and aggregated into the
//! batch result; they never abort sibling publishes.

/// Errors that can occur while publishing a record.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The broker connection could not be established.
    #[error("failed to connect to broker at {url}: {message}")]
    Connect {
        /// The broker URL.
        url: String,
        /// Connection failure detail.
        message: String,
    },

    /// The record could not be serialized for the wire.
    #[error("failed to serialize record for {subject}: {source}")]
    Serialization {
        /// The target subject.
        subject: String,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The broker rejected or dropped the publish.
    #[error("transport error on {subject}: {message}")]
    Transport {
        /// The target subject.
        subject: String,
        /// Transport failure detail.
        message: String,
    },

    /// No acknowledgement arrived within the per-record timeout.
    #[error("publish to {subject} timed out after {timeout_ms} ms")]
    Timeout {
        /// The target subject.
        subject: String,
        /// The configured timeout in milliseconds.
        timeout_ms: u128,
    },

    /// The batch was cancelled before this record was dispatched.
    #[error("publish to {subject} cancelled before dispatch")]
    Cancelled {
        /// The target subject.
        subject: String,
    },
}
