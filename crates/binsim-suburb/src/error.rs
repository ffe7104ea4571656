//! Error types for the `binsim-suburb` crate.
//!
//! Tier-generation errors are fatal to the specific call and leave no
//! partial output behind; the caller decides whether and how to retry.

use binsim_types::Tier;

/// Errors that can occur during tier generation.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// A non-positive entity count was requested.
    #[error("invalid count for {tier}: expected at least 1, got {count}")]
    InvalidCount {
        /// The tier being generated.
        tier: Tier,
        /// The rejected count.
        count: usize,
    },

    /// Street generation requires at least one house.
    #[error("cannot generate streets: the house set is empty")]
    NoHouses,

    /// Suburb generation requires at least one street.
    #[error("cannot generate a suburb: no streets exist")]
    NoStreets,

    /// The suburb name must be a non-empty string.
    #[error("suburb name must not be empty")]
    EmptyName,
}
