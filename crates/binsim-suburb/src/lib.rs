//! Hierarchical spatial data generator for the binsim suburb dataset.
//!
//! This crate builds the four entity tiers bottom-up, each from the one
//! below it: driveways are sampled from a rectangular region, houses claim
//! driveways greedily and exclusively, streets partition the house set into
//! near-equal random slices, and a single suburb wraps all streets.
//!
//! All generators take `&mut impl rand::Rng`, so a seeded [`rand::rngs::SmallRng`]
//! makes a whole run reproducible (modulo the wall-clock component of the
//! generated ids).
//!
//! Regenerating one tier never rewrites the tiers that reference it; a
//! caller that regenerates houses without regenerating streets ends up with
//! streets referencing stale ids. Cascading is deliberately left to the
//! caller -- the engine regenerates all tiers in one pass.
//!
//! # Modules
//!
//! - [`error`] -- [`GeneratorError`] for invalid or unsatisfiable requests
//! - [`generator`] -- the four `generate_*` operations and
//!   [`ConsistencyWarning`]
//! - [`names`] -- street-name pools and address synthesis
//! - [`region`] -- rectangular uniform sampling and house jitter

pub mod error;
pub mod generator;
pub mod names;
pub mod region;

// Re-export primary types at crate root.
pub use error::GeneratorError;
pub use generator::{
    ConsistencyWarning, HouseGeneration, generate_driveways, generate_houses, generate_streets,
    generate_suburb,
};
pub use region::Region;
