//! Shared type definitions for the binsim workspace.
//!
//! This crate is the single source of truth for the entity types that flow
//! through the generator, the store, and the publish pipeline. Everything
//! here is a plain serde-serializable value with no behavior beyond
//! construction helpers.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe string-backed wrappers for all entity identifiers
//! - [`enums`] -- The [`Tier`] enumeration (collection keys, topic suffixes)
//! - [`structs`] -- The spatial hierarchy (driveway, house, street, suburb)
//! - [`telemetry`] -- The wire-visible [`TelemetrySnapshot`]

pub mod enums;
pub mod ids;
pub mod structs;
pub mod telemetry;

// Re-export all public types at crate root for convenience.
pub use enums::Tier;
pub use ids::{BinId, DrivewayId, HouseId, StreetId, SuburbId};
pub use structs::{Driveway, House, Location, Street, Suburb};
pub use telemetry::TelemetrySnapshot;
