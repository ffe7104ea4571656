//! Wire-visible telemetry snapshot emitted by the bin simulator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{BinId, HouseId};
use crate::structs::Location;

/// An immutable telemetry record produced at one simulated instant.
///
/// Serialized with camelCase keys to match the downstream consumers:
///
/// ```json
/// {
///   "binId": "BIN_house_...",
///   "timestamp": "2026-08-30T01:02:03.456Z",
///   "location": { "latitude": -37.81, "longitude": 144.96 },
///   "fillLevelPercentage": 10.01,
///   "status": "online",
///   "temperatureCelsius": 20.13,
///   "linkedHouseId": "house_..."
/// }
/// ```
///
/// Both numeric fields are rounded to two decimal places by the simulator
/// before the snapshot is built. `linkedHouseId` is omitted entirely when
/// the bin is not tied to a house.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySnapshot {
    /// Unique identifier of the reporting bin.
    pub bin_id: BinId,
    /// When this snapshot was taken (ISO-8601 on the wire).
    pub timestamp: DateTime<Utc>,
    /// The bin's fixed location.
    pub location: Location,
    /// Fill level percentage, clamped to `[0, 100]` and rounded to 2 dp.
    pub fill_level_percentage: f64,
    /// Operational status string (open vocabulary, e.g. `"online"`).
    pub status: String,
    /// Internal temperature in Celsius, rounded to 2 dp (unclamped).
    pub temperature_celsius: f64,
    /// The house this bin serves, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_house_id: Option<HouseId>,
}
