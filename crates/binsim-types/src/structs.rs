//! Core entity structs for the suburb hierarchy.
//!
//! Four tiers, bottom-up: [`Driveway`] → [`House`] → [`Street`] → [`Suburb`].
//! Each tier owns a collection of references into the tier below it by id.
//! All entities are plain immutable values once generated; regenerating a
//! tier never mutates previously written records (and does not cascade to
//! tiers that reference them — see the crate docs on the consistency gap).

use serde::{Deserialize, Serialize};

use crate::ids::{DrivewayId, HouseId, StreetId, SuburbId};

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// An immutable 2-D coordinate.
///
/// No range validation is applied beyond the f64 type itself; the generator
/// only ever produces coordinates inside its configured region, but the type
/// is deliberately permissive. Equality is component-wise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Location {
    /// Create a location from latitude/longitude components.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

// ---------------------------------------------------------------------------
// Driveway
// ---------------------------------------------------------------------------

/// A driveway: the bottom tier of the hierarchy.
///
/// Owned exclusively by at most one house. The assignment is greedy and
/// never revoked: once a house takes a driveway, no later house may take it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driveway {
    /// Unique driveway identifier.
    pub id: DrivewayId,
    /// Where the driveway sits.
    pub location: Location,
}

// ---------------------------------------------------------------------------
// House
// ---------------------------------------------------------------------------

/// A house, weakly referencing zero or one driveway.
///
/// The driveway link is a relation by id, never ownership: dropping the
/// house does not touch the driveway record. The house location is
/// independently generated, jittered near the assigned driveway when one
/// exists and sampled from the base region otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
    /// Unique house identifier.
    pub id: HouseId,
    /// Synthetic street address, e.g. `"12 Oak Ave"`.
    pub address: String,
    /// Where the house sits (not derived from the driveway).
    pub location: Location,
    /// The driveway assigned to this house, if any remained unclaimed.
    pub driveway_id: Option<DrivewayId>,
}

// ---------------------------------------------------------------------------
// Street
// ---------------------------------------------------------------------------

/// A street owning an ordered slice of the house-id partition.
///
/// Every house belongs to exactly one street; the union of `house_ids`
/// across all streets of a run is the full house set with no duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Street {
    /// Unique street identifier.
    pub id: StreetId,
    /// Street name drawn from the name pool (may repeat with a synthetic
    /// suffix once the pool is exhausted).
    pub name: String,
    /// Houses on this street, in partition order.
    pub house_ids: Vec<HouseId>,
}

// ---------------------------------------------------------------------------
// Suburb
// ---------------------------------------------------------------------------

/// The suburb wrapping all streets of a generation run (singleton per run).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suburb {
    /// Unique suburb identifier.
    pub id: SuburbId,
    /// Human-chosen suburb name.
    pub name: String,
    /// All streets generated in the current run.
    pub street_ids: Vec<StreetId>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn location_equality_is_component_wise() {
        let a = Location::new(-37.81, 144.96);
        let b = Location::new(-37.81, 144.96);
        let c = Location::new(-37.81, 144.97);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn house_serializes_unlinked_driveway_as_null() {
        let house = House {
            id: HouseId::from("house_1_1000"),
            address: "1 Main St".to_owned(),
            location: Location::new(-37.81, 144.96),
            driveway_id: None,
        };
        let value = serde_json::to_value(&house).unwrap();
        assert!(value.get("driveway_id").is_some_and(serde_json::Value::is_null));
    }

    #[test]
    fn entities_round_trip_through_json() {
        let street = Street {
            id: StreetId::from("street_1_1000"),
            name: "Oak Ave".to_owned(),
            house_ids: vec![HouseId::from("house_1_1000"), HouseId::from("house_2_1000")],
        };
        let json = serde_json::to_string(&street).unwrap();
        let back: Street = serde_json::from_str(&json).unwrap();
        assert_eq!(street, back);
    }
}
