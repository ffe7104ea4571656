//! Type-safe identifier wrappers around opaque id strings.
//!
//! Every entity in the dataset has a strongly-typed ID to prevent
//! accidental mixing of identifiers at compile time. Generated ids follow
//! the `{prefix}_{unix_millis}_{tag}` shape where `tag` is a random
//! four-digit disambiguator, so ids sort roughly by creation time while
//! staying unique within a generation run.
//!
//! Bin ids are the exception: a bin is derived 1:1 from a house, so its id
//! is the house id under a `BIN_` prefix (see [`BinId::for_house`]).

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around an id [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident, $prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Prefix used when generating fresh identifiers of this tier.
            pub const PREFIX: &'static str = $prefix;

            /// Generate a new identifier shaped `{prefix}_{unix_millis}_{tag}`.
            ///
            /// The random tag comes from the injected `rng`, so a seeded
            /// generator produces reproducible tags (the millisecond part
            /// still reflects wall-clock time).
            pub fn generate(rng: &mut impl Rng) -> Self {
                let millis = Utc::now().timestamp_millis();
                let tag: u16 = rng.random_range(1000..=9999);
                Self(format!("{}_{millis}_{tag}", Self::PREFIX))
            }

            /// View the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the inner [`String`].
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a driveway.
    DrivewayId, "driveway"
}

define_id! {
    /// Unique identifier for a house (the original calls this a property id).
    HouseId, "house"
}

define_id! {
    /// Unique identifier for a street.
    StreetId, "street"
}

define_id! {
    /// Unique identifier for a suburb.
    SuburbId, "suburb"
}

define_id! {
    /// Unique identifier for a smart bin.
    BinId, "bin"
}

impl BinId {
    /// Derive the bin id for a house (`BIN_{house_id}`).
    ///
    /// Bins map 1:1 onto houses, so the house id is the stable part of the
    /// bin's identity rather than a fresh timestamped id.
    pub fn for_house(house_id: &HouseId) -> Self {
        Self(format!("BIN_{}", house_id.as_str()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn generated_ids_carry_tier_prefix() {
        let mut rng = SmallRng::seed_from_u64(7);
        let id = DrivewayId::generate(&mut rng);
        assert!(id.as_str().starts_with("driveway_"));

        let id = HouseId::generate(&mut rng);
        assert!(id.as_str().starts_with("house_"));
    }

    #[test]
    fn generated_ids_are_unique_within_a_run() {
        let mut rng = SmallRng::seed_from_u64(42);
        let ids: Vec<StreetId> = (0..5).map(|_| StreetId::generate(&mut rng)).collect();
        let unique: std::collections::BTreeSet<&str> =
            ids.iter().map(StreetId::as_str).collect();
        // The four-digit tag disambiguates ids minted in the same millisecond.
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn bin_id_embeds_the_house_id() {
        let house = HouseId::from("house_1700000000000_1234");
        let bin = BinId::for_house(&house);
        assert_eq!(bin.as_str(), "BIN_house_1700000000000_1234");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = SuburbId::from("suburb_1_9999");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"suburb_1_9999\"");
    }
}
