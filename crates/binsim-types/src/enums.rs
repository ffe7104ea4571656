//! Enumeration types shared across the binsim workspace.

use serde::{Deserialize, Serialize};

/// The persisted/published collections, in dependency order.
///
/// Driveway, house, street, and suburb form the spatial hierarchy; bins are
/// the telemetry records derived from houses. The tier doubles as the store
/// collection key and the topic suffix on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Driveway records (bottom of the hierarchy).
    Driveways,
    /// House records, each weakly referencing at most one driveway.
    Houses,
    /// Street records partitioning the house set.
    Streets,
    /// The single suburb record wrapping all streets.
    Suburb,
    /// Telemetry snapshots from the simulated bins.
    Bins,
}

impl Tier {
    /// Stable lowercase name, used for file names and topic suffixes.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Driveways => "driveways",
            Self::Houses => "houses",
            Self::Streets => "streets",
            Self::Suburb => "suburb",
            Self::Bins => "bins",
        }
    }

    /// All tiers in dependency order.
    pub const ALL: [Self; 5] = [
        Self::Driveways,
        Self::Houses,
        Self::Streets,
        Self::Suburb,
        Self::Bins,
    ];
}

impl core::fmt::Display for Tier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_names_are_stable() {
        assert_eq!(Tier::Driveways.name(), "driveways");
        assert_eq!(Tier::Suburb.to_string(), "suburb");
    }

    #[test]
    fn all_lists_tiers_in_dependency_order() {
        assert_eq!(Tier::ALL.first(), Some(&Tier::Driveways));
        assert_eq!(Tier::ALL.last(), Some(&Tier::Bins));
    }
}
