//! The four tier generators, applied strictly in dependency order.
//!
//! Each generator is a pure function of its declared inputs plus an
//! injected random source; it knows nothing about earlier or later tiers
//! beyond what is passed in. Dependency ordering (driveways before houses
//! before streets before the suburb) is the caller's responsibility --
//! there is no internal state machine, and each call is independently
//! reproducible given the same seeded rng.
//!
//! Referential invariants enforced here:
//!
//! - a driveway is assigned to at most one house, greedily and permanently;
//! - the streets of a run partition the full house set exactly (near-equal
//!   slices of a uniformly shuffled house-id sequence);
//! - the suburb wraps every street of the run.

use binsim_types::{
    Driveway, DrivewayId, House, HouseId, Street, StreetId, Suburb, SuburbId, Tier,
};
use rand::Rng;
use rand::seq::SliceRandom as _;
use tracing::{debug, warn};

use crate::error::GeneratorError;
use crate::names;
use crate::region::{self, Region};

/// Non-fatal advisory raised when referential coverage is incomplete.
///
/// Warnings never abort generation; they are returned alongside the output
/// (so callers and tests can assert on them) and logged at WARN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsistencyWarning {
    /// More houses were requested than driveways exist; the surplus houses
    /// are generated without a driveway link.
    DrivewayShortfall {
        /// Number of houses requested.
        requested: usize,
        /// Number of driveways available.
        available: usize,
    },

    /// The pool of unused driveways ran out mid-run; this house and all
    /// later ones are unlinked.
    DrivewayPoolExhausted {
        /// 1-based number of the first house left without a driveway.
        house_number: usize,
    },
}

impl core::fmt::Display for ConsistencyWarning {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::DrivewayShortfall {
                requested,
                available,
            } => write!(
                f,
                "requested {requested} houses but only {available} driveways exist; \
                 some houses will not be assigned a driveway"
            ),
            Self::DrivewayPoolExhausted { house_number } => write!(
                f,
                "driveway pool exhausted; house {house_number} and later houses \
                 are generated without a driveway link"
            ),
        }
    }
}

/// Houses produced by [`generate_houses`], plus any advisory warnings.
#[derive(Debug, Clone)]
pub struct HouseGeneration {
    /// The generated houses, in address order.
    pub houses: Vec<House>,
    /// Non-fatal referential-coverage warnings raised during generation.
    pub warnings: Vec<ConsistencyWarning>,
}

/// Generate `count` driveways with locations sampled uniformly from `region`.
///
/// # Errors
///
/// Returns [`GeneratorError::InvalidCount`] if `count` is zero.
pub fn generate_driveways(
    count: usize,
    region: &Region,
    rng: &mut impl Rng,
) -> Result<Vec<Driveway>, GeneratorError> {
    if count == 0 {
        return Err(GeneratorError::InvalidCount {
            tier: Tier::Driveways,
            count,
        });
    }

    let driveways: Vec<Driveway> = (0..count)
        .map(|_| Driveway {
            id: DrivewayId::generate(rng),
            location: region.sample(rng),
        })
        .collect();

    debug!(count = driveways.len(), "generated driveways");
    Ok(driveways)
}

/// Generate `count` houses, greedily assigning unused driveways.
///
/// Each house takes a uniformly random pick from the still-unused driveways
/// while any remain; its location is then jittered near that driveway.
/// Once the pool is exhausted, remaining houses are generated without a
/// driveway link and their locations are sampled from `region` instead.
/// Both shortfall conditions raise a [`ConsistencyWarning`] -- generation
/// proceeds regardless.
///
/// # Errors
///
/// Returns [`GeneratorError::InvalidCount`] if `count` is zero.
pub fn generate_houses(
    count: usize,
    driveways: &[Driveway],
    region: &Region,
    rng: &mut impl Rng,
) -> Result<HouseGeneration, GeneratorError> {
    if count == 0 {
        return Err(GeneratorError::InvalidCount {
            tier: Tier::Houses,
            count,
        });
    }

    let mut warnings = Vec::new();
    if count > driveways.len() {
        let warning = ConsistencyWarning::DrivewayShortfall {
            requested: count,
            available: driveways.len(),
        };
        warn!(requested = count, available = driveways.len(), "{warning}");
        warnings.push(warning);
    }

    // Indices into `driveways` not yet claimed by a house.
    let mut unused: Vec<usize> = (0..driveways.len()).collect();
    let mut pool_exhausted_at: Option<usize> = None;

    let mut houses = Vec::with_capacity(count);
    for number in 1..=count {
        let id = HouseId::generate(rng);
        let address = names::house_address(number);

        let assigned = if unused.is_empty() {
            pool_exhausted_at.get_or_insert(number);
            None
        } else {
            let pick = rng.random_range(0..unused.len());
            let index = unused.swap_remove(pick);
            driveways.get(index)
        };

        let (location, driveway_id) = match assigned {
            Some(driveway) => (
                region::jitter(driveway.location, rng),
                Some(driveway.id.clone()),
            ),
            None => (region.sample(rng), None),
        };

        houses.push(House {
            id,
            address,
            location,
            driveway_id,
        });
    }

    if let Some(house_number) = pool_exhausted_at {
        let warning = ConsistencyWarning::DrivewayPoolExhausted { house_number };
        warn!(house_number, "{warning}");
        warnings.push(warning);
    }

    debug!(
        count = houses.len(),
        linked = houses.iter().filter(|h| h.driveway_id.is_some()).count(),
        "generated houses"
    );
    Ok(HouseGeneration { houses, warnings })
}

/// Generate `count` streets partitioning the full house set.
///
/// House ids are uniformly shuffled, then split into `count` contiguous
/// slices of `floor(n / count)` houses, with the first `n % count` slices
/// receiving one extra house each. Street names come from a shuffled pool;
/// once the pool is exhausted, names repeat with a numeric suffix.
///
/// # Errors
///
/// Returns [`GeneratorError::InvalidCount`] if `count` is zero, and
/// [`GeneratorError::NoHouses`] if the house set is empty.
#[allow(clippy::arithmetic_side_effects)] // count is verified nonzero before the div/mod
pub fn generate_streets(
    count: usize,
    houses: &[House],
    rng: &mut impl Rng,
) -> Result<Vec<Street>, GeneratorError> {
    if count == 0 {
        return Err(GeneratorError::InvalidCount {
            tier: Tier::Streets,
            count,
        });
    }
    if houses.is_empty() {
        return Err(GeneratorError::NoHouses);
    }

    let mut house_ids: Vec<HouseId> = houses.iter().map(|h| h.id.clone()).collect();
    house_ids.shuffle(rng);

    let mut name_pool: Vec<&str> = names::STREET_NAMES.to_vec();
    name_pool.shuffle(rng);
    if count > name_pool.len() {
        warn!(
            requested = count,
            available = name_pool.len(),
            "more streets than unique names; names will repeat with a suffix"
        );
    }

    let base = house_ids.len() / count;
    let extra = house_ids.len() % count;

    let mut remaining = house_ids.into_iter();
    let streets: Vec<Street> = (0..count)
        .map(|index| {
            let take = base + usize::from(index < extra);
            Street {
                id: StreetId::generate(rng),
                name: street_name(&name_pool, index),
                house_ids: remaining.by_ref().take(take).collect(),
            }
        })
        .collect();

    debug!(count = streets.len(), "generated streets");
    Ok(streets)
}

/// Wrap all streets of the current run under a single suburb record.
///
/// # Errors
///
/// Returns [`GeneratorError::EmptyName`] if `name` is empty or whitespace,
/// and [`GeneratorError::NoStreets`] if no streets exist.
pub fn generate_suburb(
    name: &str,
    streets: &[Street],
    rng: &mut impl Rng,
) -> Result<Suburb, GeneratorError> {
    if name.trim().is_empty() {
        return Err(GeneratorError::EmptyName);
    }
    if streets.is_empty() {
        return Err(GeneratorError::NoStreets);
    }

    let suburb = Suburb {
        id: SuburbId::generate(rng),
        name: name.to_owned(),
        street_ids: streets.iter().map(|s| s.id.clone()).collect(),
    };
    debug!(suburb = %suburb.id, streets = suburb.street_ids.len(), "generated suburb");
    Ok(suburb)
}

/// Pick the name for street `index` from the shuffled pool, falling back to
/// a suffixed repeat once the pool runs out.
#[allow(clippy::arithmetic_side_effects)] // len is clamped to at least 1
fn street_name(pool: &[&str], index: usize) -> String {
    let len = pool.len().max(1);
    let name = pool.get(index % len).copied().unwrap_or("Street");
    if index < len {
        name.to_owned()
    } else {
        // Second pass through the pool gets suffix 2, third pass 3, ...
        format!("{name} {}", index / len + 1)
    }
}
