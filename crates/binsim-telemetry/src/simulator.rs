//! The stateful per-bin telemetry simulator.
//!
//! One [`BinSimulator`] instance exists per bin and exclusively owns its
//! continuous state (fill level, temperature, last-update instant). Every
//! [`tick`](BinSimulator::tick) advances the state by the elapsed
//! wall-clock time plus bounded uniform noise and emits an immutable
//! [`TelemetrySnapshot`].
//!
//! The fill level saturates at the `[0, 100]` percentage bounds; the
//! temperature drifts without a clamp (observed behavior of the real
//! sensor data this mimics, kept intentionally).

use binsim_types::{BinId, HouseId, Location, TelemetrySnapshot};
use rand::Rng;
use tracing::trace;

use crate::clock::{Clock, SystemClock};
use crate::error::SimulatorError;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Construction parameters for a [`BinSimulator`].
///
/// [`BinConfig::new`] fills in the defaults the dataset has always used;
/// individual fields can then be overridden with struct-update syntax.
#[derive(Debug, Clone)]
pub struct BinConfig {
    /// Unique identifier for the bin.
    pub bin_id: BinId,
    /// The bin's fixed location.
    pub location: Location,
    /// Starting fill level percentage, in `[0, 100]`. Default 0.0.
    pub initial_fill_level: f64,
    /// Average fill increase in percentage points per hour. Default 1.0.
    pub fill_rate_per_hour: f64,
    /// Nominal seconds between generated data points. Default 60.
    pub update_interval_seconds: u64,
    /// Starting operational status; an empty string selects `"online"`.
    pub initial_status: String,
    /// Starting internal temperature in Celsius. Default 20.0.
    pub initial_temperature_celsius: f64,
    /// Max random percentage points added/subtracted per tick;
    /// non-negative. Default 0.5.
    pub fill_variation: f64,
    /// Max random degrees Celsius added/subtracted per tick;
    /// non-negative. Default 0.2.
    pub temp_variation: f64,
    /// The house this bin serves, carried into every snapshot.
    pub linked_house_id: Option<HouseId>,
}

impl BinConfig {
    /// Create a config with the standard defaults for the given bin.
    pub const fn new(bin_id: BinId, location: Location) -> Self {
        Self {
            bin_id,
            location,
            initial_fill_level: 0.0,
            fill_rate_per_hour: 1.0,
            update_interval_seconds: 60,
            initial_status: String::new(),
            initial_temperature_celsius: 20.0,
            fill_variation: 0.5,
            temp_variation: 0.2,
            linked_house_id: None,
        }
    }
}

/// The mutable continuous state of one bin. Single writer: the owning
/// simulator's `tick`.
#[derive(Debug, Clone)]
struct BinState {
    fill_level: f64,
    temperature_celsius: f64,
    status: String,
    last_update: chrono::DateTime<chrono::Utc>,
}

/// Simulates data generation for a single smart bin.
///
/// Generic over the [`Clock`] so tests can drive elapsed time explicitly;
/// production code uses [`BinSimulator::new`], which wires in the
/// [`SystemClock`].
#[derive(Debug)]
pub struct BinSimulator<C: Clock = SystemClock> {
    bin_id: BinId,
    location: Location,
    fill_rate_per_second: f64,
    update_interval_seconds: u64,
    fill_variation: f64,
    temp_variation: f64,
    linked_house_id: Option<HouseId>,
    state: BinState,
    clock: C,
}

impl BinSimulator<SystemClock> {
    /// Create a simulator driven by the wall clock.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::FillLevelOutOfRange`] if the initial fill
    /// level is outside `[0, 100]`, [`SimulatorError::NonPositiveInterval`]
    /// if the update interval is zero, or [`SimulatorError::NegativeVariation`]
    /// if either noise bound is below zero.
    pub fn new(config: BinConfig) -> Result<Self, SimulatorError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> BinSimulator<C> {
    /// Create a simulator with an explicit clock.
    ///
    /// The first `tick` measures elapsed time from this call.
    ///
    /// # Errors
    ///
    /// Same validation as [`BinSimulator::new`].
    pub fn with_clock(config: BinConfig, clock: C) -> Result<Self, SimulatorError> {
        if !(0.0..=100.0).contains(&config.initial_fill_level) {
            return Err(SimulatorError::FillLevelOutOfRange(
                config.initial_fill_level,
            ));
        }
        if config.update_interval_seconds == 0 {
            return Err(SimulatorError::NonPositiveInterval {
                seconds: config.update_interval_seconds,
            });
        }
        if config.fill_variation < 0.0 {
            return Err(SimulatorError::NegativeVariation(config.fill_variation));
        }
        if config.temp_variation < 0.0 {
            return Err(SimulatorError::NegativeVariation(config.temp_variation));
        }

        let status = if config.initial_status.is_empty() {
            "online".to_owned()
        } else {
            config.initial_status
        };

        let last_update = clock.now();
        Ok(Self {
            bin_id: config.bin_id,
            location: config.location,
            fill_rate_per_second: config.fill_rate_per_hour / SECONDS_PER_HOUR,
            update_interval_seconds: config.update_interval_seconds,
            fill_variation: config.fill_variation,
            temp_variation: config.temp_variation,
            linked_house_id: config.linked_house_id,
            state: BinState {
                fill_level: config.initial_fill_level,
                temperature_celsius: config.initial_temperature_celsius,
                status,
                last_update,
            },
            clock,
        })
    }

    /// Advance the bin state by the elapsed time and emit a snapshot.
    ///
    /// The fill level grows by `elapsed_seconds * rate_per_second` plus a
    /// uniform noise term within `±fill_variation`, then saturates at the
    /// `[0, 100]` bounds. The temperature shifts by a uniform noise term
    /// within `±temp_variation` with no clamp. Snapshot numerics are
    /// rounded to two decimal places; the internal state is not.
    pub fn tick(&mut self, rng: &mut impl Rng) -> TelemetrySnapshot {
        let now = self.clock.now();
        // Negative elapsed (clock stepped backwards) counts as zero.
        let elapsed_seconds = now
            .signed_duration_since(self.state.last_update)
            .to_std()
            .map_or(0.0, |d| d.as_secs_f64());

        let fill_increase = elapsed_seconds * self.fill_rate_per_second;
        let fill_noise = rng.random_range(-self.fill_variation..=self.fill_variation);
        self.state.fill_level =
            (self.state.fill_level + fill_increase + fill_noise).clamp(0.0, 100.0);

        let temp_noise = rng.random_range(-self.temp_variation..=self.temp_variation);
        self.state.temperature_celsius += temp_noise;

        self.state.last_update = now;

        trace!(
            bin_id = %self.bin_id,
            elapsed_seconds,
            fill_level = self.state.fill_level,
            "tick"
        );

        TelemetrySnapshot {
            bin_id: self.bin_id.clone(),
            timestamp: now,
            location: self.location,
            fill_level_percentage: round2(self.state.fill_level),
            status: self.state.status.clone(),
            temperature_celsius: round2(self.state.temperature_celsius),
            linked_house_id: self.linked_house_id.clone(),
        }
    }

    /// Set the operational status, visible from the next tick onward.
    ///
    /// The status vocabulary is open; no validation is applied.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.state.status = status.into();
    }

    /// The bin's unique identifier.
    pub const fn bin_id(&self) -> &BinId {
        &self.bin_id
    }

    /// The bin's fixed location.
    pub const fn location(&self) -> Location {
        self.location
    }

    /// The current (unrounded) simulated fill level percentage.
    pub const fn fill_level(&self) -> f64 {
        self.state.fill_level
    }

    /// The current simulated status.
    pub fn status(&self) -> &str {
        &self.state.status
    }

    /// The nominal seconds between generated data points.
    pub const fn update_interval_seconds(&self) -> u64 {
        self.update_interval_seconds
    }
}

/// Round to two decimal places for wire output.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::arithmetic_side_effects)]
mod tests {
    use chrono::{Duration, Utc};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::clock::ManualClock;

    fn noiseless_config() -> BinConfig {
        BinConfig {
            initial_fill_level: 10.0,
            fill_rate_per_hour: 5.0,
            update_interval_seconds: 5,
            fill_variation: 0.0,
            temp_variation: 0.0,
            ..BinConfig::new(
                BinId::from("BIN_test"),
                Location::new(-37.8136, 144.9631),
            )
        }
    }

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(0)
    }

    #[test]
    fn five_seconds_at_five_per_hour() {
        let clock = ManualClock::new(Utc::now());
        let mut sim = BinSimulator::with_clock(noiseless_config(), clock.clone()).unwrap();

        clock.advance(Duration::seconds(5));
        let snapshot = sim.tick(&mut rng());

        // 10.0 + 5.0 * (5 / 3600) = 10.006944...
        assert!((sim.fill_level() - 10.006_944_444).abs() < 1e-6);
        assert_eq!(snapshot.fill_level_percentage, 10.01);
    }

    #[test]
    fn zero_elapsed_tick_changes_fill_only_by_bounded_noise() {
        let clock = ManualClock::new(Utc::now());
        let config = BinConfig {
            fill_variation: 0.5,
            ..noiseless_config()
        };
        let mut sim = BinSimulator::with_clock(config, clock).unwrap();

        let mut rng = rng();
        for _ in 0..50 {
            let before = sim.fill_level();
            let _ = sim.tick(&mut rng);
            assert!((sim.fill_level() - before).abs() <= 0.5 + f64::EPSILON);
        }
    }

    #[test]
    fn fill_level_saturates_at_one_hundred() {
        let clock = ManualClock::new(Utc::now());
        let config = BinConfig {
            initial_fill_level: 99.0,
            fill_rate_per_hour: 3600.0, // one percentage point per second
            ..noiseless_config()
        };
        let mut sim = BinSimulator::with_clock(config, clock.clone()).unwrap();

        let mut rng = rng();
        for _ in 0..10 {
            clock.advance(Duration::seconds(30));
            let snapshot = sim.tick(&mut rng);
            assert!(snapshot.fill_level_percentage <= 100.0);
        }
        assert_eq!(sim.fill_level(), 100.0);
    }

    #[test]
    fn fill_level_saturates_at_zero() {
        let clock = ManualClock::new(Utc::now());
        let config = BinConfig {
            initial_fill_level: 1.0,
            fill_rate_per_hour: -3600.0,
            ..noiseless_config()
        };
        let mut sim = BinSimulator::with_clock(config, clock.clone()).unwrap();

        let mut rng = rng();
        clock.advance(Duration::seconds(120));
        let snapshot = sim.tick(&mut rng);
        assert_eq!(snapshot.fill_level_percentage, 0.0);
        assert_eq!(sim.fill_level(), 0.0);
    }

    #[test]
    fn temperature_shifts_only_by_bounded_noise_per_tick() {
        let clock = ManualClock::new(Utc::now());
        let config = BinConfig {
            temp_variation: 0.2,
            ..noiseless_config()
        };
        let mut sim = BinSimulator::with_clock(config, clock.clone()).unwrap();

        let mut rng = rng();
        let mut previous = 20.0;
        for _ in 0..20 {
            clock.advance(Duration::seconds(5));
            let snapshot = sim.tick(&mut rng);
            // Rounding adds up to half a hundredth on top of the bound.
            assert!((snapshot.temperature_celsius - previous).abs() <= 0.2 + 0.01);
            previous = snapshot.temperature_celsius;
        }
    }

    #[test]
    fn status_carries_over_until_set() {
        let clock = ManualClock::new(Utc::now());
        let mut sim = BinSimulator::with_clock(noiseless_config(), clock).unwrap();

        let mut rng = rng();
        assert_eq!(sim.tick(&mut rng).status, "online");

        sim.set_status("low battery");
        assert_eq!(sim.tick(&mut rng).status, "low battery");
        assert_eq!(sim.status(), "low battery");
    }

    #[test]
    fn snapshot_carries_identity_and_link() {
        let clock = ManualClock::new(Utc::now());
        let config = BinConfig {
            linked_house_id: Some(HouseId::from("house_1_1000")),
            ..noiseless_config()
        };
        let mut sim = BinSimulator::with_clock(config, clock).unwrap();

        let snapshot = sim.tick(&mut rng());
        assert_eq!(snapshot.bin_id.as_str(), "BIN_test");
        assert_eq!(
            snapshot.linked_house_id.as_ref().map(HouseId::as_str),
            Some("house_1_1000")
        );
        assert_eq!(snapshot.location, Location::new(-37.8136, 144.9631));
    }

    #[test]
    fn snapshot_timestamp_comes_from_the_clock() {
        let start = Utc::now();
        let clock = ManualClock::new(start);
        let mut sim = BinSimulator::with_clock(noiseless_config(), clock.clone()).unwrap();

        clock.advance(Duration::seconds(5));
        let snapshot = sim.tick(&mut rng());
        assert_eq!(
            snapshot.timestamp.timestamp_millis(),
            start.timestamp_millis() + 5_000
        );
    }

    #[test]
    fn out_of_range_fill_level_is_rejected() {
        let config = BinConfig {
            initial_fill_level: 100.5,
            ..noiseless_config()
        };
        assert!(matches!(
            BinSimulator::new(config).unwrap_err(),
            SimulatorError::FillLevelOutOfRange(_)
        ));
    }

    #[test]
    fn negative_variation_is_rejected_at_construction() {
        // A negative bound would invert the noise sampling interval on
        // the first tick, so it must never get past the constructor.
        let config = BinConfig {
            fill_variation: -0.5,
            ..noiseless_config()
        };
        assert!(matches!(
            BinSimulator::new(config).unwrap_err(),
            SimulatorError::NegativeVariation(_)
        ));

        let config = BinConfig {
            temp_variation: -0.1,
            ..noiseless_config()
        };
        assert!(matches!(
            BinSimulator::new(config).unwrap_err(),
            SimulatorError::NegativeVariation(_)
        ));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = BinConfig {
            update_interval_seconds: 0,
            ..noiseless_config()
        };
        assert!(matches!(
            BinSimulator::new(config).unwrap_err(),
            SimulatorError::NonPositiveInterval { seconds: 0 }
        ));
    }
}
