//! Per-bin telemetry simulation for the binsim suburb dataset.
//!
//! One simulator instance per bin, each exclusively owning its continuous
//! state (fill level, temperature). A tick advances the state by elapsed
//! wall-clock time with bounded uniform noise and emits an immutable
//! [`TelemetrySnapshot`](binsim_types::TelemetrySnapshot).
//!
//! Because ticks depend on wall-clock time and randomness, production runs
//! are not bit-reproducible; inject a [`ManualClock`] and a seeded rng to
//! pin behavior down in tests.
//!
//! # Modules
//!
//! - [`clock`] -- the [`Clock`] trait, [`SystemClock`], and [`ManualClock`]
//! - [`error`] -- [`SimulatorError`] for invalid construction parameters
//! - [`simulator`] -- [`BinConfig`] and the [`BinSimulator`] state machine

pub mod clock;
pub mod error;
pub mod simulator;

// Re-export primary types at crate root.
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::SimulatorError;
pub use simulator::{BinConfig, BinSimulator};
