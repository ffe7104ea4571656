//! Configuration loading and typed config structures for the engine.
//!
//! The canonical configuration lives in `binsim.yaml` at the project root.
//! This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.
//! Every field has a default, so an empty file is a valid configuration.

use std::path::Path;

use binsim_publisher::DEFAULT_SUBJECT_BASE;
use binsim_suburb::Region;
use binsim_types::Location;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
///
/// Mirrors the structure of `binsim.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Suburb hierarchy parameters (name, tier counts, region).
    #[serde(default)]
    pub suburb: SuburbConfig,

    /// Bin telemetry simulation parameters.
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Message bus connection and batching parameters.
    #[serde(default)]
    pub publish: PublishConfig,

    /// Persistence parameters.
    #[serde(default)]
    pub output: OutputConfig,

    /// Random seed for reproducible tier generation. When absent, the
    /// rng seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl EngineConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `NATS_URL` environment variable overrides `publish.nats_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.publish.apply_env_overrides();
        Ok(config)
    }
}

/// Suburb hierarchy configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SuburbConfig {
    /// Human-readable suburb name.
    #[serde(default = "default_suburb_name")]
    pub name: String,

    /// Number of driveways to generate.
    #[serde(default = "default_driveways")]
    pub driveways: usize,

    /// Number of houses to generate.
    #[serde(default = "default_houses")]
    pub houses: usize,

    /// Number of streets partitioning the houses.
    #[serde(default = "default_streets")]
    pub streets: usize,

    /// Geographic sampling region.
    #[serde(default)]
    pub region: RegionConfig,
}

impl Default for SuburbConfig {
    fn default() -> Self {
        Self {
            name: default_suburb_name(),
            driveways: default_driveways(),
            houses: default_houses(),
            streets: default_streets(),
            region: RegionConfig::default(),
        }
    }
}

/// Rectangular geographic region to sample locations from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegionConfig {
    /// Center latitude in degrees.
    #[serde(default = "default_base_latitude")]
    pub base_latitude: f64,

    /// Center longitude in degrees.
    #[serde(default = "default_base_longitude")]
    pub base_longitude: f64,

    /// Total latitude span in degrees.
    #[serde(default = "default_latitude_range")]
    pub latitude_range: f64,

    /// Total longitude span in degrees.
    #[serde(default = "default_longitude_range")]
    pub longitude_range: f64,
}

impl RegionConfig {
    /// Build the sampling [`Region`] this config describes.
    pub const fn to_region(&self) -> Region {
        Region::new(
            Location {
                latitude: self.base_latitude,
                longitude: self.base_longitude,
            },
            self.latitude_range,
            self.longitude_range,
        )
    }
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            base_latitude: default_base_latitude(),
            base_longitude: default_base_longitude(),
            latitude_range: default_latitude_range(),
            longitude_range: default_longitude_range(),
        }
    }
}

/// Bin telemetry simulation configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TelemetryConfig {
    /// Number of telemetry rounds to run. Each round ticks every bin
    /// once and collects the snapshots.
    #[serde(default = "default_rounds")]
    pub rounds: usize,

    /// Upper bound of the uniformly-sampled starting fill level, in
    /// percentage points. The lower bound is zero.
    #[serde(default = "default_initial_fill_max")]
    pub initial_fill_max: f64,

    /// Lower bound of the per-bin fill rate, in percentage points per
    /// hour. Each bin samples its own rate from this range.
    #[serde(default = "default_fill_rate_min")]
    pub fill_rate_min_per_hour: f64,

    /// Upper bound of the per-bin fill rate.
    #[serde(default = "default_fill_rate_max")]
    pub fill_rate_max_per_hour: f64,

    /// Nominal seconds between data points; also the sleep between
    /// rounds.
    #[serde(default = "default_update_interval_seconds")]
    pub update_interval_seconds: u64,

    /// Max random percentage points added/subtracted per tick.
    #[serde(default = "default_fill_variation")]
    pub fill_variation: f64,

    /// Max random degrees Celsius added/subtracted per tick.
    #[serde(default = "default_temp_variation")]
    pub temp_variation: f64,

    /// Lower bound of the per-bin starting temperature in Celsius.
    #[serde(default = "default_initial_temperature_min")]
    pub initial_temperature_min: f64,

    /// Upper bound of the per-bin starting temperature.
    #[serde(default = "default_initial_temperature_max")]
    pub initial_temperature_max: f64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            rounds: default_rounds(),
            initial_fill_max: default_initial_fill_max(),
            fill_rate_min_per_hour: default_fill_rate_min(),
            fill_rate_max_per_hour: default_fill_rate_max(),
            update_interval_seconds: default_update_interval_seconds(),
            fill_variation: default_fill_variation(),
            temp_variation: default_temp_variation(),
            initial_temperature_min: default_initial_temperature_min(),
            initial_temperature_max: default_initial_temperature_max(),
        }
    }
}

/// Message bus configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PublishConfig {
    /// NATS server URL (e.g. `nats://localhost:4222`).
    #[serde(default = "default_nats_url")]
    pub nats_url: String,

    /// Dotted subject prefix for all published tiers.
    #[serde(default = "default_subject_base")]
    pub subject_base: String,

    /// Maximum records in flight at once per batch.
    #[serde(default = "default_concurrency_limit")]
    pub concurrency_limit: usize,

    /// Per-record acknowledgement deadline in milliseconds.
    #[serde(default = "default_per_record_timeout_ms")]
    pub per_record_timeout_ms: u64,

    /// Fixed delay after each dispatch in milliseconds.
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
}

impl PublishConfig {
    /// Apply environment variable overrides for deployment wiring.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("NATS_URL") {
            self.nats_url = url;
        }
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            nats_url: default_nats_url(),
            subject_base: default_subject_base(),
            concurrency_limit: default_concurrency_limit(),
            per_record_timeout_ms: default_per_record_timeout_ms(),
            throttle_ms: default_throttle_ms(),
        }
    }
}

/// Persistence configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutputConfig {
    /// Directory holding the per-tier JSON collection files.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_suburb_name() -> String {
    "Igention".to_owned()
}

const fn default_driveways() -> usize {
    15
}

const fn default_houses() -> usize {
    20
}

const fn default_streets() -> usize {
    5
}

const fn default_base_latitude() -> f64 {
    -37.81
}

const fn default_base_longitude() -> f64 {
    144.96
}

const fn default_latitude_range() -> f64 {
    0.02
}

const fn default_longitude_range() -> f64 {
    0.03
}

const fn default_rounds() -> usize {
    3
}

const fn default_initial_fill_max() -> f64 {
    25.0
}

const fn default_fill_rate_min() -> f64 {
    2.0
}

const fn default_fill_rate_max() -> f64 {
    8.0
}

const fn default_update_interval_seconds() -> u64 {
    60
}

const fn default_fill_variation() -> f64 {
    0.5
}

const fn default_temp_variation() -> f64 {
    0.2
}

const fn default_initial_temperature_min() -> f64 {
    15.0
}

const fn default_initial_temperature_max() -> f64 {
    25.0
}

fn default_nats_url() -> String {
    "nats://localhost:4222".to_owned()
}

fn default_subject_base() -> String {
    DEFAULT_SUBJECT_BASE.to_owned()
}

const fn default_concurrency_limit() -> usize {
    4
}

const fn default_per_record_timeout_ms() -> u64 {
    5000
}

const fn default_throttle_ms() -> u64 {
    10
}

fn default_data_dir() -> String {
    "data".to_owned()
}
