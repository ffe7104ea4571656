//! Dataset generation and telemetry publishing binary.
//!
//! This is the main entry point that wires together the tier generators,
//! the per-bin telemetry simulators, the JSON collection store, and the
//! NATS publish pipeline. It generates a full suburb hierarchy, simulates
//! a configured number of telemetry rounds, and publishes everything to
//! the bus.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `binsim.yaml`
//! 3. Seed the rng (configured seed or OS entropy)
//! 4. Generate driveways, houses, streets, suburb; persist each tier
//! 5. Build one bin simulator per house
//! 6. Run the telemetry rounds, collecting snapshots
//! 7. Connect to NATS
//! 8. Publish all tiers and the snapshots, logging per-batch accounting

mod config;
mod error;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use binsim_publisher::{
    BatchOptions, BatchResult, NatsPublisher, PublishPipeline, TopicSet,
};
use binsim_store::{CollectionStore, JsonFileStore};
use binsim_suburb::{
    generate_driveways, generate_houses, generate_streets, generate_suburb,
};
use binsim_telemetry::{BinConfig, BinSimulator};
use binsim_types::{BinId, Driveway, House, TelemetrySnapshot, Tier};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{EngineConfig, TelemetryConfig};
use crate::error::EngineError;

/// Application entry point.
///
/// Runs one full generate-simulate-publish pass and exits. Generation
/// and persistence errors are fatal; individual publish failures are
/// reported in the batch accounting instead.
///
/// # Errors
///
/// Returns an error if configuration, generation, persistence, or the
/// initial NATS connection fails.
#[tokio::main]
#[allow(clippy::too_many_lines)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("binsim-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        suburb = config.suburb.name,
        driveways = config.suburb.driveways,
        houses = config.suburb.houses,
        streets = config.suburb.streets,
        rounds = config.telemetry.rounds,
        "Configuration loaded"
    );

    // 3. Seed the rng.
    let mut rng = config
        .seed
        .map_or_else(SmallRng::from_os_rng, SmallRng::seed_from_u64);
    if let Some(seed) = config.seed {
        info!(seed, "Using configured seed");
    }

    // 4. Generate the hierarchy in dependency order, persisting each
    //    tier only after its generation succeeds.
    let store = JsonFileStore::new(&config.output.data_dir);
    let region = config.suburb.region.to_region();

    let generated = generate_driveways(config.suburb.driveways, &region, &mut rng)?;
    store.write(Tier::Driveways, &generated).await?;
    info!(count = generated.len(), "Driveways generated and persisted");

    // Each downstream tier is built from the persisted collection of the
    // tier below it, the same records any other store consumer sees.
    let driveways: Vec<Driveway> = store.read(Tier::Driveways).await?;
    let generation = generate_houses(config.suburb.houses, &driveways, &region, &mut rng)?;
    store.write(Tier::Houses, &generation.houses).await?;
    info!(
        count = generation.houses.len(),
        warnings = generation.warnings.len(),
        "Houses generated and persisted"
    );

    let houses: Vec<House> = store.read(Tier::Houses).await?;
    let streets = generate_streets(config.suburb.streets, &houses, &mut rng)?;
    store.write(Tier::Streets, &streets).await?;
    info!(count = streets.len(), "Streets generated and persisted");

    let suburb = generate_suburb(&config.suburb.name, &streets, &mut rng)?;
    store.write(Tier::Suburb, std::slice::from_ref(&suburb)).await?;
    info!(suburb_id = %suburb.id, "Suburb generated and persisted");

    // 5. Build one simulator per house.
    let mut simulators = houses
        .iter()
        .map(|house| build_simulator(house, &config.telemetry, &mut rng))
        .collect::<Result<Vec<_>, _>>()?;
    info!(count = simulators.len(), "Bin simulators initialized");

    // 6. Run the telemetry rounds.
    let interval = Duration::from_secs(config.telemetry.update_interval_seconds);
    let mut snapshots: Vec<TelemetrySnapshot> =
        Vec::with_capacity(simulators.len().saturating_mul(config.telemetry.rounds));
    for round in 0..config.telemetry.rounds {
        if round > 0 {
            tokio::time::sleep(interval).await;
        }
        for simulator in &mut simulators {
            snapshots.push(simulator.tick(&mut rng));
        }
        info!(round, collected = snapshots.len(), "Telemetry round complete");
    }
    store.write(Tier::Bins, &snapshots).await?;

    // 7. Connect to NATS.
    info!(nats_url = config.publish.nats_url, "Connecting to NATS");
    let publisher = NatsPublisher::connect(&config.publish.nats_url).await?;
    let pipeline = PublishPipeline::new(Arc::new(publisher));
    let topics = TopicSet::new(&config.publish.subject_base);

    let cancel = CancellationToken::new();
    spawn_shutdown_listener(cancel.clone());

    let options = BatchOptions {
        concurrency_limit: config.publish.concurrency_limit,
        per_record_timeout: Duration::from_millis(config.publish.per_record_timeout_ms),
        throttle: Duration::from_millis(config.publish.throttle_ms),
        cancel,
    };

    // 8. Publish every tier, then the snapshots.
    let subject = topics.for_tier(Tier::Driveways);
    let result = pipeline.publish_batch(&subject, driveways, &options).await;
    log_publish_outcome(&subject, &result);

    let subject = topics.for_tier(Tier::Houses);
    let result = pipeline.publish_batch(&subject, houses, &options).await;
    log_publish_outcome(&subject, &result);

    let subject = topics.for_tier(Tier::Streets);
    let result = pipeline.publish_batch(&subject, streets, &options).await;
    log_publish_outcome(&subject, &result);

    let subject = topics.for_tier(Tier::Suburb);
    let result = pipeline.publish_single(&subject, suburb, &options).await;
    log_publish_outcome(&subject, &result);

    let subject = topics.for_tier(Tier::Bins);
    let result = pipeline.publish_batch(&subject, snapshots, &options).await;
    log_publish_outcome(&subject, &result);

    info!("binsim-engine shutdown complete");
    Ok(())
}

/// Load the engine configuration from `binsim.yaml`.
///
/// Looks for the config file relative to the current working directory.
fn load_config() -> Result<EngineConfig, EngineError> {
    let config_path = Path::new("binsim.yaml");
    if config_path.exists() {
        let config = EngineConfig::from_file(config_path)?;
        Ok(config)
    } else {
        info!("Config file not found, using defaults");
        Ok(EngineConfig::default())
    }
}

/// Build a bin simulator for one house.
///
/// Starting fill, fill rate, and starting temperature are each sampled
/// per bin from the configured ranges, so every bin gets its own
/// character instead of a fleet of identical sensors.
fn build_simulator(
    house: &House,
    telemetry: &TelemetryConfig,
    rng: &mut impl Rng,
) -> Result<BinSimulator, EngineError> {
    let fill_max = telemetry.initial_fill_max.clamp(0.0, 100.0);
    let config = BinConfig {
        initial_fill_level: rng.random_range(0.0..=fill_max),
        fill_rate_per_hour: sample_between(
            telemetry.fill_rate_min_per_hour,
            telemetry.fill_rate_max_per_hour,
            rng,
        ),
        update_interval_seconds: telemetry.update_interval_seconds,
        initial_temperature_celsius: sample_between(
            telemetry.initial_temperature_min,
            telemetry.initial_temperature_max,
            rng,
        ),
        fill_variation: telemetry.fill_variation,
        temp_variation: telemetry.temp_variation,
        linked_house_id: Some(house.id.clone()),
        ..BinConfig::new(BinId::for_house(&house.id), house.location)
    };
    Ok(BinSimulator::new(config)?)
}

/// Sample uniformly between two bounds, in either order.
fn sample_between(a: f64, b: f64, rng: &mut impl Rng) -> f64 {
    rng.random_range(a.min(b)..=a.max(b))
}

/// Spawn a task that cancels in-flight publishing on Ctrl-C.
///
/// Cancellation stops new dispatches; records already in flight finish
/// or time out, and the cancelled remainder shows up in the batch
/// accounting.
fn spawn_shutdown_listener(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Shutdown signal received, cancelling publishing");
            cancel.cancel();
        }
    });
}

/// Log the aggregate outcome of one publish batch.
fn log_publish_outcome<T>(subject: &str, result: &BatchResult<T>) {
    if result.is_complete() {
        info!(
            subject = subject,
            published = result.succeeded,
            "All records published"
        );
    } else {
        warn!(
            subject = subject,
            published = result.succeeded,
            failed = result.failed.len(),
            "Batch finished with failures"
        );
        for failure in &result.failed {
            warn!(subject = subject, error = %failure.error, "Record publish failed");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use binsim_types::{HouseId, Location};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn sample_house(id: &str) -> House {
        House {
            id: HouseId::from(id),
            address: "1 Main St".to_owned(),
            location: Location::new(-37.81, 144.96),
            driveway_id: None,
        }
    }

    #[test]
    fn bins_get_individual_starting_temperatures() {
        let telemetry = TelemetryConfig::default();
        let mut rng = SmallRng::seed_from_u64(3);

        let mut sim_a = build_simulator(&sample_house("house_1_1000"), &telemetry, &mut rng).unwrap();
        let mut sim_b = build_simulator(&sample_house("house_2_1000"), &telemetry, &mut rng).unwrap();

        let snap_a = sim_a.tick(&mut rng);
        let snap_b = sim_b.tick(&mut rng);

        // Each bin samples its own start from [15, 25]; the tick adds at
        // most temp_variation plus rounding.
        for snapshot in [&snap_a, &snap_b] {
            assert!(snapshot.temperature_celsius >= 15.0 - 0.21);
            assert!(snapshot.temperature_celsius <= 25.0 + 0.21);
        }
        assert!((snap_a.temperature_celsius - snap_b.temperature_celsius).abs() > f64::EPSILON);
    }

    #[test]
    fn sample_between_accepts_bounds_in_either_order() {
        let mut rng = SmallRng::seed_from_u64(4);
        for _ in 0..100 {
            let value = sample_between(8.0, 2.0, &mut rng);
            assert!((2.0..=8.0).contains(&value));
        }
    }

    #[test]
    fn swapped_rate_bounds_still_build_a_simulator() {
        let telemetry = TelemetryConfig {
            fill_rate_min_per_hour: 8.0,
            fill_rate_max_per_hour: 2.0,
            ..TelemetryConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(5);
        assert!(build_simulator(&sample_house("house_3_1000"), &telemetry, &mut rng).is_ok());
    }
}
