//! NATS publishing for the suburb dataset pipeline.
//!
//! This crate owns everything between an in-memory record and an
//! acknowledged message on the bus: the broker abstraction, subject
//! naming, and the bounded-concurrency batch pipeline that fans records
//! out without letting one failure sink its siblings.
//!
//! # Modules
//!
//! - [`broker`] -- The [`Publisher`] trait and its NATS implementation.
//! - [`error`] -- [`PublishError`] covering connect, serialize,
//!   transport, timeout, and cancellation failures.
//! - [`pipeline`] -- [`PublishPipeline`] with per-batch options,
//!   per-record timeouts, and aggregate results.
//! - [`topics`] -- [`TopicSet`] mapping dataset tiers to bus subjects.

pub mod broker;
pub mod error;
pub mod pipeline;
pub mod topics;

// Re-export primary types at crate root.
pub use broker::{NatsPublisher, Publisher};
pub use error::PublishError;
pub use pipeline::{BatchOptions, BatchResult, FailedRecord, PublishPipeline};
pub use topics::{DEFAULT_SUBJECT_BASE, TopicSet};
