//! Broker boundary: the [`Publisher`] trait and its NATS implementation.
//!
//! The pipeline only ever sees `publish(subject, payload) -> ack or error`;
//! everything else about the broker (sessions, reconnects, wire protocol)
//! stays behind this seam. The connection is publish-only and safe to
//! share across workers.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::PublishError;

/// A publish-only broker connection.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish one payload to a subject and wait for acknowledgement.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] if the broker rejects the publish or the
    /// payload never reaches it.
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), PublishError>;
}

/// [`Publisher`] backed by a NATS client.
///
/// Core NATS has no per-message broker ack, so each publish is followed by
/// a flush: a completed flush means the server has received the message,
/// which is the acknowledgement this pipeline works with.
pub struct NatsPublisher {
    client: async_nats::Client,
}

impl NatsPublisher {
    /// Wrap an already-connected NATS client.
    pub const fn new(client: async_nats::Client) -> Self {
        Self { client }
    }

    /// Connect to a NATS server.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Connect`] if the connection cannot be
    /// established.
    pub async fn connect(url: &str) -> Result<Self, PublishError> {
        info!(url = url, "connecting to NATS server");
        let client = async_nats::connect(url)
            .await
            .map_err(|e| PublishError::Connect {
                url: url.to_owned(),
                message: e.to_string(),
            })?;
        info!("NATS connection established");
        Ok(Self { client })
    }
}

#[async_trait]
impl Publisher for NatsPublisher {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), PublishError> {
        debug!(subject = subject, bytes = payload.len(), "publishing record");
        self.client
            .publish(subject.to_owned(), payload.into())
            .await
            .map_err(|e| PublishError::Transport {
                subject: subject.to_owned(),
                message: e.to_string(),
            })?;
        // Flush so the server has the message before we report success.
        self.client
            .flush()
            .await
            .map_err(|e| PublishError::Transport {
                subject: subject.to_owned(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}
