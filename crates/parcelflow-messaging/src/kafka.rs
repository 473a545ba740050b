//! Kafka-backed transport: the production `EventPublisher` and the channel
//! consumers.
//!
//! Delivery is at-least-once. The producer keys every record by parcel id so
//! all events for one parcel land on one partition and are observed in send
//! order. The consumer commits offsets manually, only after the router has
//! acknowledged a message; a `Retry` disposition aborts the consume loop
//! with the offset uncommitted, and the supervisor restarts the consumer so
//! the broker redelivers from the last committed offset.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::message::Message;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use thiserror::Error;

use parcelflow_core::events::DomainEvent;
use parcelflow_core::publisher::{EventPublisher, PublishError};

use crate::router::Disposition;

/// Failure in the Kafka consumer.
#[derive(Debug, Error)]
pub enum ConsumerError {
    /// Could not create or subscribe the consumer.
    #[error("failed to subscribe to '{channel}': {reason}")]
    Subscribe {
        /// Channel the subscription targeted.
        channel: String,
        /// Client error description.
        reason: String,
    },

    /// A message handler requested redelivery; the consume loop stops with
    /// the offset uncommitted.
    #[error("processing on '{channel}' requested redelivery")]
    RetryRequested {
        /// Channel being consumed.
        channel: String,
    },
}

/// Kafka implementation of [`EventPublisher`].
pub struct KafkaEventPublisher {
    producer: FutureProducer,
    timeout: Duration,
}

impl KafkaEventPublisher {
    /// Creates a publisher connected to `brokers`.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] if the producer cannot be created.
    pub fn new(brokers: &str) -> Result<Self, PublishError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .set("acks", "all")
            .create()
            .map_err(|e| PublishError {
                channel: String::new(),
                reason: format!("failed to create producer: {e}"),
            })?;
        tracing::info!(brokers = %brokers, "Kafka producer created");
        Ok(Self {
            producer,
            timeout: Duration::from_secs(5),
        })
    }
}

#[async_trait]
impl EventPublisher for KafkaEventPublisher {
    async fn publish(&self, channel: &str, event: &DomainEvent) -> Result<(), PublishError> {
        let payload = serde_json::to_vec(event).map_err(|e| PublishError {
            channel: channel.to_owned(),
            reason: format!("failed to serialize event: {e}"),
        })?;
        // Partition key = parcel id, the per-parcel ordering guarantee.
        let key = event.parcel_id.to_string();
        let record = FutureRecord::to(channel).payload(&payload).key(&key);

        match self.producer.send(record, Timeout::After(self.timeout)).await {
            Ok((partition, offset)) => {
                tracing::debug!(
                    channel = %channel,
                    partition,
                    offset,
                    parcel_id = %event.parcel_id,
                    event_type = %event.event_type,
                    "event published"
                );
                Ok(())
            }
            Err((kafka_error, _)) => Err(PublishError {
                channel: channel.to_owned(),
                reason: kafka_error.to_string(),
            }),
        }
    }
}

/// Consumes one logical channel and hands each message to a handler.
pub struct ChannelConsumer {
    consumer: StreamConsumer,
    channel: String,
}

impl ChannelConsumer {
    /// Creates a consumer for `channel` within `consumer_group`.
    ///
    /// # Errors
    ///
    /// Returns [`ConsumerError::Subscribe`] if the consumer cannot be
    /// created or the subscription fails.
    pub fn new(
        brokers: &str,
        consumer_group: &str,
        channel: &str,
    ) -> Result<Self, ConsumerError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("group.id", consumer_group)
            // Manual commit for at-least-once delivery.
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "earliest")
            .set("session.timeout.ms", "6000")
            .set("enable.partition.eof", "false")
            .create()
            .map_err(|e| ConsumerError::Subscribe {
                channel: channel.to_owned(),
                reason: format!("failed to create consumer: {e}"),
            })?;

        consumer
            .subscribe(&[channel])
            .map_err(|e| ConsumerError::Subscribe {
                channel: channel.to_owned(),
                reason: e.to_string(),
            })?;

        tracing::info!(channel = %channel, consumer_group = %consumer_group, "subscribed");
        Ok(Self {
            consumer,
            channel: channel.to_owned(),
        })
    }

    /// Runs the consume loop until the handler requests redelivery or the
    /// stream ends.
    ///
    /// Each message is handled to completion before its offset is committed;
    /// `Disposition::Retry` stops the loop with the offset uncommitted so
    /// the broker re-presents the message after restart.
    ///
    /// # Errors
    ///
    /// Returns [`ConsumerError::RetryRequested`] when a handler asks for
    /// redelivery.
    pub async fn run<F, Fut>(&self, mut handle: F) -> Result<(), ConsumerError>
    where
        F: FnMut(Vec<u8>) -> Fut,
        Fut: Future<Output = Disposition>,
    {
        let mut stream = self.consumer.stream();

        while let Some(message) = stream.next().await {
            match message {
                Ok(message) => {
                    let Some(payload) = message.payload() else {
                        tracing::warn!(channel = %self.channel, "message without payload dropped");
                        self.commit(&message);
                        continue;
                    };

                    match handle(payload.to_vec()).await {
                        Disposition::Ack => self.commit(&message),
                        Disposition::Retry => {
                            return Err(ConsumerError::RetryRequested {
                                channel: self.channel.clone(),
                            });
                        }
                    }
                }
                Err(e) => {
                    // Transient broker errors; the stream recovers on its own.
                    tracing::warn!(channel = %self.channel, error = %e, "receive error");
                }
            }
        }

        tracing::debug!(channel = %self.channel, "consumer stream ended");
        Ok(())
    }

    fn commit(&self, message: &rdkafka::message::BorrowedMessage<'_>) {
        if let Err(e) = self.consumer.commit_message(message, CommitMode::Async) {
            tracing::warn!(
                channel = %self.channel,
                offset = message.offset(),
                error = %e,
                "offset commit failed; message may be redelivered"
            );
        }
    }
}
