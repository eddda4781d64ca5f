//! Order event channel: a Kafka producer/consumer pair, and an in-process
//! channel with the same contract for running without a broker.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::{Header, Message, OwnedHeaders};
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use rdkafka::ClientConfig;
use tokio::sync::mpsc;

use crate::domain::errors::DomainError;
use crate::domain::events::{OrderEvent, EVENT_TYPE_HEADER, ORDER_EVENTS_TOPIC};
use crate::domain::ports::{EventHandler, EventPublisher};

const SEND_TIMEOUT: Duration = Duration::from_secs(5);
const FLUSH_TIMEOUT: Duration = Duration::from_secs(10);
/// Pause after a failed receive so a dead broker does not spin the loop.
const RECEIVE_RETRY_DELAY: Duration = Duration::from_secs(1);

pub struct KafkaEventPublisher {
    producer: FutureProducer,
}

impl KafkaEventPublisher {
    pub fn new(brokers: &str, client_id: &str) -> Result<Self, DomainError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("client.id", client_id)
            .set("message.timeout.ms", "5000")
            .create()?;
        Ok(Self { producer })
    }
}

#[async_trait]
impl EventPublisher for KafkaEventPublisher {
    async fn publish(&self, event: &OrderEvent) -> Result<(), DomainError> {
        let payload = serde_json::to_vec(event)?;
        let key = event.order_id.to_string();
        let headers = OwnedHeaders::new().insert(Header {
            key: EVENT_TYPE_HEADER,
            value: Some(event.event_type.as_str()),
        });

        let record = FutureRecord::to(ORDER_EVENTS_TOPIC)
            .key(&key)
            .payload(&payload)
            .headers(headers);

        self.producer
            .send(record, Timeout::After(SEND_TIMEOUT))
            .await
            .map_err(|(e, _)| DomainError::from(e))?;

        log::debug!("Published {} for order {}", event.event_type, event.order_id);
        Ok(())
    }

    fn close(&self) {
        if let Err(e) = self.producer.flush(Timeout::After(FLUSH_TIMEOUT)) {
            log::warn!("Failed to flush Kafka producer: {}", e);
        }
    }
}

/// Subscribe to the order events topic and hand every payload to `handler`
/// until the task is aborted.
pub async fn run_kafka_consumer(
    brokers: String,
    group_id: String,
    client_id: String,
    handler: Arc<dyn EventHandler>,
) -> Result<(), DomainError> {
    let consumer: StreamConsumer = ClientConfig::new()
        .set("bootstrap.servers", &brokers)
        .set("group.id", &group_id)
        .set("client.id", &client_id)
        .set("auto.offset.reset", "earliest")
        .set("enable.auto.commit", "true")
        .create()?;
    consumer.subscribe(&[ORDER_EVENTS_TOPIC])?;

    log::info!(
        "Kafka consumer subscribed to '{}' as group '{}'",
        ORDER_EVENTS_TOPIC,
        group_id
    );

    loop {
        // BorrowedMessage is not Send; copy the payload out before awaiting.
        let received = match consumer.recv().await {
            Ok(message) => Ok(message.payload().map(<[u8]>::to_vec)),
            Err(e) => Err(e.to_string()),
        };
        let payload = match received {
            Ok(payload) => payload,
            Err(e) => {
                back_off(e, RECEIVE_RETRY_DELAY).await;
                continue;
            }
        };

        match payload {
            Some(bytes) => handler.handle(&bytes).await,
            None => log::warn!("Skipping order event with empty payload"),
        }
    }
}

async fn back_off(error: String, delay: Duration) {
    log::error!("Kafka consumer error: {}; retrying in {:?}", error, delay);
    tokio::time::sleep(delay).await;
}

/// Publisher over an in-process channel; pair with [`run_channel_consumer`].
pub struct ChannelEventPublisher {
    sender: mpsc::UnboundedSender<Vec<u8>>,
}

impl ChannelEventPublisher {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Vec<u8>>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl EventPublisher for ChannelEventPublisher {
    async fn publish(&self, event: &OrderEvent) -> Result<(), DomainError> {
        let payload = serde_json::to_vec(event)?;
        self.sender
            .send(payload)
            .map_err(|_| DomainError::Internal("order event channel is closed".to_string()))
    }
}

/// Drain the in-process channel until every sender is dropped.
pub async fn run_channel_consumer(
    mut receiver: mpsc::UnboundedReceiver<Vec<u8>>,
    handler: Arc<dyn EventHandler>,
) {
    while let Some(payload) = receiver.recv().await {
        handler.handle(&payload).await;
    }
    log::info!("Order event channel closed");
}
