//! Message broker client factory.
//!
//! The broker is Redis. Each queue is a Redis list: producers push to the
//! head and consumers move messages from the tail into a per-consumer
//! processing list, where they stay until acknowledged. `prefetch_count`
//! bounds how many unacknowledged messages a consumer holds. Payloads are
//! opaque bytes.
use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use log::{debug, error};
use redis::{aio::ConnectionManager, AsyncCommands, Script};
use tokio::time::timeout;
use url::Url;

use crate::{
    constants::DEFAULT_QUEUE_CONNECT_TIMEOUT_MS,
    models::{ResourceError, SecretString},
};

use super::ResourceFactory;

#[derive(Debug, Clone, PartialEq)]
pub struct QueueConnectionOptions {
    pub username: String,
    pub password: SecretString,
    pub host: String,
    pub port: u16,
    pub prefetch_count: u64,
    pub connect_timeout: Duration,
}

impl QueueConnectionOptions {
    pub fn default_connect_timeout() -> Duration {
        Duration::from_millis(DEFAULT_QUEUE_CONNECT_TIMEOUT_MS)
    }

    /// Broker URL with percent-encoded credentials.
    ///
    /// Contains the password; never log it. Use [`Self::redacted_url`].
    pub fn connection_url(&self) -> Result<Url, ResourceError> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(ResourceError::invalid_option("queueHost", "host is empty"));
        }
        let authority = if host.contains(':') && !host.starts_with('[') {
            format!("[{}]:{}", host, self.port)
        } else {
            format!("{}:{}", host, self.port)
        };

        let mut url = Url::parse(&format!("redis://{}/", authority))
            .map_err(|e| ResourceError::invalid_option("queueHost", e.to_string()))?;

        if !self.username.is_empty() {
            url.set_username(&self.username).map_err(|_| {
                ResourceError::invalid_option("queueUsername", "cannot be set on broker URL")
            })?;
        }
        if !self.password.is_empty() {
            let password = self.password.to_str();
            url.set_password(Some(&password)).map_err(|_| {
                ResourceError::invalid_option("queuePassword", "cannot be set on broker URL")
            })?;
        }

        Ok(url)
    }

    pub fn redacted_url(&self) -> String {
        format!("redis://{}@{}:{}/", self.username, self.host, self.port)
    }
}

/// Deferred constructor for queue clients.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueFactory {
    options: QueueConnectionOptions,
}

impl QueueFactory {
    pub fn new(options: QueueConnectionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &QueueConnectionOptions {
        &self.options
    }
}

#[async_trait]
impl ResourceFactory for QueueFactory {
    type Resource = QueueClient;

    async fn open(&self) -> Result<QueueClient, ResourceError> {
        let target = self.options.redacted_url();
        let url = self.options.connection_url()?;
        let client = redis::Client::open(url.as_str())?;

        debug!("Connecting to queue broker at {}", target);
        let connect_timeout = self.options.connect_timeout;
        let connection = timeout(connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| {
                error!("Timeout connecting to queue broker at {}", target);
                ResourceError::Timeout {
                    resource: target.clone(),
                    timeout_ms: connect_timeout.as_millis(),
                }
            })?
            .map_err(|e| {
                error!("Failed to connect to queue broker at {}: {}", target, e);
                ResourceError::Queue(e)
            })?;

        Ok(QueueClient {
            connection,
            consumer: next_consumer_name(),
            prefetch_count: usize::try_from(self.options.prefetch_count).unwrap_or(usize::MAX),
        })
    }
}

/// Live broker connection returned by [`QueueFactory::open`].
///
/// Received messages stay in this consumer's processing list until they are
/// acknowledged, and at most `prefetch_count` of them can be in flight. A
/// `prefetch_count` of 0 allows one. Clones share the connection and the
/// consumer name, and therefore the in-flight bound.
#[derive(Clone)]
pub struct QueueClient {
    connection: ConnectionManager,
    consumer: String,
    prefetch_count: usize,
}

/// Message handed out by [`QueueClient::receive`], pending until acked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    queue: String,
    payload: Vec<u8>,
}

impl Delivery {
    pub fn queue(&self) -> &str {
        &self.queue
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

// Moves messages from the queue tail into the processing list until the
// list holds ARGV[1] entries or the queue is empty.
const RECEIVE_SCRIPT: &str = r#"
local room = tonumber(ARGV[1]) - redis.call('LLEN', KEYS[2])
local messages = {}
for _ = 1, room do
    local message = redis.call('RPOPLPUSH', KEYS[1], KEYS[2])
    if not message then
        break
    end
    messages[#messages + 1] = message
end
return messages
"#;

// Returns every unacked message to the consuming end of the queue, oldest
// delivery first.
const REQUEUE_SCRIPT: &str = r#"
local moved = 0
while true do
    local message = redis.call('LPOP', KEYS[2])
    if not message then
        break
    end
    redis.call('RPUSH', KEYS[1], message)
    moved = moved + 1
end
return moved
"#;

static NEXT_CONSUMER: AtomicU64 = AtomicU64::new(0);

fn next_consumer_name() -> String {
    format!(
        "{}-{}",
        std::process::id(),
        NEXT_CONSUMER.fetch_add(1, Ordering::Relaxed)
    )
}

/// Redis list holding `consumer`'s unacked messages from `queue`.
pub fn processing_key(queue: &str, consumer: &str) -> String {
    format!("{}:processing:{}", queue, consumer)
}

impl QueueClient {
    /// Replaces the generated consumer name.
    ///
    /// A stable name lets a restarted process find its unacked messages with
    /// [`Self::requeue_unacked`].
    pub fn with_consumer(mut self, consumer: impl Into<String>) -> Self {
        self.consumer = consumer.into();
        self
    }

    pub fn consumer(&self) -> &str {
        &self.consumer
    }

    pub fn prefetch_count(&self) -> usize {
        self.prefetch_count
    }

    /// Maximum number of unacked messages per queue.
    pub fn capacity(&self) -> usize {
        self.prefetch_count.max(1)
    }

    pub async fn ping(&self) -> Result<(), ResourceError> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    pub async fn publish(&self, queue: &str, payload: &[u8]) -> Result<(), ResourceError> {
        let mut conn = self.connection.clone();
        let _: () = conn.lpush(queue, payload).await?;
        Ok(())
    }

    /// Takes messages, oldest first, until `capacity` are unacked.
    ///
    /// Returns an empty batch when the bound is already reached or the queue
    /// is empty.
    pub async fn receive(&self, queue: &str) -> Result<Vec<Delivery>, ResourceError> {
        let mut conn = self.connection.clone();
        let payloads: Vec<Vec<u8>> = Script::new(RECEIVE_SCRIPT)
            .key(queue)
            .key(processing_key(queue, &self.consumer))
            .arg(self.capacity())
            .invoke_async(&mut conn)
            .await?;

        Ok(payloads
            .into_iter()
            .map(|payload| Delivery {
                queue: queue.to_string(),
                payload,
            })
            .collect())
    }

    /// Removes a delivery from the processing list, freeing its slot.
    ///
    /// Returns `false` if it was not pending, e.g. already acked.
    pub async fn ack(&self, delivery: &Delivery) -> Result<bool, ResourceError> {
        let mut conn = self.connection.clone();
        let removed: usize = conn
            .lrem(
                processing_key(&delivery.queue, &self.consumer),
                1,
                delivery.payload.as_slice(),
            )
            .await?;
        Ok(removed > 0)
    }

    /// Number of unacked messages this consumer holds from `queue`.
    pub async fn in_flight(&self, queue: &str) -> Result<usize, ResourceError> {
        let mut conn = self.connection.clone();
        let len: usize = conn.llen(processing_key(queue, &self.consumer)).await?;
        Ok(len)
    }

    /// Puts every unacked message back on `queue` so it is received again.
    pub async fn requeue_unacked(&self, queue: &str) -> Result<usize, ResourceError> {
        let mut conn = self.connection.clone();
        let moved: usize = Script::new(REQUEUE_SCRIPT)
            .key(queue)
            .key(processing_key(queue, &self.consumer))
            .invoke_async(&mut conn)
            .await?;
        if moved > 0 {
            debug!("Requeued {} unacked messages on {}", moved, queue);
        }
        Ok(moved)
    }
}

impl fmt::Debug for QueueClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueClient")
            .field("consumer", &self.consumer)
            .field("prefetch_count", &self.prefetch_count)
            .finish_non_exhaustive()
    }
}
