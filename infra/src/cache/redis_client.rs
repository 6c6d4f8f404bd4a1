//! Redis client for the verification store
//!
//! Wraps one multiplexed connection and exposes the commands the store needs:
//! `SETEX`, `SET NX EX`, `GET`, `EXISTS`, `TTL`, `PING`, and an atomic
//! compare-and-delete script. Every command attempt is bounded by the
//! configured response timeout.
//!
//! Reads are retried on transient errors. Writes are attempted once, since a
//! retried `SET NX` whose first attempt reached the server would report the key
//! as already present.

use once_cell::sync::Lazy;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult, Script};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use crate::cache::CacheConfig;
use crate::InfrastructureError;

/// Deletes KEYS[1] only while it still holds ARGV[1]; returns the number of keys removed
static DELETE_IF_EQUALS: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
        if redis.call("GET", KEYS[1]) == ARGV[1] then
            return redis.call("DEL", KEYS[1])
        end
        return 0
        "#,
    )
});

/// Upper bound for the delay between two attempts
const MAX_BACKOFF: Duration = Duration::from_secs(5);

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 100;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Doubling delay between attempts, capped at [`MAX_BACKOFF`]
struct Backoff {
    attempt: u32,
    max_attempts: u32,
    delay: Duration,
}

impl Backoff {
    fn new(max_attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            attempt: 1,
            max_attempts: max_attempts.max(1),
            delay: Duration::from_millis(base_delay_ms),
        }
    }

    fn exhausted(&self) -> bool {
        self.attempt >= self.max_attempts
    }

    async fn wait(&mut self) {
        sleep(self.delay).await;
        self.delay = (self.delay * 2).min(MAX_BACKOFF);
        self.attempt += 1;
    }
}

/// Redis client shared by every request
///
/// Cheap to clone: every clone shares the same multiplexed connection.
#[derive(Clone)]
pub struct RedisClient {
    connection: MultiplexedConnection,
    config: CacheConfig,
    /// Attempts for the initial connection and for each read
    max_retries: u32,
    /// First backoff delay; doubles per attempt
    retry_delay_ms: u64,
}

impl RedisClient {
    /// Connect with the default retry policy (3 attempts, 100ms base delay)
    ///
    /// ```no_run
    /// use sv_infra::cache::{CacheConfig, RedisClient};
    ///
    /// async fn connect() -> Result<RedisClient, sv_infra::InfrastructureError> {
    ///     RedisClient::new(CacheConfig::new("redis://localhost:6379")).await
    /// }
    /// ```
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        Self::new_with_retry_config(config, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_MS).await
    }

    /// Connect with an explicit retry policy
    ///
    /// Each connection attempt is bounded by `config.connection_timeout`.
    pub async fn new_with_retry_config(
        config: CacheConfig,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<Self, InfrastructureError> {
        let masked_url = mask_url(&config.url);
        let client = Client::open(config.url.as_str())
            .map_err(|e| InfrastructureError::Config(format!("Invalid Redis URL {}: {}", masked_url, e)))?;

        let connect_timeout = Duration::from_secs(config.connection_timeout);
        let mut backoff = Backoff::new(max_retries, retry_delay_ms);

        let connection = loop {
            let result = timeout(connect_timeout, client.get_multiplexed_async_connection())
                .await
                .unwrap_or_else(|_| Err(timed_out("Redis connection timed out")));

            match result {
                Ok(connection) => break connection,
                Err(e) if !backoff.exhausted() => {
                    warn!(
                        url = %masked_url,
                        attempt = backoff.attempt,
                        error = %e,
                        "Redis connection failed, retrying"
                    );
                    backoff.wait().await;
                }
                Err(e) => {
                    error!(url = %masked_url, attempts = backoff.attempt, error = %e, "Could not connect to Redis");
                    return Err(InfrastructureError::Cache(e));
                }
            }
        };

        info!(url = %masked_url, "Connected to Redis");

        Ok(Self {
            connection,
            config,
            max_retries: max_retries.max(1),
            retry_delay_ms,
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// `SETEX`: store a value with an expiry, replacing any previous value
    pub async fn set_with_expiry(&self, key: &str, value: &str, expiry_seconds: u64) -> Result<(), InfrastructureError> {
        let (k, v) = (key.to_string(), value.to_string());
        self.write("SETEX", key, move |mut conn| {
            Box::pin(async move { conn.set_ex::<_, _, ()>(k, v, expiry_seconds).await })
        })
        .await
    }

    /// `SET NX EX`: store a value with an expiry unless the key exists
    ///
    /// Returns true when this call created the key.
    pub async fn set_nx_with_expiry(&self, key: &str, value: &str, expiry_seconds: u64) -> Result<bool, InfrastructureError> {
        let (k, v) = (key.to_string(), value.to_string());
        let reply = self
            .write("SET NX", key, move |mut conn| {
                Box::pin(async move {
                    redis::cmd("SET")
                        .arg(k)
                        .arg(v)
                        .arg("NX")
                        .arg("EX")
                        .arg(expiry_seconds)
                        .query_async::<_, Option<String>>(&mut conn)
                        .await
                })
            })
            .await?;

        debug!(key, created = reply.is_some(), "SET NX");
        Ok(reply.is_some())
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        self.read("GET", key, |mut conn| {
            let k = key.to_string();
            Box::pin(async move { conn.get::<_, Option<String>>(k).await })
        })
        .await
    }

    pub async fn exists(&self, key: &str) -> Result<bool, InfrastructureError> {
        self.read("EXISTS", key, |mut conn| {
            let k = key.to_string();
            Box::pin(async move { conn.exists::<_, bool>(k).await })
        })
        .await
    }

    /// Remaining lifetime in seconds
    ///
    /// `None` when the key is missing (`-2`) or has no expiry (`-1`).
    pub async fn ttl(&self, key: &str) -> Result<Option<u64>, InfrastructureError> {
        let ttl = self
            .read("TTL", key, |mut conn| {
                let k = key.to_string();
                Box::pin(async move { conn.ttl::<_, i64>(k).await })
            })
            .await?;

        Ok(u64::try_from(ttl).ok())
    }

    /// Delete a key only while it holds `expected`, atomically on the server
    ///
    /// Returns true when this call removed the key.
    pub async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, InfrastructureError> {
        let (k, v) = (key.to_string(), expected.to_string());
        let removed = self
            .write("DELETE_IF_EQUALS", key, move |mut conn| {
                Box::pin(async move { DELETE_IF_EQUALS.key(k).arg(v).invoke_async::<_, i64>(&mut conn).await })
            })
            .await?;

        debug!(key, removed = removed > 0, "DELETE_IF_EQUALS");
        Ok(removed > 0)
    }

    /// `PING`; true when the server answers `PONG`
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let reply = self
            .read("PING", "-", |mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await?;

        if reply != "PONG" {
            warn!(reply = %reply, "Unexpected PING reply");
        }
        Ok(reply == "PONG")
    }

    /// One attempt under the response timeout
    async fn attempt<T>(&self, call: RedisFuture<T>) -> RedisResult<T> {
        timeout(Duration::from_secs(self.config.response_timeout), call)
            .await
            .unwrap_or_else(|_| Err(timed_out("Redis response timed out")))
    }

    /// Non-idempotent command: a single attempt
    async fn write<T, F>(&self, command: &'static str, key: &str, operation: F) -> Result<T, InfrastructureError>
    where
        F: FnOnce(MultiplexedConnection) -> RedisFuture<T>,
    {
        self.attempt(operation(self.connection.clone()))
            .await
            .map_err(|e| command_failed(command, key, 1, e))
    }

    /// Idempotent command: retried with backoff on transient errors
    async fn read<T, F>(&self, command: &'static str, key: &str, operation: F) -> Result<T, InfrastructureError>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let mut backoff = Backoff::new(self.max_retries, self.retry_delay_ms);

        loop {
            match self.attempt(operation(self.connection.clone())).await {
                Ok(value) => return Ok(value),
                Err(e) if is_retriable_error(&e) && !backoff.exhausted() => {
                    warn!(command, key, attempt = backoff.attempt, error = %e, "Redis command failed, retrying");
                    backoff.wait().await;
                }
                Err(e) => return Err(command_failed(command, key, backoff.attempt, e)),
            }
        }
    }
}

fn command_failed(command: &'static str, key: &str, attempts: u32, e: RedisError) -> InfrastructureError {
    error!(command, key, attempts, error = %e, "Redis command failed");
    InfrastructureError::Cache(e)
}

/// Transient failures worth another attempt: I/O errors (timeouts included),
/// a server still loading its dataset, and cluster `TRYAGAIN`
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError | redis::ErrorKind::BusyLoadingError | redis::ErrorKind::TryAgain
    )
}

fn timed_out(message: &'static str) -> RedisError {
    RedisError::from(std::io::Error::new(std::io::ErrorKind::TimedOut, message))
}

/// Hide credentials in a Redis URL before logging it
pub(crate) fn mask_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}****{}", &url[..scheme_end + 3], &url[at..])
        }
        _ => url.to_string(),
    }
}
