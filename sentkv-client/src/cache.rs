//! # Cache Client
//!
//! Purpose: Expose a compact API for the plain key/value surface of the
//! server, sharing the connector, pool, and catalog with the Sentinel
//! client.

use std::time::Duration;

use sentkv_common::ProtocolError;

use crate::catalog;
use crate::config::ClientConfig;
use crate::connector::Connector;
use crate::error::ClientResult;

/// TTL state returned by the server for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTtl {
    /// Key is missing or already expired.
    Missing,
    /// Key exists without expiration.
    NoExpiry,
    /// Key expires after the provided duration.
    ExpiresIn(Duration),
}

/// Client for the cache surface with connection pooling.
///
/// Each call acquires a connection, executes one command, and returns the
/// connection to the pool.
pub struct CacheClient {
    connector: Connector,
}

impl CacheClient {
    /// Creates a client. The endpoint is dialed on the first call, or
    /// explicitly via [`CacheClient::connect`].
    pub fn new(config: &ClientConfig) -> Self {
        CacheClient {
            connector: Connector::new(config),
        }
    }

    /// Establishes a connection up front instead of on first use.
    pub async fn connect(&self) -> ClientResult<()> {
        self.connector.connect().await
    }

    /// Fetches a value by key.
    ///
    /// Returns `Ok(None)` when the key is missing; an empty value comes
    /// back as `Ok(Some(vec![]))`.
    pub async fn get(&self, key: &[u8]) -> ClientResult<Option<Vec<u8>>> {
        self.connector.call(&catalog::cache::get(key)?).await
    }

    /// Sets a value for a key without expiration.
    pub async fn set(&self, key: &[u8], value: &[u8]) -> ClientResult<()> {
        self.connector.call(&catalog::cache::set(key, value)?).await?;
        Ok(())
    }

    /// Sets a value and attaches an expiration.
    pub async fn set_with_ttl(&self, key: &[u8], value: &[u8], ttl: Duration) -> ClientResult<()> {
        self.connector
            .call(&catalog::cache::set_ex(key, value, ttl)?)
            .await?;
        Ok(())
    }

    /// Deletes a key. Returns true when a key was removed.
    pub async fn delete(&self, key: &[u8]) -> ClientResult<bool> {
        self.connector.call(&catalog::cache::del(key)?).await
    }

    /// Sets a time-to-live on a key. Returns true when the TTL was set.
    pub async fn expire(&self, key: &[u8], ttl: Duration) -> ClientResult<bool> {
        self.connector.call(&catalog::cache::expire(key, ttl)?).await
    }

    /// Returns TTL status for a key.
    pub async fn ttl(&self, key: &[u8]) -> ClientResult<KeyTtl> {
        let value = self.connector.call(&catalog::cache::ttl(key)?).await?;
        match value {
            -2 => Ok(KeyTtl::Missing),
            -1 => Ok(KeyTtl::NoExpiry),
            seconds if seconds >= 0 => Ok(KeyTtl::ExpiresIn(Duration::from_secs(seconds as u64))),
            _ => Err(ProtocolError::BadInteger.into()),
        }
    }

    /// Pings the server.
    pub async fn ping(&self) -> ClientResult<String> {
        self.connector.call(&catalog::ping()).await
    }

    /// Fetches server INFO output.
    pub async fn info(&self) -> ClientResult<Vec<u8>> {
        let data = self.connector.call(&catalog::cache::info()).await?;
        Ok(data.unwrap_or_default())
    }

    /// Fetches all fields of a hash key, in server order.
    pub async fn hgetall(&self, key: &[u8]) -> ClientResult<Vec<(String, String)>> {
        self.connector.call(&catalog::cache::hgetall(key)?).await
    }
}
