//! # Connector
//!
//! Purpose: The single chokepoint that turns a typed command into one
//! network round trip.
//!
//! ## Design Principles
//! 1. **One Reply Per Request**: Write a frame, read exactly one reply, nothing else.
//! 2. **Errors Upfront**: Server error replies are intercepted before result decoding.
//! 3. **Fail Fast, Reconnect Later**: Failed connections are dropped; the next call dials fresh.

use sentkv_common::Reply;

use crate::command::Command;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::pool::{ConnectionPool, PoolConfig};

/// Request/response dispatcher over a pooled transport.
pub struct Connector {
    pool: ConnectionPool,
}

impl Connector {
    /// Builds a connector for the configured endpoint. No I/O happens yet;
    /// connections are dialed on first use or via [`Connector::connect`].
    pub fn new(config: &ClientConfig) -> Self {
        let pool = ConnectionPool::new(PoolConfig {
            addr: config.addr(),
            max_idle: config.max_idle,
            max_total: config.max_total,
            connect_timeout: config.connect_timeout,
            read_timeout: config.read_timeout,
            write_timeout: config.write_timeout,
        });
        Connector { pool }
    }

    /// Eagerly establishes one connection and parks it for reuse.
    ///
    /// Succeeds fully or fails fully; there is no partial connection state
    /// left behind.
    pub async fn connect(&self) -> ClientResult<()> {
        let conn = self.pool.acquire().await?;
        // A healthy guard returns to the idle queue on drop.
        drop(conn);
        Ok(())
    }

    /// Executes one command: encode, write, read one reply, decode.
    ///
    /// Each call is exactly one round trip on a connection this caller owns
    /// exclusively until the reply is framed; there is no retry.
    pub async fn call<T>(&self, command: &Command<T>) -> ClientResult<T> {
        let mut conn = self.pool.acquire().await?;

        let reply = match conn.round_trip(command.name(), command.args()).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(command = command.name(), error = %err, "discarding connection after failed call");
                return Err(err);
            }
        };

        if let Reply::Error(message) = reply {
            return Err(ClientError::Server(message));
        }

        match command.parse(reply) {
            Ok(value) => Ok(value),
            Err(err) => {
                // A shape mismatch means the stream can no longer be trusted.
                conn.invalidate();
                tracing::warn!(command = command.name(), error = %err, "protocol desync, closing connection");
                Err(ClientError::Protocol(err))
            }
        }
    }
}
