//! # Client Error Taxonomy
//!
//! Purpose: Keep bad caller input, protocol desync, and transport failure
//! distinguishable, because each one implies a different recovery.
//!
//! ## Design Principles
//! 1. **Fail Fast**: Argument errors fire before any bytes hit the wire.
//! 2. **Fatal Desync**: A protocol error invalidates the connection that produced it.
//! 3. **Reconnect, Don't Retry**: Transport failures surface once; the next call dials fresh.

use std::time::Duration;

use thiserror::Error;

use sentkv_common::ProtocolError;

/// Result type for all client calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Bad caller input, rejected before any I/O.
    #[error("invalid argument: {0}")]
    Argument(#[from] ArgumentError),
    /// Reply shape mismatch; the connection that produced it is discarded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    /// Transport failure; the next call attempts a fresh connection.
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),
    /// The server answered with an error reply.
    #[error("server error: {0}")]
    Server(String),
}

/// Caller input rejected by the command catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("port must not be zero")]
    ZeroPort,
    #[error("quorum must be at least 1")]
    ZeroQuorum,
    #[error("ttl must be at least one second")]
    ZeroTtl,
}

/// Transport-level failures.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// Network or IO failure while connecting, writing, or reading.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A configured time limit expired before the operation finished.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),
    /// The pool is at capacity with no idle connections available.
    #[error("connection pool exhausted")]
    PoolExhausted,
}
