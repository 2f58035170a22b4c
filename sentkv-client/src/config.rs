//! Client configuration.
//!
//! One flat record the bootstrap layer binds from its configuration source
//! and hands to a client; every field has a usable default.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for a client and its connection pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server host name or address.
    pub host: String,
    /// Server port. Sentinel listens on 26379 by default; override with
    /// 6379 (or your own) when talking to a cache node.
    pub port: u16,
    /// Maximum idle connections kept in the pool.
    pub max_idle: usize,
    /// Maximum total connections (idle + in-use).
    pub max_total: usize,
    /// Optional TCP connect timeout.
    pub connect_timeout: Option<Duration>,
    /// Optional per-call read timeout.
    pub read_timeout: Option<Duration>,
    /// Optional per-call write timeout.
    pub write_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Dial string in `host:port` form.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            host: "127.0.0.1".to_string(),
            port: 26379,
            max_idle: 2,
            max_total: 8,
            connect_timeout: Some(Duration::from_secs(5)),
            read_timeout: None,
            write_timeout: None,
        }
    }
}
