//! # SentKV Client
//!
//! Purpose: Typed, pooled client for the RESP2 cache server and its
//! Sentinel high-availability controller.
//!
//! ## Design Principles
//! 1. **Facade Pattern**: `SentinelClient`/`CacheClient` hide pooling and protocol details.
//! 2. **Typed Commands**: Every operation pairs a request frame with a pure reply decoder.
//! 3. **Fail Fast**: Argument, protocol, and transport failures stay distinct and surface immediately.
//! 4. **One Socket, One Caller**: A connection never interleaves concurrent requests.

mod cache;
pub mod catalog;
mod command;
mod config;
mod connector;
mod error;
mod info;
mod pool;
mod sentinel;

pub use cache::{CacheClient, KeyTtl};
pub use command::Command;
pub use config::ClientConfig;
pub use connector::Connector;
pub use error::{ArgumentError, ClientError, ClientResult, ConnectionError};
pub use info::{InfoRecord, MasterInfo, MasterState, SentinelInfo, SlaveInfo};
pub use sentinel::SentinelClient;

// Wire-level types surface in the public API (raw `call`, custom commands).
pub use sentkv_common::{ProtocolError, Reply, ReplyKind};
