//! # Sentinel Client
//!
//! Purpose: One-method-per-operation facade over the connector and the
//! command catalog for the high-availability controller.
//!
//! ## Design Principles
//! 1. **Facade Pattern**: `SentinelClient` hides pooling and protocol details.
//! 2. **One Round Trip Each**: No retry, no batching, no caching.
//! 3. **Fail Fast**: Bad arguments are rejected before any bytes are written.

use sentkv_common::Reply;

use crate::catalog;
use crate::config::ClientConfig;
use crate::connector::Connector;
use crate::error::ClientResult;
use crate::info::{MasterInfo, MasterState, SentinelInfo, SlaveInfo};

/// Client for a Sentinel endpoint.
///
/// Every operation maps to exactly one command and one round trip; a failed
/// operation returns the error and nothing else, never a partial record.
pub struct SentinelClient {
    connector: Connector,
}

impl SentinelClient {
    /// Creates a client. The endpoint is dialed on the first call, or
    /// explicitly via [`SentinelClient::connect`].
    pub fn new(config: &ClientConfig) -> Self {
        SentinelClient {
            connector: Connector::new(config),
        }
    }

    /// Establishes a connection up front instead of on first use.
    pub async fn connect(&self) -> ClientResult<()> {
        self.connector.connect().await
    }

    /// Pings the Sentinel server.
    pub async fn ping(&self) -> ClientResult<String> {
        self.connector.call(&catalog::ping()).await
    }

    /// Lists every monitored master.
    pub async fn masters(&self) -> ClientResult<Vec<MasterInfo>> {
        self.connector.call(&catalog::sentinel::masters()).await
    }

    /// Fetches one monitored master by name.
    pub async fn master(&self, master_name: &str) -> ClientResult<MasterInfo> {
        self.connector
            .call(&catalog::sentinel::master(master_name)?)
            .await
    }

    /// Lists the other Sentinels watching `master_name`.
    pub async fn sentinels(&self, master_name: &str) -> ClientResult<Vec<SentinelInfo>> {
        self.connector
            .call(&catalog::sentinel::sentinels(master_name)?)
            .await
    }

    /// Lists the replicas of `master_name`.
    pub async fn slaves(&self, master_name: &str) -> ClientResult<Vec<SlaveInfo>> {
        self.connector
            .call(&catalog::sentinel::slaves(master_name)?)
            .await
    }

    /// Resolves the current address of the named master; `None` when the
    /// name is not monitored.
    pub async fn get_master_addr_by_name(
        &self,
        master_name: &str,
    ) -> ClientResult<Option<(String, u16)>> {
        self.connector
            .call(&catalog::sentinel::get_master_addr_by_name(master_name)?)
            .await
    }

    /// Asks this Sentinel whether it considers the master at `ip:port`
    /// down, and who it voted for in `current_epoch`.
    pub async fn is_master_down_by_addr(
        &self,
        ip: &str,
        port: u16,
        current_epoch: i64,
        run_id: &str,
    ) -> ClientResult<MasterState> {
        self.connector
            .call(&catalog::sentinel::is_master_down_by_addr(
                ip,
                port,
                current_epoch,
                run_id,
            )?)
            .await
    }

    /// Clears state for every master matching `pattern`; returns how many
    /// masters were reset.
    pub async fn reset(&self, pattern: &str) -> ClientResult<i64> {
        self.connector
            .call(&catalog::sentinel::reset(pattern)?)
            .await
    }

    /// Forces a failover without asking the other Sentinels for agreement.
    pub async fn failover(&self, master_name: &str) -> ClientResult<String> {
        self.connector
            .call(&catalog::sentinel::failover(master_name)?)
            .await
    }

    /// Starts monitoring a new master.
    pub async fn monitor(
        &self,
        master_name: &str,
        port: u16,
        quorum: u32,
    ) -> ClientResult<String> {
        self.connector
            .call(&catalog::sentinel::monitor(master_name, port, quorum)?)
            .await
    }

    /// Stops monitoring the named master.
    pub async fn remove(&self, master_name: &str) -> ClientResult<String> {
        self.connector
            .call(&catalog::sentinel::remove(master_name)?)
            .await
    }

    /// Updates one configuration option of a monitored master.
    pub async fn set(
        &self,
        master_name: &str,
        option: &str,
        value: &str,
    ) -> ClientResult<String> {
        self.connector
            .call(&catalog::sentinel::set(master_name, option, value)?)
            .await
    }

    /// Issues an arbitrary command, for operations without a typed method.
    ///
    /// The raw reply is returned for the caller to interpret; server error
    /// replies still surface as [`crate::ClientError::Server`].
    pub async fn call(&self, command: &str, args: &[&str]) -> ClientResult<Reply> {
        self.connector.call(&catalog::raw(command, args)?).await
    }
}
