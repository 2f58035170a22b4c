//! # Command Catalog
//!
//! Purpose: Stateless factories, one per server operation, that validate
//! arguments and build the matching typed command.
//!
//! ## Design Principles
//! 1. **Validate Before I/O**: Bad arguments fail here with `ArgumentError`, never on the wire.
//! 2. **Pure Construction**: No shared state, no side effects, no network.
//! 3. **Wire Names As-Is**: Command and subcommand spellings match the server verbatim.

use sentkv_common::Reply;

use crate::command::Command;
use crate::error::ArgumentError;

/// Health check answered with a status line.
pub fn ping() -> Command<String> {
    Command::status("PING", Vec::new())
}

/// Escape hatch for operations without a typed factory yet.
///
/// The caller interprets the raw reply; server error replies still surface
/// as errors from the dispatch layer.
pub fn raw(name: &str, args: &[&str]) -> Result<Command<Reply>, ArgumentError> {
    require("command name", name)?;
    Ok(Command::raw(name, args.iter().map(|part| arg(part)).collect()))
}

/// Factories for the high-availability controller's command surface.
pub mod sentinel {
    use crate::info::{MasterInfo, MasterState, SentinelInfo, SlaveInfo};

    use super::*;

    /// `SENTINEL MASTERS` — every monitored master.
    pub fn masters() -> Command<Vec<MasterInfo>> {
        Command::records("SENTINEL", vec![arg("MASTERS")])
    }

    /// `SENTINEL MASTER <name>` — one monitored master.
    pub fn master(master_name: &str) -> Result<Command<MasterInfo>, ArgumentError> {
        require("master name", master_name)?;
        Ok(Command::record(
            "SENTINEL",
            vec![arg("MASTER"), arg(master_name)],
        ))
    }

    /// `SENTINEL SENTINELS <name>` — peers watching the named master.
    pub fn sentinels(master_name: &str) -> Result<Command<Vec<SentinelInfo>>, ArgumentError> {
        require("master name", master_name)?;
        Ok(Command::records(
            "SENTINEL",
            vec![arg("SENTINELS"), arg(master_name)],
        ))
    }

    /// `SENTINEL SLAVES <name>` — replicas of the named master.
    pub fn slaves(master_name: &str) -> Result<Command<Vec<SlaveInfo>>, ArgumentError> {
        require("master name", master_name)?;
        Ok(Command::records(
            "SENTINEL",
            vec![arg("SLAVES"), arg(master_name)],
        ))
    }

    /// `SENTINEL GET-MASTER-ADDR-BY-NAME <name>` — current master address,
    /// or a null array when the name is unknown.
    pub fn get_master_addr_by_name(
        master_name: &str,
    ) -> Result<Command<Option<(String, u16)>>, ArgumentError> {
        require("master name", master_name)?;
        Ok(Command::addr(
            "SENTINEL",
            vec![arg("GET-MASTER-ADDR-BY-NAME"), arg(master_name)],
        ))
    }

    /// `SENTINEL IS-MASTER-DOWN-BY-ADDR <ip> <port> <epoch> <runid>` — this
    /// Sentinel's verdict on the master at `ip:port`.
    pub fn is_master_down_by_addr(
        ip: &str,
        port: u16,
        current_epoch: i64,
        run_id: &str,
    ) -> Result<Command<MasterState>, ArgumentError> {
        require("ip", ip)?;
        if port == 0 {
            return Err(ArgumentError::ZeroPort);
        }
        require("run id", run_id)?;
        Ok(Command::master_state(
            "SENTINEL",
            vec![
                arg("IS-MASTER-DOWN-BY-ADDR"),
                arg(ip),
                num(port),
                num(current_epoch),
                arg(run_id),
            ],
        ))
    }

    /// `SENTINEL RESET <pattern>` — clears state for matching masters and
    /// returns how many were reset.
    pub fn reset(pattern: &str) -> Result<Command<i64>, ArgumentError> {
        require("pattern", pattern)?;
        Ok(Command::integer("SENTINEL", vec![arg("RESET"), arg(pattern)]))
    }

    /// `SENTINEL FAILOVER <name>` — forces a failover without quorum.
    pub fn failover(master_name: &str) -> Result<Command<String>, ArgumentError> {
        require("master name", master_name)?;
        Ok(Command::status(
            "SENTINEL",
            vec![arg("FAILOVER"), arg(master_name)],
        ))
    }

    /// `SENTINEL MONITOR <name> <port> <quorum>` — starts monitoring a new
    /// master.
    pub fn monitor(
        master_name: &str,
        port: u16,
        quorum: u32,
    ) -> Result<Command<String>, ArgumentError> {
        require("master name", master_name)?;
        if port == 0 {
            return Err(ArgumentError::ZeroPort);
        }
        if quorum == 0 {
            return Err(ArgumentError::ZeroQuorum);
        }
        Ok(Command::status(
            "SENTINEL",
            vec![arg("MONITOR"), arg(master_name), num(port), num(quorum)],
        ))
    }

    /// `SENTINEL REMOVE <name>` — stops monitoring the named master.
    pub fn remove(master_name: &str) -> Result<Command<String>, ArgumentError> {
        require("master name", master_name)?;
        Ok(Command::status(
            "SENTINEL",
            vec![arg("REMOVE"), arg(master_name)],
        ))
    }

    /// `SENTINEL SET <name> <option> <value>` — updates one configuration
    /// option of a monitored master.
    pub fn set(
        master_name: &str,
        option: &str,
        value: &str,
    ) -> Result<Command<String>, ArgumentError> {
        require("master name", master_name)?;
        require("option", option)?;
        Ok(Command::status(
            "SENTINEL",
            vec![arg("SET"), arg(master_name), arg(option), arg(value)],
        ))
    }
}

/// Factories for the plain key/value command surface.
pub mod cache {
    use std::time::Duration;

    use super::*;

    /// `GET <key>` — value bytes, or null when the key is missing.
    pub fn get(key: &[u8]) -> Result<Command<Option<Vec<u8>>>, ArgumentError> {
        require_bytes("key", key)?;
        Ok(Command::bytes("GET", vec![key.to_vec()]))
    }

    /// `SET <key> <value>` — stores a value without expiration.
    pub fn set(key: &[u8], value: &[u8]) -> Result<Command<String>, ArgumentError> {
        require_bytes("key", key)?;
        Ok(Command::status("SET", vec![key.to_vec(), value.to_vec()]))
    }

    /// `SET <key> <value> EX <seconds>` — stores a value with an expiration.
    pub fn set_ex(
        key: &[u8],
        value: &[u8],
        ttl: Duration,
    ) -> Result<Command<String>, ArgumentError> {
        require_bytes("key", key)?;
        if ttl.as_secs() == 0 {
            return Err(ArgumentError::ZeroTtl);
        }
        Ok(Command::status(
            "SET",
            vec![key.to_vec(), value.to_vec(), arg("EX"), num(ttl.as_secs())],
        ))
    }

    /// `DEL <key>` — true when a key was removed.
    pub fn del(key: &[u8]) -> Result<Command<bool>, ArgumentError> {
        require_bytes("key", key)?;
        Ok(Command::boolean("DEL", vec![key.to_vec()]))
    }

    /// `EXPIRE <key> <seconds>` — true when the TTL was applied.
    pub fn expire(key: &[u8], ttl: Duration) -> Result<Command<bool>, ArgumentError> {
        require_bytes("key", key)?;
        if ttl.as_secs() == 0 {
            return Err(ArgumentError::ZeroTtl);
        }
        Ok(Command::boolean(
            "EXPIRE",
            vec![key.to_vec(), num(ttl.as_secs())],
        ))
    }

    /// `TTL <key>` — remaining lifetime in the server's `-2`/`-1`/seconds
    /// convention.
    pub fn ttl(key: &[u8]) -> Result<Command<i64>, ArgumentError> {
        require_bytes("key", key)?;
        Ok(Command::integer("TTL", vec![key.to_vec()]))
    }

    /// `INFO` — server statistics as bulk text.
    pub fn info() -> Command<Option<Vec<u8>>> {
        Command::bytes("INFO", Vec::new())
    }

    /// `HGETALL <key>` — all fields of a hash key in server order.
    pub fn hgetall(key: &[u8]) -> Result<Command<Vec<(String, String)>>, ArgumentError> {
        require_bytes("key", key)?;
        Ok(Command::hash("HGETALL", vec![key.to_vec()]))
    }
}

fn arg(value: impl AsRef<[u8]>) -> Vec<u8> {
    value.as_ref().to_vec()
}

fn num(value: impl ToString) -> Vec<u8> {
    value.to_string().into_bytes()
}

fn require(field: &'static str, value: &str) -> Result<(), ArgumentError> {
    if value.is_empty() {
        Err(ArgumentError::Empty(field))
    } else {
        Ok(())
    }
}

fn require_bytes(field: &'static str, value: &[u8]) -> Result<(), ArgumentError> {
    if value.is_empty() {
        Err(ArgumentError::Empty(field))
    } else {
        Ok(())
    }
}
