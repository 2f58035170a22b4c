//! # Topology Records
//!
//! Purpose: Flat records for the hash-shaped replies Sentinel returns about
//! masters, replicas, and peer sentinels.
//!
//! ## Design Principles
//! 1. **Explicit Field Tables**: Each record names the wire keys it accepts in one match table.
//! 2. **Lenient By Contract**: Unknown keys are ignored, absent keys keep their defaults.
//! 3. **Plain Data**: Records are `Default` + `Clone` value types with no behavior.

/// Maps hash-reply fields onto a record, one wire key at a time.
pub trait InfoRecord: Default {
    /// Applies a single `key`/`value` field. Unknown keys must be ignored.
    fn apply(&mut self, key: &str, value: &str);

    /// Builds a record from ordered field pairs.
    fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut record = Self::default();
        for (key, value) in pairs {
            record.apply(key, value);
        }
        record
    }
}

/// One monitored master, from `SENTINEL MASTERS` / `SENTINEL MASTER`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasterInfo {
    pub name: String,
    pub ip: String,
    pub port: u16,
    pub run_id: String,
    pub flags: String,
    pub link_pending_commands: i64,
    pub last_ping_sent: i64,
    pub last_ok_ping_reply: i64,
    pub last_ping_reply: i64,
    pub down_after_milliseconds: i64,
    pub info_refresh: i64,
    pub role_reported: String,
    pub role_reported_time: i64,
    pub config_epoch: i64,
    pub num_slaves: i64,
    pub num_other_sentinels: i64,
    pub quorum: i64,
    pub failover_timeout: i64,
    pub parallel_syncs: i64,
}

impl InfoRecord for MasterInfo {
    fn apply(&mut self, key: &str, value: &str) {
        match key {
            "name" => self.name = value.to_string(),
            "ip" => self.ip = value.to_string(),
            "port" => set_num(&mut self.port, value),
            "runid" => self.run_id = value.to_string(),
            "flags" => self.flags = value.to_string(),
            "link-pending-commands" => set_num(&mut self.link_pending_commands, value),
            "last-ping-sent" => set_num(&mut self.last_ping_sent, value),
            "last-ok-ping-reply" => set_num(&mut self.last_ok_ping_reply, value),
            "last-ping-reply" => set_num(&mut self.last_ping_reply, value),
            "down-after-milliseconds" => set_num(&mut self.down_after_milliseconds, value),
            "info-refresh" => set_num(&mut self.info_refresh, value),
            "role-reported" => self.role_reported = value.to_string(),
            "role-reported-time" => set_num(&mut self.role_reported_time, value),
            "config-epoch" => set_num(&mut self.config_epoch, value),
            "num-slaves" => set_num(&mut self.num_slaves, value),
            "num-other-sentinels" => set_num(&mut self.num_other_sentinels, value),
            "quorum" => set_num(&mut self.quorum, value),
            "failover-timeout" => set_num(&mut self.failover_timeout, value),
            "parallel-syncs" => set_num(&mut self.parallel_syncs, value),
            _ => {}
        }
    }
}

/// One peer Sentinel watching a master, from `SENTINEL SENTINELS`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentinelInfo {
    pub name: String,
    pub ip: String,
    pub port: u16,
    pub run_id: String,
    pub flags: String,
    pub link_pending_commands: i64,
    pub last_ping_sent: i64,
    pub last_ok_ping_reply: i64,
    pub last_ping_reply: i64,
    pub down_after_milliseconds: i64,
    pub last_hello_message: i64,
    pub voted_leader: String,
    pub voted_leader_epoch: i64,
}

impl InfoRecord for SentinelInfo {
    fn apply(&mut self, key: &str, value: &str) {
        match key {
            "name" => self.name = value.to_string(),
            "ip" => self.ip = value.to_string(),
            "port" => set_num(&mut self.port, value),
            "runid" => self.run_id = value.to_string(),
            "flags" => self.flags = value.to_string(),
            "link-pending-commands" => set_num(&mut self.link_pending_commands, value),
            "last-ping-sent" => set_num(&mut self.last_ping_sent, value),
            "last-ok-ping-reply" => set_num(&mut self.last_ok_ping_reply, value),
            "last-ping-reply" => set_num(&mut self.last_ping_reply, value),
            "down-after-milliseconds" => set_num(&mut self.down_after_milliseconds, value),
            "last-hello-message" => set_num(&mut self.last_hello_message, value),
            "voted-leader" => self.voted_leader = value.to_string(),
            "voted-leader-epoch" => set_num(&mut self.voted_leader_epoch, value),
            _ => {}
        }
    }
}

/// One replica of a monitored master, from `SENTINEL SLAVES`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlaveInfo {
    pub name: String,
    pub ip: String,
    pub port: u16,
    pub run_id: String,
    pub flags: String,
    pub link_pending_commands: i64,
    pub last_ping_sent: i64,
    pub last_ok_ping_reply: i64,
    pub last_ping_reply: i64,
    pub down_after_milliseconds: i64,
    pub info_refresh: i64,
    pub role_reported: String,
    pub role_reported_time: i64,
    pub master_link_down_time: i64,
    pub master_link_status: String,
    pub master_host: String,
    pub master_port: u16,
    pub slave_priority: i64,
    pub slave_repl_offset: i64,
}

impl InfoRecord for SlaveInfo {
    fn apply(&mut self, key: &str, value: &str) {
        match key {
            "name" => self.name = value.to_string(),
            "ip" => self.ip = value.to_string(),
            "port" => set_num(&mut self.port, value),
            "runid" => self.run_id = value.to_string(),
            "flags" => self.flags = value.to_string(),
            "link-pending-commands" => set_num(&mut self.link_pending_commands, value),
            "last-ping-sent" => set_num(&mut self.last_ping_sent, value),
            "last-ok-ping-reply" => set_num(&mut self.last_ok_ping_reply, value),
            "last-ping-reply" => set_num(&mut self.last_ping_reply, value),
            "down-after-milliseconds" => set_num(&mut self.down_after_milliseconds, value),
            "info-refresh" => set_num(&mut self.info_refresh, value),
            "role-reported" => self.role_reported = value.to_string(),
            "role-reported-time" => set_num(&mut self.role_reported_time, value),
            "master-link-down-time" => set_num(&mut self.master_link_down_time, value),
            "master-link-status" => self.master_link_status = value.to_string(),
            "master-host" => self.master_host = value.to_string(),
            "master-port" => set_num(&mut self.master_port, value),
            "slave-priority" => set_num(&mut self.slave_priority, value),
            "slave-repl-offset" => set_num(&mut self.slave_repl_offset, value),
            _ => {}
        }
    }
}

/// Failure-detection verdict from `SENTINEL IS-MASTER-DOWN-BY-ADDR`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasterState {
    /// True when the queried Sentinel considers the master down.
    pub is_down: bool,
    /// Run id of the leader this Sentinel voted for, or `*` when none.
    pub leader: String,
    /// Leader epoch of the vote.
    pub vote_epoch: i64,
}

// Numeric fields keep their current value when the payload does not parse.
fn set_num<T: std::str::FromStr>(slot: &mut T, value: &str) {
    if let Ok(parsed) = value.parse() {
        *slot = parsed;
    }
}
