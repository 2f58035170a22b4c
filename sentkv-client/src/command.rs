//! # Typed Commands
//!
//! Purpose: Pair a request frame with the pure function that decodes its
//! reply, so the dispatch layer stays shape-agnostic.
//!
//! ## Design Principles
//! 1. **No I/O Here**: Building a command only validates and stores the name and arguments.
//! 2. **Strategy Table**: Each reply shape is one plain `fn(Reply) -> Result<T, _>`.
//! 3. **Exact Shapes**: A mismatched reply variant is an error, never a coercion.

use sentkv_common::{encode_request, ProtocolError, Reply};

use crate::info::{InfoRecord, MasterState};

/// A typed request: command name, ordered arguments, and the reply decoder
/// producing `T`.
///
/// Immutable once built; both encoding and parsing are pure.
#[derive(Debug)]
pub struct Command<T> {
    name: String,
    args: Vec<Vec<u8>>,
    parse: fn(Reply) -> Result<T, ProtocolError>,
}

impl<T> Command<T> {
    fn new(name: &str, args: Vec<Vec<u8>>, parse: fn(Reply) -> Result<T, ProtocolError>) -> Self {
        Command {
            name: name.to_string(),
            args,
            parse,
        }
    }

    /// Command name as sent on the wire.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered arguments, already encoded as raw bytes.
    pub fn args(&self) -> &[Vec<u8>] {
        &self.args
    }

    /// Writes the RESP request frame for this command into `out`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        encode_request(self.name.as_bytes(), &self.args, out);
    }

    /// Decodes a framed reply into the command's result type.
    pub fn parse(&self, reply: Reply) -> Result<T, ProtocolError> {
        (self.parse)(reply)
    }
}

impl Command<String> {
    /// Command answered by a status line, e.g. `PING`.
    pub(crate) fn status(name: &str, args: Vec<Vec<u8>>) -> Self {
        Command::new(name, args, parse_status)
    }
}

impl Command<i64> {
    /// Command answered by an integer reply.
    pub(crate) fn integer(name: &str, args: Vec<Vec<u8>>) -> Self {
        Command::new(name, args, parse_integer)
    }
}

impl Command<bool> {
    /// Command answered by an integer reply read as yes/no.
    pub(crate) fn boolean(name: &str, args: Vec<Vec<u8>>) -> Self {
        Command::new(name, args, parse_boolean)
    }
}

impl Command<Option<Vec<u8>>> {
    /// Command answered by a bulk reply that may be null.
    pub(crate) fn bytes(name: &str, args: Vec<Vec<u8>>) -> Self {
        Command::new(name, args, parse_bytes)
    }
}

impl Command<Vec<(String, String)>> {
    /// Command answered by a field/value multi-bulk.
    pub(crate) fn hash(name: &str, args: Vec<Vec<u8>>) -> Self {
        Command::new(name, args, parse_hash)
    }
}

impl Command<Option<(String, u16)>> {
    /// Command answered by an `[ip, port]` pair or a null array.
    pub(crate) fn addr(name: &str, args: Vec<Vec<u8>>) -> Self {
        Command::new(name, args, parse_addr)
    }
}

impl Command<MasterState> {
    /// Command answered by the three-element down-state reply.
    pub(crate) fn master_state(name: &str, args: Vec<Vec<u8>>) -> Self {
        Command::new(name, args, parse_master_state)
    }
}

impl Command<Reply> {
    /// Command whose reply is handed back undecoded.
    pub(crate) fn raw(name: &str, args: Vec<Vec<u8>>) -> Self {
        Command::new(name, args, parse_raw)
    }
}

impl<T: InfoRecord> Command<T> {
    /// Command answered by one hash-shaped record.
    pub(crate) fn record(name: &str, args: Vec<Vec<u8>>) -> Self {
        Command::new(name, args, parse_record::<T>)
    }
}

impl<T: InfoRecord> Command<Vec<T>> {
    /// Command answered by an array of hash-shaped records.
    pub(crate) fn records(name: &str, args: Vec<Vec<u8>>) -> Self {
        Command::new(name, args, parse_records::<T>)
    }
}

fn parse_status(reply: Reply) -> Result<String, ProtocolError> {
    reply.into_status()
}

fn parse_integer(reply: Reply) -> Result<i64, ProtocolError> {
    reply.into_integer()
}

// The server's convention for yes/no answers is the integer 1; every other
// integer, including negatives, is a no.
fn parse_boolean(reply: Reply) -> Result<bool, ProtocolError> {
    Ok(reply.into_integer()? == 1)
}

fn parse_bytes(reply: Reply) -> Result<Option<Vec<u8>>, ProtocolError> {
    reply.into_bulk_or_null()
}

fn parse_hash(reply: Reply) -> Result<Vec<(String, String)>, ProtocolError> {
    hash_pairs(reply)
}

fn parse_record<T: InfoRecord>(reply: Reply) -> Result<T, ProtocolError> {
    let pairs = hash_pairs(reply)?;
    Ok(T::from_pairs(
        pairs.iter().map(|(key, value)| (key.as_str(), value.as_str())),
    ))
}

fn parse_records<T: InfoRecord>(reply: Reply) -> Result<Vec<T>, ProtocolError> {
    let items = reply.into_multi_bulk()?;
    items.into_iter().map(parse_record::<T>).collect()
}

fn parse_addr(reply: Reply) -> Result<Option<(String, u16)>, ProtocolError> {
    let Some(items) = reply.into_multi_bulk_or_null()? else {
        return Ok(None);
    };
    let [ip, port]: [Reply; 2] =
        items
            .try_into()
            .map_err(|items: Vec<Reply>| ProtocolError::UnexpectedLength {
                expected: 2,
                actual: items.len(),
            })?;
    let ip = ip.into_bulk_string()?;
    let port = port
        .into_bulk_string()?
        .parse::<u16>()
        .map_err(|_| ProtocolError::BadInteger)?;
    Ok(Some((ip, port)))
}

fn parse_master_state(reply: Reply) -> Result<MasterState, ProtocolError> {
    let items = reply.into_multi_bulk()?;
    let [down, leader, epoch]: [Reply; 3] =
        items
            .try_into()
            .map_err(|items: Vec<Reply>| ProtocolError::UnexpectedLength {
                expected: 3,
                actual: items.len(),
            })?;
    Ok(MasterState {
        is_down: down.into_integer()? == 1,
        leader: leader.into_bulk_string()?,
        vote_epoch: epoch.into_integer()?,
    })
}

fn parse_raw(reply: Reply) -> Result<Reply, ProtocolError> {
    Ok(reply)
}

// Hash replies interleave keys and values; an odd element count means the
// server and client disagree about the shape, so it is rejected outright
// rather than dropping the trailing key.
fn hash_pairs(reply: Reply) -> Result<Vec<(String, String)>, ProtocolError> {
    let items = reply.into_multi_bulk()?;
    if items.len() % 2 != 0 {
        return Err(ProtocolError::UnpairedField(items.len()));
    }

    let mut pairs = Vec::with_capacity(items.len() / 2);
    let mut iter = items.into_iter();
    while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
        pairs.push((key.into_bulk_string()?, value.into_bulk_string()?));
    }
    Ok(pairs)
}
